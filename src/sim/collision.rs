//! Collision resolution for the bomb
//!
//! After every physics sub-step the bomb is classified against the screen
//! edges, the opposing gorilla, and the (partly destroyed) skyline, in that
//! order. The first condition that holds wins.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{BlastHole, MatchState};
use crate::consts::*;

/// Outcome of one collision check
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Impact {
    /// Still flying
    None,
    /// Left the left, right, or bottom edge of the world
    OffScreen,
    /// Struck the opposing gorilla
    Target,
    /// Struck intact material of foreground building `index`
    Building { index: usize },
}

impl Impact {
    /// Whether the throw is over
    #[inline]
    pub fn ends_throw(&self) -> bool {
        !matches!(self, Impact::None)
    }

    /// Whether the throw missed the opponent
    #[inline]
    pub fn is_miss(&self) -> bool {
        matches!(self, Impact::OffScreen | Impact::Building { .. })
    }
}

/// Whether collisions may modify the world
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionMode {
    /// Real throws carve blast holes
    Live,
    /// Simulated throws leave the world untouched
    Headless,
}

/// Bomb outside the world bounds (the top is open)
pub fn off_screen(pos: Vec2, world_width: f32) -> bool {
    pos.y < 0.0 || pos.x < 0.0 || pos.x > world_width
}

/// First foreground building the bomb overlaps where material remains
pub fn building_hit(state: &MatchState, pos: Vec2) -> Option<usize> {
    state
        .buildings
        .iter()
        .enumerate()
        .filter(|(_, b)| b.overlaps_square(pos, BOMB_HALF_EXTENT))
        // Inside an earlier crater the building is already gone
        .find(|_| !state.in_blast_hole(pos))
        .map(|(i, _)| i)
}

/// Bomb touches the opposing gorilla
pub fn target_hit(state: &MatchState, pos: Vec2) -> bool {
    state.target().contains(pos)
}

/// Classify the bomb's current position without touching the world
pub fn classify(state: &MatchState) -> Impact {
    let pos = state.bomb.pos;

    if off_screen(pos, state.world_width()) {
        return Impact::OffScreen;
    }
    if target_hit(state, pos) {
        return Impact::Target;
    }
    match building_hit(state, pos) {
        Some(index) => Impact::Building { index },
        None => Impact::None,
    }
}

/// Classify the bomb and, in live mode, carve a crater on building impact
pub fn resolve(state: &mut MatchState, mode: CollisionMode) -> Impact {
    let impact = classify(state);
    if let (Impact::Building { index }, CollisionMode::Live) = (impact, mode) {
        let pos = state.bomb.pos;
        log::debug!("Blast hole at ({:.1}, {:.1}) in building {}", pos.x, pos.y, index);
        state.blast_holes.push(BlastHole { pos });
    }
    impact
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Viewport;
    use crate::sim::layout::{Building, Layout};
    use crate::sim::state::Player;

    fn building(x: f32, width: f32, height: f32) -> Building {
        Building {
            x,
            width,
            height,
            lights: Vec::new(),
        }
    }

    /// Five buildings 100 wide, 4 apart; player 2 stands on index 3
    fn test_state(heights: [f32; 5]) -> MatchState {
        let buildings = heights
            .iter()
            .enumerate()
            .map(|(i, &h)| building(i as f32 * 104.0, 100.0, h))
            .collect();
        let layout = Layout::new(Vec::new(), buildings, 516.0).unwrap();
        MatchState::new(
            layout,
            Viewport {
                width: 516.0,
                height: 400.0,
            },
        )
    }

    fn place(state: &mut MatchState, x: f32, y: f32) {
        state.bomb.pos = Vec2::new(x, y);
    }

    #[test]
    fn test_impact_kinds() {
        assert!(!Impact::None.ends_throw());
        assert!(Impact::Target.ends_throw());
        assert!(!Impact::Target.is_miss());
        assert!(Impact::OffScreen.is_miss());
        assert!(Impact::Building { index: 0 }.is_miss());
    }

    #[test]
    fn test_off_screen_edges() {
        let mut state = test_state([50.0; 5]);
        place(&mut state, 200.0, -0.1);
        assert_eq!(classify(&state), Impact::OffScreen);
        place(&mut state, -0.1, 300.0);
        assert_eq!(classify(&state), Impact::OffScreen);
        place(&mut state, 516.5, 300.0);
        assert_eq!(classify(&state), Impact::OffScreen);
        // Above the viewport is still in play
        place(&mut state, 200.0, 10_000.0);
        assert_eq!(classify(&state), Impact::None);
    }

    #[test]
    fn test_building_hit_records_blast_hole() {
        let mut state = test_state([50.0, 60.0, 200.0, 60.0, 50.0]);
        place(&mut state, 250.0, 150.0);
        assert_eq!(resolve(&mut state, CollisionMode::Live), Impact::Building { index: 2 });
        assert_eq!(state.blast_holes.len(), 1);
        assert_eq!(state.blast_holes[0].pos, Vec2::new(250.0, 150.0));
    }

    #[test]
    fn test_headless_never_records_blast_hole() {
        let mut state = test_state([50.0, 60.0, 200.0, 60.0, 50.0]);
        place(&mut state, 250.0, 150.0);
        assert_eq!(resolve(&mut state, CollisionMode::Headless), Impact::Building { index: 2 });
        assert!(state.blast_holes.is_empty());
    }

    #[test]
    fn test_blast_hole_suppresses_repeat_hit() {
        let mut state = test_state([50.0, 60.0, 200.0, 60.0, 50.0]);
        place(&mut state, 250.0, 150.0);
        resolve(&mut state, CollisionMode::Live);

        // Anywhere within the crater passes through
        for (dx, dy) in [(0.0, 0.0), (10.0, -5.0), (-12.0, 12.0), (0.0, -17.5)] {
            place(&mut state, 250.0 + dx, 150.0 + dy);
            assert_eq!(resolve(&mut state, CollisionMode::Live), Impact::None);
        }
        assert_eq!(state.blast_holes.len(), 1);

        // Just outside it hits again
        place(&mut state, 250.0, 131.0);
        assert_eq!(resolve(&mut state, CollisionMode::Live), Impact::Building { index: 2 });
        assert_eq!(state.blast_holes.len(), 2);
    }

    #[test]
    fn test_gap_between_buildings_is_clear() {
        let mut state = test_state([50.0; 5]);
        // Gap spans 100..104; the bomb's square reaches 4 units each way
        place(&mut state, 102.0, 20.0);
        assert!(matches!(classify(&state), Impact::Building { .. }));

        let mut state = test_state([50.0; 5]);
        state.buildings[1].x = 120.0;
        place(&mut state, 110.0, 20.0);
        assert_eq!(classify(&state), Impact::None);
    }

    #[test]
    fn test_target_hit_beats_building_hit() {
        // Opponent's building is short; the bomb overlaps both its roof and the torso
        let mut state = test_state([50.0, 60.0, 80.0, 30.0, 50.0]);
        let anchor = state.gorilla_anchor(Player::Two);
        assert_eq!(anchor, Vec2::new(362.0, 30.0));

        // Left leg, just above the roof
        place(&mut state, anchor.x - 12.0, anchor.y + 2.0);
        assert!(building_hit(&state, state.bomb.pos).is_some());
        assert_eq!(resolve(&mut state, CollisionMode::Live), Impact::Target);
        assert!(state.blast_holes.is_empty());
    }

    #[test]
    fn test_target_hit_on_torso_only() {
        let mut state = test_state([50.0, 60.0, 80.0, 30.0, 50.0]);
        let anchor = state.gorilla_anchor(Player::Two);
        place(&mut state, anchor.x, anchor.y + 60.0);
        assert!(building_hit(&state, state.bomb.pos).is_none());
        assert_eq!(classify(&state), Impact::Target);
    }

    #[test]
    fn test_only_opponent_is_a_target() {
        let mut state = test_state([50.0, 60.0, 80.0, 30.0, 50.0]);
        let own = state.gorilla_anchor(Player::One);
        place(&mut state, own.x, own.y + 60.0);
        assert_eq!(classify(&state), Impact::None);

        state.current_player = Player::Two;
        assert_eq!(classify(&state), Impact::Target);
    }

    #[test]
    fn test_off_screen_beats_target() {
        let mut state = test_state([50.0, 60.0, 80.0, 30.0, 50.0]);
        let anchor = state.gorilla_anchor(Player::Two);
        place(&mut state, anchor.x, anchor.y + 60.0);
        assert_eq!(classify(&state), Impact::Target);

        // Shrink the world so the target sits past the right edge
        state.scale = 2.0;
        assert_eq!(classify(&state), Impact::OffScreen);
    }
}
