//! Match state and core simulation types
//!
//! Everything a frame needs lives in [`MatchState`]; it is cloned wholesale
//! for headless throw simulation.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::gorilla::{Gorilla, Pose};
use super::layout::{Building, Layout, compute_scale, platform_index};
use super::projectile::Bomb;
use crate::Viewport;
use crate::angle_and_speed;
use crate::consts::*;

/// One of the two gorillas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    One,
    Two,
}

impl Player {
    pub fn opponent(self) -> Self {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// Horizontal direction toward the opponent
    pub fn throw_direction(self) -> f32 {
        match self {
            Player::One => 1.0,
            Player::Two => -1.0,
        }
    }

    /// Sign of the bomb's spin while this player's throw is in flight
    pub fn spin_direction(self) -> f32 {
        -self.throw_direction()
    }

    /// 1 or 2, for display
    pub fn number(self) -> u8 {
        match self {
            Player::One => 1,
            Player::Two => 2,
        }
    }
}

/// Current phase of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Current player is choosing a throw
    Aiming,
    /// Bomb is flying
    InFlight,
    /// A gorilla was hit; terminal until a new match
    Celebrating,
}

/// Crater left by a bomb in a building
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlastHole {
    pub pos: Vec2,
}

impl BlastHole {
    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        self.pos.distance(p) < BLAST_HOLE_RADIUS
    }
}

/// Angle/speed shown on a player's info panel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AimReadout {
    /// Elevation in whole degrees
    pub angle: i32,
    /// Speed, rounded
    pub velocity: i32,
}

impl AimReadout {
    pub fn from_velocity(velocity: Vec2) -> Self {
        let (angle, speed) = angle_and_speed(velocity);
        Self {
            angle: angle.round() as i32,
            velocity: speed.round() as i32,
        }
    }
}

/// Complete match state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchState {
    pub phase: GamePhase,
    pub current_player: Player,
    /// Starts at 1; bumps when play returns to player 1
    pub round: u32,
    /// Decorative skyline
    pub background: Vec<Building>,
    /// Buildings bombs collide with
    pub buildings: Vec<Building>,
    /// Craters in impact order
    pub blast_holes: Vec<BlastHole>,
    pub bomb: Bomb,
    /// World-to-screen scale
    pub scale: f32,
    pub viewport: Viewport,
    pub winner: Option<Player>,
    /// Info panel readouts, indexed by player
    pub readouts: [AimReadout; 2],
}

impl MatchState {
    /// Fresh match on `layout`, player 1 aiming in round 1
    pub fn new(layout: Layout, viewport: Viewport) -> Self {
        let mut state = Self {
            phase: GamePhase::Aiming,
            current_player: Player::One,
            round: 1,
            background: layout.background,
            buildings: layout.buildings,
            blast_holes: Vec::new(),
            bomb: Bomb::default(),
            scale: layout.scale,
            viewport,
            winner: None,
            readouts: [AimReadout::default(); 2],
        };
        state.init_bomb();
        state
    }

    /// The building `player` stands on
    pub fn platform(&self, player: Player) -> &Building {
        &self.buildings[platform_index(player, self.buildings.len())]
    }

    /// World position of `player`'s feet
    pub fn gorilla_anchor(&self, player: Player) -> Vec2 {
        self.platform(player).roof_center()
    }

    /// Where `player` holds the bomb before a throw
    pub fn launch_point(&self, player: Player) -> Vec2 {
        let hand = Vec2::new(-player.throw_direction() * HAND_OFFSET_X, HAND_OFFSET_Y);
        self.gorilla_anchor(player) + hand
    }

    /// Put the bomb back in the current player's hand, at rest
    pub fn init_bomb(&mut self) {
        self.bomb = Bomb::at_rest(self.launch_point(self.current_player));
    }

    /// Right edge of the playable area in world units
    pub fn world_width(&self) -> f32 {
        self.viewport.width / self.scale
    }

    /// Recompute the scale for the current viewport
    pub fn rescale(&mut self) {
        if let Some(scale) = compute_scale(&self.buildings, self.viewport.width) {
            self.scale = scale;
        }
    }

    /// Whether `p` lies inside an earlier crater
    pub fn in_blast_hole(&self, p: Vec2) -> bool {
        self.blast_holes.iter().any(|h| h.contains(p))
    }

    /// Pose `player` is drawn in for the current phase
    pub fn pose(&self, player: Player) -> Pose {
        match self.phase {
            GamePhase::Aiming if player == self.current_player => Pose::Aiming {
                velocity: self.bomb.vel,
            },
            GamePhase::Celebrating if self.winner == Some(player) => Pose::Celebrating,
            _ => Pose::Idle,
        }
    }

    /// `player`'s gorilla as currently posed
    pub fn gorilla(&self, player: Player) -> Gorilla {
        Gorilla::new(player, self.gorilla_anchor(player), self.pose(player))
    }

    /// The opponent as a hit target (always idle while a bomb flies at it)
    pub fn target(&self) -> Gorilla {
        let opponent = self.current_player.opponent();
        Gorilla::new(opponent, self.gorilla_anchor(opponent), Pose::Idle)
    }

    /// Readout for `player`'s info panel
    pub fn readout(&self, player: Player) -> AimReadout {
        self.readouts[player as usize]
    }

    pub(crate) fn set_readout(&mut self, player: Player, readout: AimReadout) {
        self.readouts[player as usize] = readout;
    }

    /// Hand the turn to the other player after a miss
    pub(crate) fn pass_turn(&mut self) {
        self.current_player = self.current_player.opponent();
        if self.current_player == Player::One {
            self.round += 1;
        }
        self.phase = GamePhase::Aiming;
        self.init_bomb();
    }
}
