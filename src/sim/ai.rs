//! Computer opponent
//!
//! Monte-Carlo aim search: throw a handful of random bananas headlessly and
//! keep the one that lands closest to a point just above the opponent.
//! Later rounds get more trials, so the computer sharpens as the match drags on.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::MatchState;
use super::tick::simulate_throw;
use crate::consts::*;
use crate::velocity_from_angle;

/// Angle used when no trials are available
const FALLBACK_ANGLE_DEG: f32 = 45.0;

/// Trials the computer gets in `round`
#[inline]
pub fn trials_for_round(round: u32) -> u32 {
    2 + round * 3
}

/// One sampled throw and how far it landed from the aim point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThrowCandidate {
    pub velocity: Vec2,
    pub distance: f32,
}

/// Result of an aim search
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AimDecision {
    pub velocity: Vec2,
    /// Miss distance of the chosen throw (`None` for the fallback toss)
    pub distance: Option<f32>,
    /// Headless throws simulated
    pub trials: u32,
}

/// Point the computer tries to land on: 30 units above the opponent's roof center
pub fn aim_point(state: &MatchState) -> Vec2 {
    state.gorilla_anchor(state.current_player.opponent()) + Vec2::new(0.0, AIM_POINT_HEIGHT)
}

/// Lob toward the opponent used when the search has no budget
pub fn fallback_velocity(state: &MatchState) -> Vec2 {
    let speed = (AI_MIN_SPEED + AI_MAX_SPEED) / 2.0;
    velocity_from_angle(FALLBACK_ANGLE_DEG, speed, state.current_player.throw_direction())
}

/// Sample one random throw toward the opponent
fn sample_velocity<R: Rng>(rng: &mut R, direction: f32) -> Vec2 {
    let angle = rng.random_range(0.0..=AI_MAX_ANGLE_DEG);
    let speed = rng.random_range(AI_MIN_SPEED..=AI_MAX_SPEED);
    velocity_from_angle(angle, speed, direction)
}

/// Pick the best of `trials` random throws for the current player.
///
/// Works on copies only; `state` is not modified.
pub fn search<R: Rng>(state: &MatchState, rng: &mut R, trials: u32) -> AimDecision {
    let direction = state.current_player.throw_direction();
    let target = aim_point(state);

    let mut best: Option<ThrowCandidate> = None;
    for _ in 0..trials {
        let velocity = sample_velocity(rng, direction);
        let landing = simulate_throw(state, velocity);
        let distance = landing.pos.distance(target);

        // Strictly closer only: ties keep the earlier trial
        if best.is_none_or(|b| distance < b.distance) {
            best = Some(ThrowCandidate { velocity, distance });
        }
    }

    let decision = match best {
        Some(candidate) => AimDecision {
            velocity: candidate.velocity,
            distance: Some(candidate.distance),
            trials,
        },
        None => AimDecision {
            velocity: fallback_velocity(state),
            distance: None,
            trials: 0,
        },
    };

    log::debug!(
        "Player {} aim search: {} trials, best ({:.1}, {:.1}) misses by {:?}",
        state.current_player.number(),
        decision.trials,
        decision.velocity.x,
        decision.velocity.y,
        decision.distance
    );
    decision
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Viewport;
    use crate::sim::layout::generate_layout;
    use crate::sim::state::Player;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn new_state(seed: u64) -> MatchState {
        let mut rng = Pcg32::seed_from_u64(seed);
        let viewport = Viewport::default();
        MatchState::new(generate_layout(&mut rng, viewport.width), viewport)
    }

    #[test]
    fn test_trial_budget_grows_with_round() {
        assert_eq!(trials_for_round(1), 5);
        assert_eq!(trials_for_round(2), 8);
        assert_eq!(trials_for_round(10), 32);
    }

    #[test]
    fn test_round_one_search_runs_five_trials_toward_opponent() {
        let mut state = new_state(21);
        let mut rng = Pcg32::seed_from_u64(5);

        state.current_player = Player::Two;
        state.init_bomb();
        let decision = search(&state, &mut rng, trials_for_round(state.round));
        assert_eq!(decision.trials, 5);
        assert!(decision.velocity.x <= 0.0);
        assert!(decision.velocity.y >= 0.0);
        assert!(decision.distance.is_some());

        state.current_player = Player::One;
        state.init_bomb();
        let decision = search(&state, &mut rng, 5);
        assert!(decision.velocity.x >= 0.0);
    }

    #[test]
    fn test_search_keeps_closest_trial() {
        let state = new_state(8);
        let target = aim_point(&state);

        // Replay the same samples to compute every candidate's miss distance
        let mut replay = Pcg32::seed_from_u64(77);
        let distances: Vec<f32> = (0..8)
            .map(|_| {
                let v = sample_velocity(&mut replay, 1.0);
                simulate_throw(&state, v).pos.distance(target)
            })
            .collect();
        let min = distances.iter().copied().fold(f32::INFINITY, f32::min);

        let mut rng = Pcg32::seed_from_u64(77);
        let decision = search(&state, &mut rng, 8);
        assert_eq!(decision.distance, Some(min));
    }

    #[test]
    fn test_zero_trials_falls_back() {
        let mut state = new_state(3);
        let mut rng = Pcg32::seed_from_u64(1);

        let decision = search(&state, &mut rng, 0);
        assert_eq!(decision.trials, 0);
        assert_eq!(decision.distance, None);
        assert!(decision.velocity.x > 0.0 && decision.velocity.y > 0.0);

        state.current_player = Player::Two;
        let decision = search(&state, &mut rng, 0);
        assert!(decision.velocity.x < 0.0);
        assert!((decision.velocity.length() - 70.0).abs() < 1e-3);
    }

    #[test]
    fn test_search_does_not_touch_match() {
        let state = new_state(13);
        let before = serde_json::to_string(&state).unwrap();
        let mut rng = Pcg32::seed_from_u64(9);
        search(&state, &mut rng, trials_for_round(4));
        assert_eq!(serde_json::to_string(&state).unwrap(), before);
    }

    #[test]
    fn test_aim_point_above_opponent() {
        let state = new_state(17);
        let b = state.platform(Player::Two);
        assert_eq!(aim_point(&state), Vec2::new(b.x + b.width / 2.0, b.height + 30.0));
    }
}
