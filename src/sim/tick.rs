//! Throw loop
//!
//! The live driver ([`tick`]) advances the real bomb one animation frame at a
//! time and applies turn transitions. The headless driver
//! ([`simulate_throw`]) replays a throw to completion on a private copy of the
//! state. Both share [`step`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{CollisionMode, Impact, resolve};
use super::state::{AimReadout, GamePhase, MatchState, Player};
use crate::consts::*;

/// Frames a simulated throw may take before it is abandoned
pub const MAX_SIM_FRAMES: u32 = 20_000;

/// What happened during one animation tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TickResult {
    /// No throw in flight; nothing to do
    Idle,
    /// Bomb still flying; schedule another tick
    Continue,
    /// Bomb missed; `next_player` is now aiming
    TurnEnded { next_player: Player, impact: Impact },
    /// Bomb hit the opponent; match over
    MatchWon { winner: Player },
}

/// Where a headless throw ended up
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulatedThrow {
    pub impact: Impact,
    /// Bomb position at the first sub-step that ended the throw
    pub pos: Vec2,
}

/// Advance the bomb by one sub-step and classify the result
pub fn step(state: &mut MatchState, dt_ms: f32, mode: CollisionMode) -> Impact {
    state.bomb.advance(dt_ms, state.current_player);
    resolve(state, mode)
}

/// Update the aim while aiming; returns false (and does nothing) otherwise
pub fn set_aim_velocity(state: &mut MatchState, velocity: Vec2) -> bool {
    if state.phase != GamePhase::Aiming {
        return false;
    }
    state.bomb.vel = velocity;
    state.set_readout(state.current_player, AimReadout::from_velocity(velocity));
    true
}

/// Commit the current aim and launch; ignored outside the aiming phase
pub fn release_throw(state: &mut MatchState) -> bool {
    if state.phase != GamePhase::Aiming {
        log::debug!("Ignoring throw request in {:?}", state.phase);
        return false;
    }
    log::info!(
        "Player {} throws with velocity ({:.1}, {:.1})",
        state.current_player.number(),
        state.bomb.vel.x,
        state.bomb.vel.y
    );
    state.phase = GamePhase::InFlight;
    true
}

/// Advance the live throw by `elapsed_ms`.
///
/// The frame is split into `HIT_DETECTION_PRECISION` sub-steps; the first
/// sub-step that ends the throw stops the frame.
pub fn tick(state: &mut MatchState, elapsed_ms: f32) -> TickResult {
    if state.phase != GamePhase::InFlight {
        return TickResult::Idle;
    }

    let dt = elapsed_ms / HIT_DETECTION_PRECISION as f32;
    for _ in 0..HIT_DETECTION_PRECISION {
        match step(state, dt, CollisionMode::Live) {
            Impact::None => {}
            Impact::Target => {
                let winner = state.current_player;
                state.phase = GamePhase::Celebrating;
                state.winner = Some(winner);
                log::info!("Player {} wins in round {}", winner.number(), state.round);
                return TickResult::MatchWon { winner };
            }
            impact => {
                log::debug!(
                    "Player {} missed ({:?}) at ({:.1}, {:.1})",
                    state.current_player.number(),
                    impact,
                    state.bomb.pos.x,
                    state.bomb.pos.y
                );
                state.pass_turn();
                return TickResult::TurnEnded {
                    next_player: state.current_player,
                    impact,
                };
            }
        }
    }

    TickResult::Continue
}

/// Replay a throw by the current player on a copy of `state`.
///
/// Uses a fixed `SIM_FRAME_MS` clock and never carves blast holes, so the
/// live match is untouched.
pub fn simulate_throw(state: &MatchState, velocity: Vec2) -> SimulatedThrow {
    let mut sim = state.clone();
    sim.init_bomb();
    sim.bomb.vel = velocity;
    sim.phase = GamePhase::InFlight;

    let dt = SIM_FRAME_MS / HIT_DETECTION_PRECISION as f32;
    for _ in 0..MAX_SIM_FRAMES {
        for _ in 0..HIT_DETECTION_PRECISION {
            let impact = step(&mut sim, dt, CollisionMode::Headless);
            if impact.ends_throw() {
                return SimulatedThrow {
                    impact,
                    pos: sim.bomb.pos,
                };
            }
        }
    }

    log::warn!("Simulated throw ({:.1}, {:.1}) never landed", velocity.x, velocity.y);
    SimulatedThrow {
        impact: Impact::None,
        pos: sim.bomb.pos,
    }
}
