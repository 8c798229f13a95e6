//! Bomb ballistics
//!
//! Semi-implicit Euler under constant gravity. Velocity is expressed in world
//! units per `TIME_UNIT_MS`, so `elapsed / TIME_UNIT_MS` scales every update.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::Player;
use crate::consts::*;

/// The thrown banana
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bomb {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Cosmetic spin (radians)
    pub rotation: f32,
}

impl Default for Bomb {
    fn default() -> Self {
        Self::at_rest(Vec2::ZERO)
    }
}

impl Bomb {
    /// A motionless bomb at `pos`
    pub fn at_rest(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            rotation: 0.0,
        }
    }

    /// Advance by `elapsed_ms` of game time.
    ///
    /// Velocity is updated before position within the same step.
    pub fn advance(&mut self, elapsed_ms: f32, thrower: Player) {
        let multiplier = elapsed_ms / TIME_UNIT_MS;

        self.vel.y -= GRAVITY * multiplier;
        self.pos += self.vel * multiplier;
        self.rotation += thrower.spin_direction() * SPIN_RATE * multiplier;
    }
}
