//! Gorilla body geometry
//!
//! Coordinates are relative to the gorilla's feet (the roof center of its
//! building), y up. The torso is a filled polygon and each arm is a quadratic
//! stroke whose shape depends on the pose.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::shape::{QuadCurve, polygon_contains};
use super::state::Player;
use crate::consts::*;

/// Torso outline, counter-clockwise from the crotch
pub const TORSO: [Vec2; 12] = [
    Vec2::new(0.0, 15.0),
    Vec2::new(-7.0, 0.0),
    Vec2::new(-20.0, 0.0),
    Vec2::new(-17.0, 18.0),
    Vec2::new(-20.0, 44.0),
    Vec2::new(-11.0, 77.0),
    Vec2::new(0.0, 84.0),
    Vec2::new(11.0, 77.0),
    Vec2::new(20.0, 44.0),
    Vec2::new(17.0, 18.0),
    Vec2::new(20.0, 0.0),
    Vec2::new(7.0, 0.0),
];

const SHOULDER_X: f32 = 14.0;
const SHOULDER_Y: f32 = 50.0;

/// Arm posture
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Pose {
    /// Arms hanging down
    Idle,
    /// Throwing arm pulled back against the current aim velocity
    Aiming { velocity: Vec2 },
    /// Both arms raised
    Celebrating,
}

/// Which side of the body an arm is on (-1 left, +1 right)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

impl Side {
    fn sign(self) -> f32 {
        match self {
            Side::Left => -1.0,
            Side::Right => 1.0,
        }
    }
}

/// One arm stroke in body-local coordinates
fn arm(side: Side, raised: Option<Vec2>) -> QuadCurve {
    let s = side.sign();
    let shoulder = Vec2::new(s * SHOULDER_X, SHOULDER_Y);
    match raised {
        Some(pull) => QuadCurve::new(
            shoulder,
            Vec2::new(s * 44.0, 63.0),
            Vec2::new(s * HAND_OFFSET_X, HAND_OFFSET_Y) - pull / AIM_DRAG_FACTOR,
        ),
        None => QuadCurve::new(shoulder, Vec2::new(s * 44.0, 45.0), Vec2::new(s * 28.0, 12.0)),
    }
}

/// A gorilla standing at `anchor`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gorilla {
    pub player: Player,
    /// World position of the feet (roof center)
    pub anchor: Vec2,
    pub pose: Pose,
}

impl Gorilla {
    pub fn new(player: Player, anchor: Vec2, pose: Pose) -> Self {
        Self { player, anchor, pose }
    }

    /// Throwing arm side: player 1 throws with the left arm, player 2 with the right
    fn throwing_side(&self) -> Side {
        match self.player {
            Player::One => Side::Left,
            Player::Two => Side::Right,
        }
    }

    /// Torso polygon in world coordinates
    pub fn torso(&self) -> [Vec2; 12] {
        TORSO.map(|v| v + self.anchor)
    }

    /// Left and right arm strokes in world coordinates
    pub fn arms(&self) -> [QuadCurve; 2] {
        let throwing = self.throwing_side();
        [Side::Left, Side::Right].map(|side| {
            let raised = match self.pose {
                Pose::Idle => None,
                Pose::Aiming { velocity } => (side == throwing).then_some(velocity),
                Pose::Celebrating => Some(Vec2::ZERO),
            };
            arm(side, raised).translate(self.anchor)
        })
    }

    /// Whether world point `p` touches the torso or either arm stroke
    pub fn contains(&self, p: Vec2) -> bool {
        let local = p - self.anchor;
        if polygon_contains(&TORSO, local) {
            return true;
        }
        self.arms()
            .iter()
            .any(|arm| arm.stroke_contains(p, ARM_STROKE_WIDTH))
    }
}
