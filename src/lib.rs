//! Gorilla Toss - a skyline artillery duel
//!
//! Core modules:
//! - `sim`: Simulation core (layout, bomb physics, collisions, turns, computer aim)
//! - `settings`: Match configuration loaded from JSON
//!
//! Rendering is left to the caller: every frame it reads a [`sim::Snapshot`]
//! and converts world units to pixels with `snapshot.scale`.

pub mod settings;
pub mod sim;

pub use settings::{PlayerCount, Settings, Viewport};
pub use sim::{Session, Snapshot};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Duration that maps one unit of velocity to one unit of distance (ms)
    pub const TIME_UNIT_MS: f32 = 200.0;
    /// Gravitational deceleration applied to vertical velocity per time unit
    pub const GRAVITY: f32 = 20.0;
    /// Cosmetic bomb spin per time unit (radians)
    pub const SPIN_RATE: f32 = 5.0;
    /// Physics/collision sub-steps per animation tick
    pub const HIT_DETECTION_PRECISION: u32 = 10;
    /// Synthetic frame length used when simulating throws headlessly (ms)
    pub const SIM_FRAME_MS: f32 = 16.0;

    /// Half-size of the bomb's bounding square for building hits
    pub const BOMB_HALF_EXTENT: f32 = 4.0;
    /// Radius of the crater a bomb leaves in a building
    pub const BLAST_HOLE_RADIUS: f32 = 18.0;

    /// Throwing hand offset from the gorilla's feet (x is mirrored for player 1)
    pub const HAND_OFFSET_X: f32 = 28.0;
    pub const HAND_OFFSET_Y: f32 = 107.0;
    /// The aiming arm trails the bomb by velocity / this factor
    pub const AIM_DRAG_FACTOR: f32 = 6.25;
    /// Arms are stroked with this line width
    pub const ARM_STROKE_WIDTH: f32 = 18.0;

    /// Computer aims this far above the opponent's rooftop
    pub const AIM_POINT_HEIGHT: f32 = 30.0;
    /// Computer throw speed range
    pub const AI_MIN_SPEED: f32 = 40.0;
    pub const AI_MAX_SPEED: f32 = 100.0;
    /// Computer throw angle range (degrees)
    pub const AI_MAX_ANGLE_DEG: f32 = 90.0;

    /// Radius of the HTML grab handle around the bomb (pixels)
    pub const GRAB_AREA_RADIUS: f32 = 15.0;
}

/// Convert a throw angle (degrees) and speed into a velocity vector.
///
/// `direction` is +1 for throwing right, -1 for throwing left.
#[inline]
pub fn velocity_from_angle(angle_deg: f32, speed: f32, direction: f32) -> Vec2 {
    let theta = angle_deg.to_radians();
    Vec2::new(theta.cos() * speed * direction, theta.sin() * speed)
}

/// Elevation angle (degrees) and speed of a velocity vector.
///
/// A zero vector reports angle 0 rather than NaN.
#[inline]
pub fn angle_and_speed(velocity: Vec2) -> (f32, f32) {
    let speed = velocity.length();
    if speed == 0.0 {
        return (0.0, 0.0);
    }
    ((velocity.y / speed).clamp(-1.0, 1.0).asin().to_degrees(), speed)
}
