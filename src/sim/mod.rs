//! Simulation core
//!
//! All gameplay logic lives here. Nothing in this module draws or reads the
//! clock:
//! - Time only advances through `tick`/`frame` calls
//! - Randomness only comes from the caller's RNG
//! - Computer aiming simulates throws on copies of the match

pub mod ai;
pub mod collision;
pub mod gorilla;
pub mod layout;
pub mod projectile;
pub mod session;
pub mod shape;
pub mod state;
pub mod tick;

pub use ai::{AimDecision, ThrowCandidate, aim_point, search, trials_for_round};
pub use collision::{CollisionMode, Impact, classify, resolve};
pub use gorilla::{Gorilla, Pose};
pub use layout::{Building, Layout, LayoutError, WindowRect, generate_layout};
pub use projectile::Bomb;
pub use session::{BuildingView, GrabArea, Session, Snapshot};
pub use shape::QuadCurve;
pub use state::{AimReadout, BlastHole, GamePhase, MatchState, Player};
pub use tick::{SimulatedThrow, TickResult, release_throw, set_aim_velocity, simulate_throw, tick};
