//! Collaborator-facing match driver
//!
//! A [`Session`] owns the live [`MatchState`], the RNG, and the settings. The
//! presentation layer forwards input here, drives [`Session::frame`] from its
//! animation clock, and draws from [`Session::snapshot`].

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ai::{AimDecision, search, trials_for_round};
use super::gorilla::Gorilla;
use super::layout::{Building, WindowRect, generate_layout};
use super::projectile::Bomb;
use super::state::{AimReadout, BlastHole, GamePhase, MatchState, Player};
use super::tick::{TickResult, release_throw, set_aim_velocity, tick};
use crate::consts::GRAB_AREA_RADIUS;
use crate::settings::{Settings, Viewport};

/// Screen-space square the pointer grabs to start aiming
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrabArea {
    /// Pixels from the left edge of the viewport
    pub left: f32,
    /// Pixels from the bottom edge of the viewport
    pub bottom: f32,
    pub radius: f32,
}

/// A foreground building plus its lit windows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingView {
    #[serde(flatten)]
    pub building: Building,
    pub lit_windows: Vec<WindowRect>,
}

/// Everything the output layer needs to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub current_player: Player,
    pub round: u32,
    pub bomb: Bomb,
    pub background: Vec<Building>,
    pub buildings: Vec<BuildingView>,
    pub blast_holes: Vec<BlastHole>,
    pub scale: f32,
    pub viewport: Viewport,
    pub gorillas: [Gorilla; 2],
    pub readouts: [AimReadout; 2],
    pub grab_area: GrabArea,
    pub winner: Option<Player>,
}

/// Live match plus the machinery around it
#[derive(Debug, Clone)]
pub struct Session {
    pub settings: Settings,
    state: MatchState,
    rng: Pcg32,
    /// Timestamp of the previous animation frame of the current throw
    last_frame_ms: Option<f64>,
    /// Viewport change received mid-throw, applied once the throw ends
    pending_viewport: Option<Viewport>,
}

impl Session {
    /// Start a session and its first match
    pub fn new(settings: Settings, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let state = Self::fresh_match(&mut rng, settings.viewport);
        let mut session = Self {
            settings,
            state,
            rng,
            last_frame_ms: None,
            pending_viewport: None,
        };
        log::info!("New match (seed {}, {} human players)", seed, session.settings.players.as_str());
        session.maybe_start_computer_turn();
        session
    }

    fn fresh_match(rng: &mut Pcg32, viewport: Viewport) -> MatchState {
        MatchState::new(generate_layout(rng, viewport.width), viewport)
    }

    /// Read-only view of the live match
    pub fn state(&self) -> &MatchState {
        &self.state
    }

    /// Whether `player` is controlled by the aim search
    pub fn is_computer(&self, player: Player) -> bool {
        self.settings.players.is_computer(player)
    }

    /// Whether the player to move is a computer waiting to aim
    pub fn computer_to_move(&self) -> bool {
        self.state.phase == GamePhase::Aiming && self.is_computer(self.state.current_player)
    }

    /// Map a pointer drag (screen pixels, y down) to a slingshot velocity
    pub fn drag_to_velocity(dx: f32, dy: f32) -> Vec2 {
        Vec2::new(-dx, dy)
    }

    /// Update the aim while the current player drags
    pub fn set_aim_velocity(&mut self, velocity: Vec2) -> bool {
        set_aim_velocity(&mut self.state, velocity)
    }

    /// Commit the aim and launch the bomb
    pub fn release_throw(&mut self) -> bool {
        let released = release_throw(&mut self.state);
        if released {
            self.last_frame_ms = None;
        }
        released
    }

    /// Throw away the current match and start a new one
    pub fn request_new_match(&mut self) {
        let viewport = self.pending_viewport.take().unwrap_or(self.state.viewport);
        self.state = Self::fresh_match(&mut self.rng, viewport);
        self.last_frame_ms = None;
        log::info!("New match requested");
        self.maybe_start_computer_turn();
    }

    /// The viewport changed size; rescale without touching match progress
    pub fn notify_viewport_resize(&mut self, width: f32, height: f32) {
        let viewport = Viewport { width, height };
        if self.state.phase == GamePhase::InFlight {
            // Scale must stay fixed while a bomb is flying
            self.pending_viewport = Some(viewport);
            return;
        }
        self.apply_viewport(viewport);
    }

    fn apply_viewport(&mut self, viewport: Viewport) {
        self.state.viewport = viewport;
        self.state.rescale();
        if self.state.phase == GamePhase::Aiming {
            let aim = self.state.bomb.vel;
            self.state.init_bomb();
            self.state.bomb.vel = aim;
        }
        log::debug!("Viewport {}x{}, scale {:.3}", viewport.width, viewport.height, self.state.scale);
    }

    /// Advance the live throw by `elapsed_ms`
    pub fn tick(&mut self, elapsed_ms: f32) -> TickResult {
        let result = tick(&mut self.state, elapsed_ms);
        match result {
            TickResult::TurnEnded { .. } | TickResult::MatchWon { .. } => {
                self.last_frame_ms = None;
                if let Some(viewport) = self.pending_viewport.take() {
                    self.apply_viewport(viewport);
                }
            }
            TickResult::Idle | TickResult::Continue => {}
        }
        result
    }

    /// Advance the live throw to animation timestamp `timestamp_ms`.
    ///
    /// The first frame after a release only records the timestamp.
    pub fn frame(&mut self, timestamp_ms: f64) -> TickResult {
        if self.state.phase != GamePhase::InFlight {
            return TickResult::Idle;
        }
        let Some(previous) = self.last_frame_ms.replace(timestamp_ms) else {
            return TickResult::Continue;
        };
        let elapsed = (timestamp_ms - previous).max(0.0) as f32;
        self.tick(elapsed)
    }

    /// Run the aim search for the current player and load the chosen throw.
    ///
    /// Leaves the match in the aiming phase; the caller releases the throw
    /// after `settings.computer_think_ms`. Returns `None` outside aiming.
    pub fn prepare_computer_throw(&mut self) -> Option<AimDecision> {
        if self.state.phase != GamePhase::Aiming {
            return None;
        }
        let trials = trials_for_round(self.state.round);
        let decision = search(&self.state, &mut self.rng, trials);

        self.state.init_bomb();
        set_aim_velocity(&mut self.state, decision.velocity);
        Some(decision)
    }

    fn maybe_start_computer_turn(&mut self) {
        if self.computer_to_move() {
            self.prepare_computer_throw();
        }
    }

    /// Pointer grab handle around the bomb, in screen pixels
    pub fn grab_area(&self) -> GrabArea {
        let launch = self.state.launch_point(self.state.current_player) * self.state.scale;
        GrabArea {
            left: launch.x - GRAB_AREA_RADIUS,
            bottom: launch.y - GRAB_AREA_RADIUS,
            radius: GRAB_AREA_RADIUS,
        }
    }

    /// Everything needed to draw the current frame
    pub fn snapshot(&self) -> Snapshot {
        let state = &self.state;
        Snapshot {
            phase: state.phase,
            current_player: state.current_player,
            round: state.round,
            bomb: state.bomb,
            background: state.background.clone(),
            buildings: state
                .buildings
                .iter()
                .map(|b| BuildingView {
                    building: b.clone(),
                    lit_windows: b.lit_windows(),
                })
                .collect(),
            blast_holes: state.blast_holes.clone(),
            scale: state.scale,
            viewport: state.viewport,
            gorillas: [state.gorilla(Player::One), state.gorilla(Player::Two)],
            readouts: state.readouts,
            grab_area: self.grab_area(),
            winner: state.winner,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::PlayerCount;
    use crate::sim::collision::Impact;
    use crate::sim::gorilla::Pose;

    fn session(players: PlayerCount, seed: u64) -> Session {
        Session::new(
            Settings {
                players,
                ..Default::default()
            },
            seed,
        )
    }

    fn play_out(session: &mut Session) -> TickResult {
        let mut now = 0.0;
        for _ in 0..100_000 {
            now += 16.0;
            let result = session.frame(now);
            if !matches!(result, TickResult::Continue) {
                return result;
            }
        }
        panic!("throw never ended");
    }

    #[test]
    fn test_drag_maps_to_slingshot() {
        assert_eq!(Session::drag_to_velocity(30.0, 40.0), Vec2::new(-30.0, 40.0));
    }

    #[test]
    fn test_first_frame_only_records_timestamp() {
        let mut s = session(PlayerCount::Two, 1);
        let start = s.state().bomb;
        s.set_aim_velocity(Vec2::new(20.0, 60.0));
        assert!(s.release_throw());

        assert_eq!(s.frame(1000.0), TickResult::Continue);
        assert_eq!(s.state().bomb.pos, start.pos);

        assert_eq!(s.frame(1016.0), TickResult::Continue);
        assert!(s.state().bomb.pos.x > start.pos.x);
    }

    #[test]
    fn test_frame_when_not_flying_is_idle() {
        let mut s = session(PlayerCount::Two, 2);
        assert_eq!(s.frame(16.0), TickResult::Idle);
    }

    #[test]
    fn test_zero_velocity_throw_switches_player() {
        let mut s = session(PlayerCount::Two, 3);
        s.set_aim_velocity(Vec2::ZERO);
        s.release_throw();
        let result = play_out(&mut s);

        assert!(matches!(
            result,
            TickResult::TurnEnded {
                next_player: Player::Two,
                impact: Impact::OffScreen | Impact::Building { .. }
            }
        ));
        assert_eq!(s.state().round, 1);
        assert_eq!(s.state().phase, GamePhase::Aiming);
    }

    #[test]
    fn test_computer_prepares_after_human_turn() {
        let mut s = session(PlayerCount::One, 4);
        assert!(!s.computer_to_move());
        s.set_aim_velocity(Vec2::ZERO);
        s.release_throw();
        play_out(&mut s);

        assert!(s.computer_to_move());
        let holes = s.state().blast_holes.clone();
        let decision = s.prepare_computer_throw().unwrap();
        assert_eq!(decision.trials, 5);
        assert!(decision.velocity.x <= 0.0);

        // Aim applied to the real bomb, nothing else moved
        let state = s.state();
        assert_eq!(state.phase, GamePhase::Aiming);
        assert_eq!(state.current_player, Player::Two);
        assert_eq!(state.round, 1);
        assert_eq!(state.blast_holes, holes);
        assert_eq!(state.bomb.vel, decision.velocity);
        assert_eq!(state.bomb.pos, state.launch_point(Player::Two));
        assert_eq!(state.readout(Player::Two), AimReadout::from_velocity(decision.velocity));
    }

    #[test]
    fn test_demo_mode_aims_immediately() {
        let s = session(PlayerCount::Zero, 5);
        assert!(s.computer_to_move());
        assert!(s.state().bomb.vel.x > 0.0);
        assert_ne!(s.state().readout(Player::One), AimReadout::default());
    }

    #[test]
    fn test_new_match_after_win_resets_everything() {
        let mut s = session(PlayerCount::Two, 6);
        let old_layout = s.state().buildings.clone();

        // Force a finished match with some history
        s.state.round = 4;
        s.state.blast_holes.push(BlastHole { pos: Vec2::new(10.0, 10.0) });
        s.state.phase = GamePhase::Celebrating;
        s.state.winner = Some(Player::Two);
        assert!(!s.release_throw());

        s.request_new_match();
        let state = s.state();
        assert_eq!(state.round, 1);
        assert_eq!(state.phase, GamePhase::Aiming);
        assert_eq!(state.current_player, Player::One);
        assert!(state.blast_holes.is_empty());
        assert_eq!(state.winner, None);
        assert_ne!(state.buildings, old_layout);
        assert_eq!(state.readouts, [AimReadout::default(); 2]);
    }

    #[test]
    fn test_resize_rescales_but_waits_for_throw() {
        let mut s = session(PlayerCount::Two, 7);
        let city = s.state().buildings.last().unwrap().right();

        s.notify_viewport_resize(640.0, 480.0);
        assert!((s.state().scale - 640.0 / city).abs() < 1e-6);
        assert_eq!(s.state().round, 1);

        s.set_aim_velocity(Vec2::new(0.0, 10.0));
        s.release_throw();
        s.frame(0.0);
        s.frame(16.0);
        s.notify_viewport_resize(1920.0, 1080.0);
        assert!((s.state().scale - 640.0 / city).abs() < 1e-6);

        play_out(&mut s);
        assert!((s.state().scale - 1920.0 / city).abs() < 1e-5);
        assert_eq!(s.state().viewport.height, 1080.0);
    }

    #[test]
    fn test_snapshot_exposes_frame_state() {
        let mut s = session(PlayerCount::Two, 8);
        s.set_aim_velocity(Vec2::new(25.0, 25.0));
        let snap = s.snapshot();

        assert_eq!(snap.phase, GamePhase::Aiming);
        assert_eq!(snap.buildings.len(), 8);
        assert_eq!(snap.background.len(), 11);
        assert_eq!(snap.gorillas[0].pose, Pose::Aiming { velocity: Vec2::new(25.0, 25.0) });
        assert_eq!(snap.gorillas[1].pose, Pose::Idle);
        assert_eq!(snap.readouts[0].angle, 45);

        let launch = s.state().launch_point(Player::One) * snap.scale;
        assert!((snap.grab_area.left - (launch.x - 15.0)).abs() < 1e-4);
        assert!((snap.grab_area.bottom - (launch.y - 15.0)).abs() < 1e-4);

        let json = serde_json::to_string(&snap).unwrap();
        let back: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.round, snap.round);
    }
}
