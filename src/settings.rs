//! Match settings
//!
//! Loaded from a JSON file by the headless runner; embedders can build them
//! directly.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::sim::Player;

/// How many of the two gorillas are human-controlled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PlayerCount {
    /// Computer vs computer
    Zero,
    /// Human (player 1) vs computer (player 2)
    #[default]
    One,
    /// Human vs human
    Two,
}

impl PlayerCount {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerCount::Zero => "0",
            PlayerCount::One => "1",
            PlayerCount::Two => "2",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "0" | "zero" | "demo" => Some(PlayerCount::Zero),
            "1" | "one" => Some(PlayerCount::One),
            "2" | "two" => Some(PlayerCount::Two),
            _ => None,
        }
    }

    /// Whether the given player is driven by the aim search
    pub fn is_computer(&self, player: Player) -> bool {
        match self {
            PlayerCount::Zero => true,
            PlayerCount::One => player == Player::Two,
            PlayerCount::Two => false,
        }
    }
}

/// Screen size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

/// Match settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Human/computer split
    pub players: PlayerCount,
    /// Initial viewport
    pub viewport: Viewport,
    /// Pause between the computer picking a throw and releasing it (ms)
    pub computer_think_ms: u32,
    /// Pause before the computer starts aiming after a turn change (ms)
    pub computer_turn_delay_ms: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            players: PlayerCount::One,
            viewport: Viewport::default(),
            computer_think_ms: 1000,
            computer_turn_delay_ms: 50,
        }
    }
}

impl Settings {
    /// Parse settings from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load settings from a file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Invalid settings in {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Could not read {}: {}", path.display(), e);
                log::info!("Using default settings");
                Self::default()
            }
        }
    }
}
