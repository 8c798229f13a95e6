//! Procedural skyline generation
//!
//! Buildings are laid out left to right in world units with y pointing up.
//! The foreground row is what bombs collide with; the background row is
//! scenery only.

use std::fmt;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::Player;

pub const BACKGROUND_BUILDING_COUNT: usize = 11;
pub const BUILDING_COUNT: usize = 8;
/// Horizontal gap between neighbouring buildings
pub const BUILDING_GAP: f32 = 4.0;
/// Lighting flags generated per foreground building
pub const WINDOWS_PER_BUILDING: usize = 50;
/// Probability that a window is lit
pub const WINDOW_LIT_CHANCE: f64 = 0.33;

const WINDOW_WIDTH: f32 = 10.0;
const WINDOW_HEIGHT: f32 = 12.0;
const WINDOW_GAP: f32 = 15.0;

/// A rectangular building standing on y = 0
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Building {
    pub x: f32,
    pub width: f32,
    pub height: f32,
    /// Window lighting flags (empty for background buildings)
    #[serde(default)]
    pub lights: Vec<bool>,
}

/// A lit window rectangle in world units (bottom-left corner)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Building {
    /// Right edge
    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Top-center of the roof, where a gorilla stands
    #[inline]
    pub fn roof_center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.height)
    }

    /// Whether a square of half-size `half_extent` centered at `p` overlaps the building
    pub fn overlaps_square(&self, p: Vec2, half_extent: f32) -> bool {
        p.x + half_extent > self.x && p.x - half_extent < self.right() && p.y - half_extent < self.height
    }

    /// Rectangles of the lit windows, floors counted down from the roof
    pub fn lit_windows(&self) -> Vec<WindowRect> {
        let floors = ((self.height - WINDOW_GAP) / (WINDOW_HEIGHT + WINDOW_GAP)).ceil().max(0.0) as usize;
        let rooms = ((self.width - WINDOW_GAP) / (WINDOW_WIDTH + WINDOW_GAP)).floor().max(0.0) as usize;

        let mut windows = Vec::new();
        for floor in 0..floors {
            for room in 0..rooms {
                if !self.lights.get(floor * rooms + room).copied().unwrap_or(false) {
                    continue;
                }
                let top = self.height - WINDOW_GAP - floor as f32 * (WINDOW_HEIGHT + WINDOW_GAP);
                windows.push(WindowRect {
                    x: self.x + WINDOW_GAP + room as f32 * (WINDOW_WIDTH + WINDOW_GAP),
                    y: top - WINDOW_HEIGHT,
                    width: WINDOW_WIDTH,
                    height: WINDOW_HEIGHT,
                });
            }
        }
        windows
    }
}

/// Why a set of buildings can't host a match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutError {
    /// Each gorilla needs a platform plus an edge building
    TooFewBuildings { count: usize },
    /// The city has no positive width to scale to the viewport
    EmptyCity,
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewBuildings { count } => {
                write!(f, "layout needs at least 4 foreground buildings, got {count}")
            }
            Self::EmptyCity => write!(f, "foreground buildings span no width"),
        }
    }
}

impl std::error::Error for LayoutError {}

/// A generated skyline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub background: Vec<Building>,
    pub buildings: Vec<Building>,
    /// World-to-screen scale for the viewport the layout was built for
    pub scale: f32,
}

impl Layout {
    /// Assemble a layout from explicit buildings, validating the foreground
    pub fn new(background: Vec<Building>, buildings: Vec<Building>, viewport_width: f32) -> Result<Self, LayoutError> {
        if buildings.len() < 4 {
            return Err(LayoutError::TooFewBuildings { count: buildings.len() });
        }
        let scale = compute_scale(&buildings, viewport_width).ok_or(LayoutError::EmptyCity)?;
        Ok(Self {
            background,
            buildings,
            scale,
        })
    }
}

/// Width of the city from x = 0 to the right edge of the last building
pub fn city_width(buildings: &[Building]) -> Option<f32> {
    buildings.last().map(Building::right).filter(|w| *w > 0.0)
}

/// Scale that fits the whole foreground into `viewport_width` pixels
pub fn compute_scale(buildings: &[Building], viewport_width: f32) -> Option<f32> {
    city_width(buildings).map(|w| viewport_width / w)
}

/// Index of the building a player stands on
#[inline]
pub fn platform_index(player: Player, building_count: usize) -> usize {
    match player {
        Player::One => 1,
        Player::Two => building_count - 2,
    }
}

/// Whether building `index` is reserved for a standing gorilla
#[inline]
fn is_platform(index: usize, count: usize) -> bool {
    index <= 1 || index + 2 >= count
}

fn next_x(previous: Option<&Building>, first_x: f32) -> f32 {
    previous.map_or(first_x, |b| b.right() + BUILDING_GAP)
}

/// Generate a fresh skyline scaled to `viewport_width`
pub fn generate_layout<R: Rng>(rng: &mut R, viewport_width: f32) -> Layout {
    let mut background: Vec<Building> = Vec::with_capacity(BACKGROUND_BUILDING_COUNT);
    for _ in 0..BACKGROUND_BUILDING_COUNT {
        let x = next_x(background.last(), -30.0);
        let width = rng.random_range(60.0..110.0);
        let height = rng.random_range(80.0..350.0);
        background.push(Building {
            x,
            width,
            height,
            lights: Vec::new(),
        });
    }

    let mut buildings: Vec<Building> = Vec::with_capacity(BUILDING_COUNT);
    for index in 0..BUILDING_COUNT {
        let x = next_x(buildings.last(), 0.0);
        let width = rng.random_range(80.0..130.0);
        let height = if is_platform(index, BUILDING_COUNT) {
            rng.random_range(30.0..150.0)
        } else {
            rng.random_range(40.0..300.0)
        };
        let lights = (0..WINDOWS_PER_BUILDING)
            .map(|_| rng.random_bool(WINDOW_LIT_CHANCE))
            .collect();
        buildings.push(Building {
            x,
            width,
            height,
            lights,
        });
    }

    // Widths are at least 80, so the city always has positive width
    let scale = compute_scale(&buildings, viewport_width).unwrap_or(1.0);
    log::debug!(
        "Generated skyline: {} buildings, city width {:.1}, scale {:.3}",
        buildings.len(),
        city_width(&buildings).unwrap_or(0.0),
        scale
    );

    Layout {
        background,
        buildings,
        scale,
    }
}
