//! Data-driven game balance
//!
//! Base values are authored for an 800px tall viewport and scaled to the
//! session's play area once, when the world is built.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::REFERENCE_HEIGHT;
use crate::error::{Error, Result};

/// Base tuning at the reference height
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Height (px) the other values are authored against
    pub reference_height: f32,
    /// Bird diameter (px)
    pub bird_size: f32,
    /// Pipe width (px)
    pub pipe_width: f32,
    /// Vertical opening between top and bottom pipe (px)
    pub gap_size: f32,
    /// Downward gravity (rigid-body units)
    pub gravity: f32,
    /// Upward velocity set on jump (px/frame)
    pub jump_impulse: f32,
    /// Pipe scroll per frame (px)
    pub scroll_speed: f32,
    /// Floor thickness (px, not scaled)
    pub floor_height: f32,
    /// Minimum distance from the gap to either screen edge (px, not scaled)
    pub gap_margin: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            reference_height: REFERENCE_HEIGHT,
            bird_size: 50.0,
            pipe_width: 100.0,
            gap_size: 200.0,
            gravity: 0.6,
            jump_impulse: 8.0,
            scroll_speed: 3.0,
            floor_height: 50.0,
            gap_margin: 100.0,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON; missing fields fall back to defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.as_ref().display());
        Ok(tuning)
    }

    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("reference_height", self.reference_height),
            ("bird_size", self.bird_size),
            ("pipe_width", self.pipe_width),
            ("gap_size", self.gap_size),
            ("jump_impulse", self.jump_impulse),
            ("scroll_speed", self.scroll_speed),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::Tuning(format!("{name} must be positive, got {value}")));
            }
        }
        let non_negative = [
            ("gravity", self.gravity),
            ("floor_height", self.floor_height),
            ("gap_margin", self.gap_margin),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(Error::Tuning(format!("{name} must not be negative, got {value}")));
            }
        }
        Ok(())
    }

    /// Derive the per-session physics for a play area of the given height
    pub fn scaled(&self, height: f32) -> Physics {
        let scale = height / self.reference_height;
        Physics {
            scale,
            gravity: self.gravity * scale,
            jump_impulse: self.jump_impulse * scale,
            scroll_speed: self.scroll_speed * scale,
            gap_size: self.gap_size * scale,
            pipe_width: self.pipe_width * scale,
            player_radius: self.bird_size * scale / 2.0,
            floor_height: self.floor_height,
            gap_margin: self.gap_margin,
        }
    }
}

/// Scalars fixed for one session, derived from [`Tuning`] and the play height
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Physics {
    pub scale: f32,
    pub gravity: f32,
    pub jump_impulse: f32,
    pub scroll_speed: f32,
    pub gap_size: f32,
    pub pipe_width: f32,
    pub player_radius: f32,
    pub floor_height: f32,
    pub gap_margin: f32,
}
