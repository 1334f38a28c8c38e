//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied frame deltas only
//! - Seeded RNG only
//! - Fixed pipe pair order
//! - No rendering or platform dependencies

pub mod collision;
pub mod state;
pub mod tick;

pub use collision::{Rect, circle_overlaps_rect};
pub use state::{
    GameEvent, GamePhase, Pipe, PipePair, Player, SpriteRef, World, WorldConfig, draw_gap_top,
};
pub use tick::{StepInput, advance};
