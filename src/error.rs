//! Crate error type

use crate::leaderboard::GameId;

/// Errors surfaced by world construction, tuning loads and leaderboard writes.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Play area dimensions must be positive and finite.
    #[error("invalid play area {width}x{height}: dimensions must be positive")]
    InvalidDimensions { width: f32, height: f32 },

    /// Tuning values failed validation.
    #[error("invalid tuning: {0}")]
    Tuning(String),

    /// Tuning file is not valid JSON.
    #[error("tuning parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Tuning file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// High score submitted without a player name.
    #[error("player name must not be blank")]
    BlankPlayerName,

    /// No record score is waiting to be submitted.
    #[error("no high score waiting to be submitted")]
    NoPendingHighScore,

    /// Score submitted for a game that was never registered.
    #[error("game not found: {0}")]
    UnknownGame(GameId),
}

pub type Result<T> = std::result::Result<T, Error>;
