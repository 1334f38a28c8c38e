//! Flappy Creator - simulation core for a create-your-own Flappy Bird game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, pipes, scoring, game over)
//! - `tuning`: Data-driven game balance
//! - `session`: Host-side frame driver for one play session
//! - `leaderboard`: Score submission / top-N collaborators

pub mod error;
pub mod leaderboard;
pub mod session;
pub mod sim;
pub mod tuning;

pub use error::{Error, Result};
pub use leaderboard::{GameId, InMemoryLeaderboard, LeaderboardRead, LeaderboardWrite, Medal};
pub use session::{EventSink, Session, SessionPhase};
pub use sim::{GameEvent, StepInput, World, WorldConfig, advance};
pub use tuning::{Physics, Tuning};

/// Game configuration constants
pub mod consts {
    /// Viewport height the base tuning values are authored against
    pub const REFERENCE_HEIGHT: f32 = 800.0;
    /// Reference frame duration (ms); velocities are expressed per frame of this length
    pub const FRAME_MS: f32 = 1000.0 / 60.0;
    /// Rigid-body gravity scale (gravity 1.0 == 0.001 px/ms²)
    pub const GRAVITY_SCALE: f32 = 0.001;
    /// Largest frame delta the session forwards to the simulation
    pub const MAX_FRAME_MS: f32 = 100.0;

    /// Number of recycled pipe pairs
    pub const PIPE_PAIRS: usize = 2;
    /// Leaderboard entries kept per game
    pub const MAX_SCORES_PER_GAME: usize = 10;
    /// Name used when the player never entered one
    pub const DEFAULT_PLAYER_NAME: &str = "Player";
}
