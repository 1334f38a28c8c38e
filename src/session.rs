//! Host-side driver for one play session
//!
//! Owns the current [`World`], turns press/release edges into one-shot jump
//! requests, feeds each rendered frame to [`advance`] and reports the final
//! score to the leaderboard when the run ends.
//!
//! A run that doesn't beat the game's high score is recorded at once under
//! the default name. A new record is held until the player enters a name
//! through [`Session::submit_high_score`].

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_PLAYER_NAME, MAX_FRAME_MS};
use crate::error::{Error, Result};
use crate::leaderboard::{GameId, LeaderboardRead, LeaderboardWrite};
use crate::sim::{GameEvent, StepInput, World, WorldConfig, advance};
use crate::tuning::Tuning;

/// Receives events as the session produces them
pub trait EventSink {
    fn on_event(&mut self, event: &GameEvent);
}

impl EventSink for Vec<GameEvent> {
    fn on_event(&mut self, event: &GameEvent) {
        self.push(*event);
    }
}

/// Discards events
impl EventSink for () {
    fn on_event(&mut self, _event: &GameEvent) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Waiting for the player to start
    Ready,
    Playing,
    /// Run ended; the score is submitted or waiting on [`Session::submit_high_score`]
    GameOver,
}

pub struct Session<L: LeaderboardWrite + LeaderboardRead> {
    game_id: GameId,
    config: WorldConfig,
    tuning: Tuning,
    leaderboard: L,
    world: Option<World>,
    phase: SessionPhase,
    score: u32,
    /// Record score waiting for the player's name
    pending_record: Option<u32>,
    /// Fixed seed for reproducible runs; each restart offsets it
    seed: Option<u64>,
    runs: u64,
    // Input latch: a held press yields one jump
    pressed: bool,
    jump_pending: bool,
}

impl<L: LeaderboardWrite + LeaderboardRead> Session<L> {
    pub fn new(game_id: GameId, config: WorldConfig, leaderboard: L) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            game_id,
            config,
            tuning: Tuning::default(),
            leaderboard,
            world: None,
            phase: SessionPhase::Ready,
            score: 0,
            pending_record: None,
            seed: None,
            runs: 0,
            pressed: false,
            jump_pending: false,
        })
    }

    pub fn with_tuning(mut self, tuning: Tuning) -> Result<Self> {
        tuning.validate()?;
        self.tuning = tuning;
        Ok(self)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Begin a run with a brand-new world
    pub fn start(&mut self) -> Result<()> {
        let seed = match self.seed {
            Some(seed) => seed.wrapping_add(self.runs),
            None => rand::random(),
        };
        let world = World::with_tuning(self.config.clone(), &self.tuning, seed)?;
        self.runs += 1;
        log::info!("Starting run {} of {} (seed {seed})", self.runs, self.game_id);

        self.world = Some(world);
        self.phase = SessionPhase::Playing;
        self.score = 0;
        self.pending_record = None;
        self.pressed = false;
        self.jump_pending = false;
        Ok(())
    }

    /// Throw the current world away and play again; an unsubmitted record is dropped
    pub fn restart(&mut self) -> Result<()> {
        self.start()
    }

    /// Press/tap began
    pub fn press(&mut self) {
        if !self.pressed {
            self.pressed = true;
            self.jump_pending = true;
        }
    }

    /// Press/tap ended
    pub fn release(&mut self) {
        self.pressed = false;
    }

    /// Advance one rendered frame
    pub fn frame(&mut self, dt_ms: f32, sink: &mut impl EventSink) -> Result<()> {
        if self.phase != SessionPhase::Playing {
            return Ok(());
        }
        if !dt_ms.is_finite() || dt_ms < 0.0 {
            log::warn!("Ignoring frame with bad delta {dt_ms}");
            return Ok(());
        }
        let dt_ms = if dt_ms > MAX_FRAME_MS {
            log::warn!("Clamping frame delta {dt_ms:.1}ms to {MAX_FRAME_MS}ms");
            MAX_FRAME_MS
        } else {
            dt_ms
        };
        let Some(world) = self.world.take() else {
            return Ok(());
        };

        let input = StepInput {
            jump: std::mem::take(&mut self.jump_pending),
        };
        let (world, events) = advance(world, dt_ms, &input);
        self.world = Some(world);

        for event in &events {
            match *event {
                GameEvent::Jump => {}
                GameEvent::Score { score } => self.score = score,
                GameEvent::GameOver { score } => {
                    self.score = score;
                    self.phase = SessionPhase::GameOver;
                }
            }
            sink.on_event(event);
        }

        if self.phase == SessionPhase::GameOver {
            self.finish_run()?;
        }
        Ok(())
    }

    fn finish_run(&mut self) -> Result<()> {
        if self.leaderboard.is_new_high_score(&self.game_id, self.score) {
            log::info!("New record {} on {}, waiting for a name", self.score, self.game_id);
            self.pending_record = Some(self.score);
            return Ok(());
        }
        self.leaderboard
            .submit_score(&self.game_id, self.score, DEFAULT_PLAYER_NAME)
    }

    /// Record the pending high score under `name`
    ///
    /// Works once per record; blank names are refused and leave the record pending.
    pub fn submit_high_score(&mut self, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::BlankPlayerName);
        }
        let score = self.pending_record.ok_or(Error::NoPendingHighScore)?;
        self.leaderboard.submit_score(&self.game_id, score, name)?;
        self.pending_record = None;
        Ok(())
    }

    /// Record score waiting on [`Session::submit_high_score`]
    pub fn pending_high_score(&self) -> Option<u32> {
        self.pending_record
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Score shown on the HUD (final score once over)
    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn world(&self) -> Option<&World> {
        self.world.as_ref()
    }

    pub fn game_id(&self) -> &GameId {
        &self.game_id
    }

    pub fn leaderboard(&self) -> &L {
        &self.leaderboard
    }

    pub fn leaderboard_mut(&mut self) -> &mut L {
        &mut self.leaderboard
    }
}
