//! World state and core simulation types
//!
//! Everything one play session needs lives in [`World`]; a restart builds a
//! new one rather than resetting this one.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::consts::PIPE_PAIRS;
use crate::error::{Error, Result};
use crate::tuning::{Physics, Tuning};

/// Opaque handle to the bird sprite, passed through to the renderer untouched
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpriteRef(pub String);

impl From<&str> for SpriteRef {
    fn from(uri: &str) -> Self {
        Self(uri.to_string())
    }
}

impl From<String> for SpriteRef {
    fn from(uri: String) -> Self {
        Self(uri)
    }
}

/// Inputs supplied by the host screen when a session starts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldConfig {
    /// Play area width (px)
    pub width: f32,
    /// Play area height (px)
    pub height: f32,
    pub sprite: SpriteRef,
}

impl WorldConfig {
    pub fn new(width: f32, height: f32, sprite: impl Into<SpriteRef>) -> Self {
        Self {
            width,
            height,
            sprite: sprite.into(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        let ok = |v: f32| v.is_finite() && v > 0.0;
        if ok(self.width) && ok(self.height) {
            Ok(())
        } else {
            Err(Error::InvalidDimensions {
                width: self.width,
                height: self.height,
            })
        }
    }
}

/// Current phase of a session's world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Bird in flight, pipes scrolling
    Playing,
    /// Bird left the bounds or hit a pipe; the world no longer advances
    GameOver,
}

/// Discrete events reported by a step, in the order they happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum GameEvent {
    Jump,
    Score { score: u32 },
    GameOver { score: u32 },
}

/// The bird
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    /// Velocity in px per reference frame
    pub vel: Vec2,
    pub radius: f32,
}

impl Player {
    pub fn left(&self) -> f32 {
        self.pos.x - self.radius
    }

    pub fn top(&self) -> f32 {
        self.pos.y - self.radius
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + self.radius
    }
}

/// One pipe rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pipe {
    pub rect: Rect,
    /// Set once the bird has passed this pipe's pair
    pub scored: bool,
}

/// A top and bottom pipe sharing one gap
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PipePair {
    pub top: Pipe,
    pub bottom: Pipe,
}

impl PipePair {
    /// Build a pair centered at `x` whose opening starts at `gap_top`
    pub fn new(x: f32, gap_top: f32, physics: &Physics, height: f32) -> Self {
        let size = Vec2::new(physics.pipe_width, height);
        let top = Rect::new(Vec2::new(x, gap_top - height / 2.0), size);
        let bottom = Rect::new(
            Vec2::new(x, gap_top + physics.gap_size + height / 2.0),
            size,
        );
        Self {
            top: Pipe { rect: top, scored: false },
            bottom: Pipe { rect: bottom, scored: false },
        }
    }

    /// Trailing (right) edge of the pair
    pub fn right(&self) -> f32 {
        self.top.rect.right()
    }

    /// Y of the opening's upper edge
    pub fn gap_top(&self) -> f32 {
        self.top.rect.bottom()
    }

    /// Y of the opening's lower edge
    pub fn gap_bottom(&self) -> f32 {
        self.bottom.rect.top()
    }

    pub fn scored(&self) -> bool {
        self.top.scored
    }

    pub fn set_scored(&mut self, scored: bool) {
        self.top.scored = scored;
        self.bottom.scored = scored;
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.top.rect.translate(delta);
        self.bottom.rect.translate(delta);
    }

    pub fn rects(&self) -> [&Rect; 2] {
        [&self.top.rect, &self.bottom.rect]
    }
}

/// Complete simulation state for one play session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    pub width: f32,
    pub height: f32,
    pub sprite: SpriteRef,
    pub physics: Physics,
    pub player: Player,
    pub pipes: [PipePair; PIPE_PAIRS],
    /// Static ground strip, drawn only
    pub floor: Rect,
    pub score: u32,
    pub phase: GamePhase,
    /// Number of steps applied
    pub frames: u64,
    /// Seed the gap source was built from
    pub seed: u64,
    rng: Pcg32,
}

impl World {
    /// Build a world with a randomly seeded gap source
    pub fn new(config: WorldConfig) -> Result<Self> {
        let seed = rand::rng().random::<u64>();
        Self::with_seed(config, seed)
    }

    /// Build a world whose gap placement is reproducible from `seed`
    pub fn with_seed(config: WorldConfig, seed: u64) -> Result<Self> {
        Self::with_tuning(config, &Tuning::default(), seed)
    }

    pub fn with_tuning(config: WorldConfig, tuning: &Tuning, seed: u64) -> Result<Self> {
        config.validate()?;
        tuning.validate()?;

        let WorldConfig { width, height, sprite } = config;
        let physics = tuning.scaled(height);
        let mut rng = Pcg32::seed_from_u64(seed);

        let player = Player {
            pos: Vec2::new(width / 4.0, height / 2.0),
            vel: Vec2::ZERO,
            radius: physics.player_radius,
        };
        let floor = Rect::new(
            Vec2::new(width / 2.0, height),
            Vec2::new(width, physics.floor_height),
        );

        let first_gap = draw_gap_top(&mut rng, &physics, height);
        let second_gap = draw_gap_top(&mut rng, &physics, height);
        let pipes = [
            PipePair::new(width, first_gap, &physics, height),
            PipePair::new(width * 1.5 + physics.pipe_width / 2.0, second_gap, &physics, height),
        ];

        Ok(Self {
            width,
            height,
            sprite,
            physics,
            player,
            pipes,
            floor,
            score: 0,
            phase: GamePhase::Playing,
            frames: 0,
            seed,
            rng,
        })
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Move a pair back to the right edge with a fresh gap
    pub fn recycle_pair(&mut self, index: usize) {
        let gap_top = draw_gap_top(&mut self.rng, &self.physics, self.height);
        self.pipes[index] = PipePair::new(self.width, gap_top, &self.physics, self.height);
    }

    /// Every pipe rectangle, top then bottom, pair by pair
    pub fn pipe_rects(&self) -> impl Iterator<Item = &Rect> {
        self.pipes.iter().flat_map(|pair| pair.rects())
    }
}

/// Draw the y of a gap's upper edge
///
/// Uniform in `[margin, height - gap - margin)`. Small play areas make this
/// range degenerate or inverted; the result is not clamped.
pub fn draw_gap_top(rng: &mut Pcg32, physics: &Physics, height: f32) -> f32 {
    let span = height - physics.gap_size - 2.0 * physics.gap_margin;
    rng.random::<f32>() * span + physics.gap_margin
}
