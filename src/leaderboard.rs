//! Leaderboard collaborators
//!
//! The host submits a final score when a run ends and fetches the top scores
//! for the terminal screen. The real store is a hosted backend; the
//! in-memory board here follows the same write rules.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::MAX_SCORES_PER_GAME;
use crate::error::{Error, Result};

/// Identifier of a user-created game
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameId(pub String);

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GameId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// A single leaderboard entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub player_name: String,
    pub score: u32,
}

/// Records a finished run
pub trait LeaderboardWrite {
    fn submit_score(&mut self, game_id: &GameId, score: u32, player_name: &str) -> Result<()>;
}

/// Reads the best runs for a game
pub trait LeaderboardRead {
    /// Up to `n` best entries (never more than ten), highest first
    fn top_scores(&self, game_id: &GameId, n: usize) -> Vec<ScoreEntry>;

    /// Best score recorded for the game, `None` if the game is unknown
    fn high_score(&self, game_id: &GameId) -> Option<u32>;

    /// Whether `score` would beat the stored high score (ties don't)
    fn is_new_high_score(&self, game_id: &GameId, score: u32) -> bool {
        self.high_score(game_id).is_some_and(|high| score > high)
    }
}

/// Per-game totals kept beside the score list
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameRecord {
    pub high_score: u32,
    pub play_count: u32,
    /// Every submitted run, sorted descending by score
    pub entries: Vec<ScoreEntry>,
}

impl GameRecord {
    /// Insert keeping descending order; a new entry goes ahead of equal scores
    fn insert(&mut self, entry: ScoreEntry) {
        let pos = self
            .entries
            .iter()
            .position(|e| entry.score >= e.score)
            .unwrap_or(self.entries.len());
        self.entries.insert(pos, entry);
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InMemoryLeaderboard {
    games: HashMap<GameId, GameRecord>,
}

impl InMemoryLeaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make a game known to the board (no-op if it already is)
    pub fn register_game(&mut self, game_id: GameId) {
        self.games.entry(game_id).or_default();
    }

    pub fn game(&self, game_id: &GameId) -> Option<&GameRecord> {
        self.games.get(game_id)
    }
}

impl LeaderboardWrite for InMemoryLeaderboard {
    fn submit_score(&mut self, game_id: &GameId, score: u32, player_name: &str) -> Result<()> {
        let record = self
            .games
            .get_mut(game_id)
            .ok_or_else(|| Error::UnknownGame(game_id.clone()))?;

        if score > record.high_score {
            log::info!("New high score for {game_id}: {score} by {player_name}");
            record.high_score = score;
        }
        record.insert(ScoreEntry {
            player_name: player_name.to_string(),
            score,
        });
        record.play_count += 1;
        Ok(())
    }
}

impl LeaderboardRead for InMemoryLeaderboard {
    fn top_scores(&self, game_id: &GameId, n: usize) -> Vec<ScoreEntry> {
        self.games
            .get(game_id)
            .map(|g| {
                g.entries
                    .iter()
                    .take(n.min(MAX_SCORES_PER_GAME))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    fn high_score(&self, game_id: &GameId) -> Option<u32> {
        self.games.get(game_id).map(|g| g.high_score)
    }
}

/// Medal shown on the game-over screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Medal {
    Bronze,
    Silver,
    Gold,
    Platinum,
}

impl Medal {
    pub fn for_score(score: u32) -> Option<Self> {
        match score {
            40.. => Some(Medal::Platinum),
            30..=39 => Some(Medal::Gold),
            20..=29 => Some(Medal::Silver),
            10..=19 => Some(Medal::Bronze),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Medal::Bronze => "Bronze",
            Medal::Silver => "Silver",
            Medal::Gold => "Gold",
            Medal::Platinum => "Platinum",
        }
    }
}
