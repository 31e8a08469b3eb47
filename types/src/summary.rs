use std::fmt::Display;

use chrono::{DateTime, Utc};
use itertools::Itertools;

use crate::{Game, GameId};

/// Listing view of a stored game, rebuilt from the game every time it is read.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameSummary {
    pub id: GameId,
    pub player_names: Vec<String>,
    pub scores: Vec<u64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Game> for GameSummary {
    fn from(game: &Game) -> Self {
        Self {
            id: game.id.clone(),
            player_names: game.players.iter().map(|p| p.name.clone()).collect(),
            scores: game.players.iter().map(|p| p.score).collect(),
            created_at: game.created_at,
            updated_at: game.updated_at,
        }
    }
}

impl GameSummary {
    /// Name of the first player holding the top score, once anyone has scored.
    pub fn leader(&self) -> Option<&str> {
        let max_score = self.scores.iter().max().filter(|&&score| score > 0)?;
        self.scores
            .iter()
            .position(|score| score == max_score)
            .and_then(|idx| self.player_names.get(idx))
            .map(String::as_str)
    }
}

impl Display for GameSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let scores_str = self
            .player_names
            .iter()
            .zip(&self.scores)
            .map(|(name, score)| format!("{name} {score}"))
            .join(" | ");
        write!(
            f,
            "{} [{}] {}",
            self.updated_at.format("%Y-%m-%d %H:%M"),
            self.id,
            scores_str
        )?;
        if let Some(leader) = self.leader() {
            write!(f, " (leader: {leader})")?;
        }
        Ok(())
    }
}
