use std::{cmp::Reverse, collections::HashSet, fmt::Display};

use chrono::{DateTime, Utc};
use itertools::Itertools;
use log;

use crate::{
    clock, GameId, GameSummary, LoserPoints, Player, PlayerId, Round, ValidationError,
    MAX_NAME_LEN, MAX_PLAYERS, MIN_PLAYERS, MIN_TARGET_SCORE,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Active,
    Won { winner: PlayerId },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Game {
    pub id: GameId,
    /// Seating order. Also the tie-break order for victory and ranking.
    pub players: Vec<Player>,
    pub target_score: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub rounds: Vec<Round>,
}

impl Game {
    pub fn new<S: AsRef<str>>(names: &[S], target_score: u32) -> Result<Self, ValidationError> {
        let names: Vec<&str> = names
            .iter()
            .map(|name| name.as_ref().trim())
            .filter(|name| !name.is_empty())
            .collect();

        if names.len() < MIN_PLAYERS {
            return Err(ValidationError::TooFewPlayers(names.len()));
        }
        if names.len() > MAX_PLAYERS {
            return Err(ValidationError::TooManyPlayers(names.len()));
        }
        if let Some(name) = names.iter().find(|name| name.chars().count() > MAX_NAME_LEN) {
            return Err(ValidationError::NameTooLong(name.to_string()));
        }
        let mut seen = HashSet::new();
        for name in &names {
            if !seen.insert(name.to_lowercase()) {
                return Err(ValidationError::DuplicateName(name.to_string()));
            }
        }
        if target_score < MIN_TARGET_SCORE {
            return Err(ValidationError::TargetTooLow(target_score));
        }

        let players: Vec<Player> = names
            .into_iter()
            .map(|name| Player::new(name.to_string()))
            .collect();
        let now = clock::now();
        log::info!(
            "New game with {} to {target_score} points",
            players.iter().map(|p| &p.name).join(", ")
        );

        Ok(Self {
            id: GameId::generate(),
            players,
            target_score,
            created_at: now,
            updated_at: now,
            rounds: Vec::new(),
        })
    }

    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| &p.id == id)
    }

    pub fn player_by_name(&self, name: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.has_name(name))
    }

    /// Credits the winner with the sum of `losers_points`. Players left out of
    /// `losers_points` are recorded with 0 points. Nothing changes on error.
    pub fn record_round(
        &mut self,
        winner_id: &PlayerId,
        losers_points: &[LoserPoints],
    ) -> Result<&Round, ValidationError> {
        let winner_idx = self
            .players
            .iter()
            .position(|p| &p.id == winner_id)
            .ok_or_else(|| ValidationError::UnknownWinner(winner_id.clone()))?;

        let mut seen: HashSet<&PlayerId> = HashSet::new();
        for lp in losers_points {
            if self.player(&lp.player_id).is_none() {
                return Err(ValidationError::UnknownLoser(lp.player_id.clone()));
            }
            if &lp.player_id == winner_id || !seen.insert(&lp.player_id) {
                let name = self.player(&lp.player_id).map_or("", |p| p.name.as_str());
                return Err(ValidationError::DuplicateLoser(name.to_string()));
            }
        }

        let entries: Vec<LoserPoints> = self
            .players
            .iter()
            .filter(|p| &p.id != winner_id)
            .map(|p| {
                let points = losers_points
                    .iter()
                    .find(|lp| lp.player_id == p.id)
                    .map_or(0, |lp| lp.points);
                LoserPoints::new(p.id.clone(), points)
            })
            .collect();

        let round = Round::new(winner_id.clone(), entries);
        let winner = &mut self.players[winner_idx];
        winner.score = winner.score.saturating_add(round.points_gained);
        log::info!(
            "{} gains {} points (now {})",
            winner.name,
            round.points_gained,
            winner.score
        );

        let idx = self.rounds.len();
        self.rounds.push(round);
        self.touch();
        Ok(&self.rounds[idx])
    }

    /// First player in seating order at or above the target, if any.
    pub fn check_victory(&self) -> Option<&Player> {
        let target = u64::from(self.target_score);
        self.players.iter().find(|p| p.score >= target)
    }

    pub fn status(&self) -> GameStatus {
        match self.check_victory() {
            Some(winner) => GameStatus::Won {
                winner: winner.id.clone(),
            },
            None => GameStatus::Active,
        }
    }

    pub fn reset_scores(&mut self) {
        for player in self.players.iter_mut() {
            player.score = 0;
        }
        self.rounds.clear();
        self.touch();
        log::info!("Scores reset for game {}", self.id);
    }

    /// Highest score first; equal scores keep seating order.
    pub fn rank_players(&self) -> Vec<&Player> {
        self.players
            .iter()
            .sorted_by_key(|p| Reverse(p.score))
            .collect()
    }

    /// Players sharing the top score. Empty until someone has scored.
    pub fn leaders(&self) -> Vec<&Player> {
        let max_score = self.players.iter().map(|p| p.score).max().unwrap_or(0);
        if max_score == 0 {
            return Vec::new();
        }
        self.players
            .iter()
            .filter(|p| p.score == max_score)
            .collect()
    }

    /// Fraction of the target reached, capped at 1.
    pub fn progress(&self, player: &Player) -> f64 {
        (player.score as f64 / f64::from(self.target_score.max(1))).min(1.0)
    }

    pub fn round_count(&self) -> usize {
        self.rounds.len()
    }

    pub fn summary(&self) -> GameSummary {
        GameSummary::from(self)
    }

    fn touch(&mut self) {
        self.updated_at = self.updated_at.max(clock::now());
    }
}

impl Display for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rounds = self.round_count();
        let leaders = self.leaders();
        let table_str = self
            .rank_players()
            .iter()
            .enumerate()
            .map(|(idx, player)| {
                format!(
                    "{}. {} ({:.0}%){}",
                    idx + 1,
                    player,
                    self.progress(player) * 100.0,
                    if leaders.contains(player) { " *" } else { "" }
                )
            })
            .join("\n");
        write!(
            f,
            "Target: {} points, {} round{} played\n{}",
            self.target_score,
            rounds,
            if rounds == 1 { "" } else { "s" },
            table_str
        )
    }
}
