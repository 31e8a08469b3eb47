use thiserror::Error;

use crate::PlayerId;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("At least 2 players are required, got {0}")]
    TooFewPlayers(usize),

    #[error("At most 4 players are allowed, got {0}")]
    TooManyPlayers(usize),

    #[error("Player names must be unique: {0}")]
    DuplicateName(String),

    #[error("Player name is longer than 20 characters: {0}")]
    NameTooLong(String),

    #[error("Target score must be at least 10, got {0}")]
    TargetTooLow(u32),

    #[error("Winner is not a player in this game: {0}")]
    UnknownWinner(PlayerId),

    #[error("Points were entered for a player not in this game: {0}")]
    UnknownLoser(PlayerId),

    #[error("{0} cannot be listed twice, or as both winner and loser")]
    DuplicateLoser(String),

    #[error("No player named {0} in this game")]
    UnknownPlayerName(String),

    #[error("Points cannot be negative: {0}")]
    NegativePoints(String),

    #[error("Game is already won by {0}")]
    GameOver(String),
}
