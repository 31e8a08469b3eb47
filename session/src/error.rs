use database::DatabaseError;
use thiserror::Error;
use types::{GameId, ValidationError};

#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Game not found: {0}")]
    NotFound(GameId),

    #[error("No game in progress")]
    NoCurrentGame,

    #[error(transparent)]
    Storage(#[from] DatabaseError),

    #[error("Configuration error: {0}")]
    Config(String),
}
