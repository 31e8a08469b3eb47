use async_trait::async_trait;
use types::GameId;

use crate::{DatabaseError, GameRecord};

/// Key-value persistence for whole game records plus the current-game pointer.
/// A `put` replaces the stored record for that id in one step. `delete` works on
/// the raw row and reports whether one was removed, so unreadable records can
/// still be dropped.
#[async_trait]
pub trait GameStore: Send + Sync {
    async fn put(&mut self, game_id: &GameId, record: &GameRecord) -> Result<(), DatabaseError>;
    async fn get(&mut self, game_id: &GameId) -> Result<Option<GameRecord>, DatabaseError>;
    async fn delete(&mut self, game_id: &GameId) -> Result<bool, DatabaseError>;
    async fn delete_many(&mut self, game_ids: &[GameId]) -> Result<(), DatabaseError>;
    async fn list_all(&mut self) -> Result<Vec<GameRecord>, DatabaseError>;
    async fn set_current(&mut self, game_id: Option<&GameId>) -> Result<(), DatabaseError>;
    async fn get_current(&mut self) -> Result<Option<GameId>, DatabaseError>;
}
