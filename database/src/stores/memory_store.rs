use async_trait::async_trait;
use types::GameId;

use super::GameStore;
use crate::{DatabaseError, GameRecord};

/// Keeps serialized records in insertion order, the same shape the browser build
/// kept in local storage. Nothing outlives the process.
#[derive(Debug, Default)]
pub struct MemoryGameStore {
    games: Vec<(GameId, String)>,
    current: Option<GameId>,
}

impl MemoryGameStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    /// Stores raw JSON under `game_id`, bypassing serialization.
    pub fn insert_raw(&mut self, game_id: GameId, json: String) {
        self.games.retain(|(id, _)| id != &game_id);
        self.games.push((game_id, json));
    }

    fn decode(game_id: &GameId, json: &str) -> Result<GameRecord, DatabaseError> {
        GameRecord::from_json(json).map_err(|e| DatabaseError::CorruptRecord {
            id: game_id.to_string(),
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl GameStore for MemoryGameStore {
    async fn put(&mut self, game_id: &GameId, record: &GameRecord) -> Result<(), DatabaseError> {
        let json = record.to_json()?;
        match self.games.iter_mut().find(|(id, _)| id == game_id) {
            Some((_, existing)) => *existing = json,
            None => self.games.push((game_id.clone(), json)),
        }
        Ok(())
    }

    async fn get(&mut self, game_id: &GameId) -> Result<Option<GameRecord>, DatabaseError> {
        self.games
            .iter()
            .find(|(id, _)| id == game_id)
            .map(|(id, json)| Self::decode(id, json))
            .transpose()
    }

    async fn delete(&mut self, game_id: &GameId) -> Result<bool, DatabaseError> {
        let before = self.games.len();
        self.games.retain(|(id, _)| id != game_id);
        Ok(self.games.len() < before)
    }

    async fn delete_many(&mut self, game_ids: &[GameId]) -> Result<(), DatabaseError> {
        self.games.retain(|(id, _)| !game_ids.contains(id));
        Ok(())
    }

    async fn list_all(&mut self) -> Result<Vec<GameRecord>, DatabaseError> {
        let mut records = Vec::with_capacity(self.games.len());
        for (id, json) in &self.games {
            match Self::decode(id, json) {
                Ok(record) => records.push(record),
                Err(e) => tracing::warn!("Skipping unreadable game: {e}"),
            }
        }
        Ok(records)
    }

    async fn set_current(&mut self, game_id: Option<&GameId>) -> Result<(), DatabaseError> {
        self.current = game_id.cloned();
        Ok(())
    }

    async fn get_current(&mut self) -> Result<Option<GameId>, DatabaseError> {
        Ok(self.current.clone())
    }
}
