use async_trait::async_trait;
use sqlx::{Row, SqlitePool};
use types::GameId;

use super::GameStore;
use crate::{DatabaseConfig, DatabaseError, GameRecord};

const CURRENT_GAME_KEY: &str = "current_game";

pub struct SqliteGameStore {
    pool: SqlitePool,
}

impl SqliteGameStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connects using `config` and brings the schema up to date.
    pub async fn open(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let store = Self::new(config.create_pool().await?);
        store.run_migrations().await?;
        Ok(store)
    }

    pub async fn run_migrations(&self) -> Result<(), DatabaseError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| DatabaseError::Migration(e.to_string()))?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    fn decode(id: String, json: &str) -> Result<GameRecord, DatabaseError> {
        GameRecord::from_json(json).map_err(|e| DatabaseError::CorruptRecord {
            id,
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl GameStore for SqliteGameStore {
    async fn put(&mut self, game_id: &GameId, record: &GameRecord) -> Result<(), DatabaseError> {
        let json = record.to_json()?;
        sqlx::query(
            "INSERT INTO games (id, record, updated_at) VALUES (?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET record = excluded.record, updated_at = excluded.updated_at",
        )
        .bind(game_id.as_str())
        .bind(json)
        .bind(record.effective_updated_at().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| DatabaseError::Query(e.to_string()))?;

        tracing::debug!("Saved game {game_id}");
        Ok(())
    }

    async fn get(&mut self, game_id: &GameId) -> Result<Option<GameRecord>, DatabaseError> {
        let row = sqlx::query("SELECT record FROM games WHERE id = ?")
            .bind(game_id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DatabaseError::Query(e.to_string()))?;

        match row {
            Some(r) => {
                let json: String = r.get("record");
                Ok(Some(Self::decode(game_id.to_string(), &json)?))
            }
            None => Ok(None),
        }
    }

    async fn delete(&mut self, game_id: &GameId) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM games WHERE id = ?")
            .bind(game_id.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| DatabaseError::Query(e.to_string()))?;

        let removed = result.rows_affected() > 0;
        if removed {
            tracing::info!("Deleted game {game_id}");
        }
        Ok(removed)
    }

    async fn delete_many(&mut self, game_ids: &[GameId]) -> Result<(), DatabaseError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DatabaseError::Transaction(e.to_string()))?;

        for game_id in game_ids {
            sqlx::query("DELETE FROM games WHERE id = ?")
                .bind(game_id.as_str())
                .execute(&mut *tx)
                .await
                .map_err(|e| DatabaseError::Query(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| DatabaseError::Transaction(e.to_string()))?;

        tracing::info!("Deleted {} games", game_ids.len());
        Ok(())
    }

    async fn list_all(&mut self) -> Result<Vec<GameRecord>, DatabaseError> {
        let rows = sqlx::query("SELECT id, record FROM games ORDER BY rowid")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DatabaseError::Query(e.to_string()))?;

        let mut records = Vec::with_capacity(rows.len());
        for r in rows {
            let id: String = r.get("id");
            let json: String = r.get("record");
            match Self::decode(id, &json) {
                Ok(record) => records.push(record),
                Err(e) => tracing::warn!("Skipping unreadable game: {e}"),
            }
        }
        Ok(records)
    }

    async fn set_current(&mut self, game_id: Option<&GameId>) -> Result<(), DatabaseError> {
        let query = match game_id {
            Some(id) => sqlx::query(
                "INSERT INTO settings (key, value) VALUES (?, ?)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            )
            .bind(CURRENT_GAME_KEY)
            .bind(id.as_str()),
            None => sqlx::query("DELETE FROM settings WHERE key = ?").bind(CURRENT_GAME_KEY),
        };
        query
            .execute(&self.pool)
            .await
            .map_err(|e| DatabaseError::Query(e.to_string()))?;
        Ok(())
    }

    async fn get_current(&mut self) -> Result<Option<GameId>, DatabaseError> {
        let row = sqlx::query("SELECT value FROM settings WHERE key = ?")
            .bind(CURRENT_GAME_KEY)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DatabaseError::Query(e.to_string()))?;

        Ok(row.map(|r| GameId::from(r.get::<String, _>("value"))))
    }
}
