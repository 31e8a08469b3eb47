use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::DatabaseError;

pub const DEFAULT_DATABASE_URL: &str = "domino.db";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub url: String,
    pub pool_size: u32,
}

impl DatabaseConfig {
    pub fn from_cli_or_env_or_yaml(cli_arg: Option<String>, yaml_config: Option<String>) -> Self {
        let url = if let Some(arg) = cli_arg {
            arg
        } else if let Ok(env) = std::env::var("DATABASE_URL") {
            env
        } else if let Some(yaml) = yaml_config {
            yaml
        } else {
            DEFAULT_DATABASE_URL.to_string()
        };

        Self { url, pool_size: 4 }
    }

    pub fn in_memory() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            pool_size: 1,
        }
    }

    pub fn is_in_memory(&self) -> bool {
        matches!(self.url.as_str(), ":memory:" | "sqlite::memory:" | "sqlite://:memory:")
    }

    pub async fn create_pool(&self) -> Result<SqlitePool, DatabaseError> {
        // every connection to an in-memory database sees its own empty database,
        // so those pools are pinned to one connection that never gets recycled
        if self.is_in_memory() {
            return SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect("sqlite::memory:")
                .await
                .map_err(|e| DatabaseError::Connection(e.to_string()));
        }

        let options = if self.url.starts_with("sqlite:") {
            SqliteConnectOptions::from_str(&self.url)
                .map_err(|e| DatabaseError::Connection(e.to_string()))?
        } else {
            SqliteConnectOptions::new().filename(&self.url)
        };

        tracing::debug!("Opening sqlite database at {}", self.url);
        SqlitePoolOptions::new()
            .max_connections(self.pool_size)
            .connect_with(options.create_if_missing(true))
            .await
            .map_err(|e| DatabaseError::Connection(e.to_string()))
    }
}
