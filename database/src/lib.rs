pub mod config;
pub mod error;
pub mod models;
pub mod stores;


pub use config::DatabaseConfig;
pub use error::DatabaseError;
pub use models::{GameRecord, LoserPointsRecord, PlayerRecord, RoundRecord};
pub use stores::{GameStore, MemoryGameStore, SqliteGameStore};
