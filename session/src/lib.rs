pub mod config;
pub mod error;
pub mod input;
pub mod manager;

pub use config::AppConfig;
pub use error::SessionError;
pub use manager::SessionManager;
