use std::path::Path;

use database::DatabaseConfig;
use serde::Deserialize;
use types::DEFAULT_TARGET_SCORE;

use crate::{input, SessionError};

/// Optional YAML settings file.
///
/// ```yaml
/// database_url: /home/me/.local/share/domino.db
/// default_target_score: 150
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
pub struct AppConfig {
    pub database_url: Option<String>,
    pub default_target_score: Option<u32>,
}

impl AppConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, SessionError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml).map_err(|e| SessionError::Config(e.to_string()))
    }

    pub fn load(path: Option<&Path>) -> Result<Self, SessionError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| SessionError::Config(format!("{}: {e}", path.display())))?;
        log::debug!("Loaded config from {}", path.display());
        Self::from_yaml_str(&yaml)
    }

    pub fn database_config(&self, cli_arg: Option<String>) -> DatabaseConfig {
        DatabaseConfig::from_cli_or_env_or_yaml(cli_arg, self.database_url.clone())
    }

    /// Target from the command line if given, else the configured default.
    pub fn target_score(&self, cli_arg: Option<&str>) -> u32 {
        match cli_arg {
            Some(arg) => input::parse_target(arg),
            None => self.default_target_score.unwrap_or(DEFAULT_TARGET_SCORE),
        }
    }
}
