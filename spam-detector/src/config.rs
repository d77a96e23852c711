use crate::error::{Result, SpamError};
use crate::spam::ScorerKind;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub classifier: ClassifierConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_addr: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub scorer: ScorerKind,
    pub eager_training: bool, // Train the statistical model before serving
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    pub database_url: String,
    pub log_enabled: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:5000".to_string(),
        }
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            scorer: ScorerKind::Statistical,
            eager_training: true,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite://spam_log.db".to_string(),
            log_enabled: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| SpamError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.server.listen_addr.parse::<SocketAddr>().map_err(|e| {
            SpamError::Config(format!("Invalid listen address '{}': {}", self.server.listen_addr, e))
        })?;

        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(SpamError::Config(format!(
                "Unknown log format '{}', expected 'pretty' or 'json'",
                self.logging.format
            )));
        }

        if self.storage.log_enabled && !self.storage.database_url.starts_with("sqlite:") {
            return Err(SpamError::Config(format!(
                "Unsupported database URL '{}'",
                self.storage.database_url
            )));
        }

        Ok(())
    }
}
