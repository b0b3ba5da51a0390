use crate::error::Result;
use crate::service::MatcherConfig;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub matcher: MatcherConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 5000,
            },
            database: DatabaseConfig {
                url: "postgres://localhost/pantry".to_string(),
                max_connections: 20,
            },
            matcher: MatcherConfig::default(),
        }
    }
}

impl AppConfig {
    /// Defaults, then `pantry.toml` if present, then `PANTRY_*` env vars (`__` between sections).
    /// `DATABASE_URL` wins over everything for the database url.
    pub fn load() -> Result<Self> {
        let defaults = Self::default();

        let config = Config::builder()
            .set_default("server.host", defaults.server.host)?
            .set_default("server.port", defaults.server.port)?
            .set_default("database.url", defaults.database.url)?
            .set_default("database.max_connections", defaults.database.max_connections)?
            .add_source(File::with_name("pantry").required(false))
            .add_source(
                Environment::with_prefix("PANTRY")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("database.url", std::env::var("DATABASE_URL").ok())?
            .build()?;

        Ok(config.try_deserialize()?)
    }
}
