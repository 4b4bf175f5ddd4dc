//! # rf-config
//!
//! Layered runtime configuration: built-in defaults, then an optional
//! `rusty-forum.toml`, then `RF__`-prefixed environment variables
//! (e.g. `RF__SERVER__PORT=9000`, `RF__POSTS__BACKEND=local`).

use std::collections::HashMap;

use config::{Config, Environment, File};
use rf_core::messages::Locale;
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_FILE: &str = "rusty-forum";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub posts: PostsConfig,
    pub locale: Locale,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// The relational database. Always used for boards; also for blog posts
/// when `posts.backend = "sqlite"`.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// Which storage holds blog posts. Chosen once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostBackend {
    Sqlite,
    Document,
    Local,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PostsConfig {
    pub backend: PostBackend,
    /// SurrealDB directory, or `mem://`.
    pub document_path: String,
    /// Directory of the local key/value store.
    pub local_dir: String,
}

impl AppConfig {
    /// Reads `rusty-forum.{toml,json,yaml}` if present and the process
    /// environment, after merging a `.env` file into it.
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            log::debug!("Loaded environment from {}", path.display());
        }
        Self::build(Some(DEFAULT_FILE), None)
    }

    /// `env` replaces the process environment when given (used by tests).
    fn build(file: Option<&str>, env: Option<HashMap<String, String>>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080_i64)?
            .set_default("database.url", "sqlite:rusty_forum.db")?
            .set_default("database.max_connections", 5_i64)?
            .set_default("posts.backend", "sqlite")?
            .set_default("posts.document_path", "data/documents")?
            .set_default("posts.local_dir", "data/local")?
            .set_default("locale", "ko")?;

        if let Some(file) = file {
            builder = builder.add_source(File::with_name(file).required(false));
        }
        builder = builder.add_source(
            Environment::with_prefix("RF")
                .separator("__")
                .try_parsing(true)
                .source(env),
        );

        let config: AppConfig = builder.build()?.try_deserialize()?;
        log::debug!("Loaded configuration: {config:?}");
        Ok(config)
    }
}
