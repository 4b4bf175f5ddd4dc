//! # Rusty-Forum Wiring
//!
//! Turns an [`AppConfig`] into live backends. Shared by the server and
//! `rf-seed` so both talk to the same stores.

use std::sync::Arc;

use anyhow::Context;
use rf_config::{AppConfig, PostBackend};
use rf_core::PostStore;
use rf_db_sqlite::SqliteRepo;

/// Opens the relational database and applies migrations.
pub async fn connect_database(config: &AppConfig) -> anyhow::Result<SqliteRepo> {
    SqliteRepo::connect(&config.database.url, config.database.max_connections)
        .await
        .with_context(|| format!("failed to open database {}", config.database.url))
}

/// Selects the blog post store. `repo` doubles as the store for the
/// `sqlite` backend.
pub async fn build_post_store(config: &AppConfig, repo: &SqliteRepo) -> anyhow::Result<Arc<dyn PostStore>> {
    let store: Arc<dyn PostStore> = match config.posts.backend {
        PostBackend::Sqlite => Arc::new(repo.clone()),

        #[cfg(feature = "docstore-surreal")]
        PostBackend::Document => {
            let path = &config.posts.document_path;
            let store = rf_docstore_surreal::SurrealPostStore::open(path)
                .await
                .with_context(|| format!("failed to open document store {path}"))?;
            Arc::new(store)
        }

        #[cfg(feature = "store-local")]
        PostBackend::Local => Arc::new(rf_store_local::LocalPostStore::new(
            config.posts.local_dir.clone().into(),
        )),

        #[allow(unreachable_patterns)]
        other => anyhow::bail!("post backend {other:?} is not compiled into this build"),
    };
    log::info!("Blog posts stored in {:?} backend", config.posts.backend);
    Ok(store)
}
