//! # Rusty-Forum Binary
//!
//! The entry point: load configuration, open the configured backends and
//! serve the JSON API.

use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use anyhow::Context;
use rf_api::middleware::{cors_policy, standard_middleware};
use rf_api::{configure_routes, AppState};
use rf_config::AppConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = AppConfig::load()?;

    // 1. Relational database (boards always live here)
    let repo = rusty_forum::connect_database(&config).await?;

    // 2. Blog post store chosen by configuration
    let posts = rusty_forum::build_post_store(&config, &repo).await?;

    // 3. Shared state, dispatched dynamically to whichever backends were picked
    let state = web::Data::new(AppState::new(posts, Arc::new(repo.clone()), config.locale));

    let (host, port) = (config.server.host.clone(), config.server.port);
    log::info!("Rusty-Forum starting on http://{host}:{port}");

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(standard_middleware())
            .wrap(cors_policy())
            .configure(configure_routes)
    })
    .bind((host.as_str(), port))
    .with_context(|| format!("failed to bind {host}:{port}"))?
    .run()
    .await?;

    repo.close().await;
    log::info!("Rusty-Forum stopped");
    Ok(())
}
