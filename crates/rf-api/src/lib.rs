//! # rf-api
//!
//! The web routing and orchestration layer for Rusty-Forum.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod state;

pub use error::ApiError;
pub use state::AppState;

use actix_web::web;

/// Configures the JSON API routes.
///
/// # Developer Note
/// Everything is mounted under `/api` so a UI can share the origin.
/// The binary supplies `web::Data<AppState>` and the outer middleware.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .app_data(middleware::json_config())
            .app_data(middleware::query_config())
            // Blog posts
            .service(
                web::resource("/posts")
                    .route(web::get().to(handlers::list_posts))
                    .route(web::post().to(handlers::create_post)),
            )
            .service(
                web::resource("/posts/{id}")
                    .route(web::get().to(handlers::get_post))
                    .route(web::delete().to(handlers::delete_post)),
            )
            // Boards
            .service(web::resource("/boards").route(web::get().to(handlers::list_boards)))
            .service(web::resource("/boards/{slug}").route(web::get().to(handlers::get_board)))
            .service(
                web::resource("/boards/{slug}/posts")
                    .route(web::get().to(handlers::list_board_posts))
                    .route(web::post().to(handlers::create_board_post)),
            )
            .service(
                web::resource("/boards/{slug}/posts/{id}")
                    .route(web::get().to(handlers::view_board_post))
                    .route(web::delete().to(handlers::delete_board_post)),
            )
            // Comments
            .service(
                web::resource("/boards/{slug}/posts/{id}/comments")
                    .route(web::get().to(handlers::list_comments))
                    .route(web::post().to(handlers::create_comment)),
            )
            .service(
                web::resource("/boards/{slug}/posts/{id}/comments/{comment_id}")
                    .route(web::delete().to(handlers::delete_comment)),
            ),
    );
}
