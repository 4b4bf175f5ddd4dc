//! rusty-forum/crates/rf-api/src/middleware.rs Middleware
//!
//! Request logging, CORS, and request-body error handling.

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, HttpRequest};
use rf_core::{AppError, Message};

use crate::error::ApiError;
use crate::state::AppState;

/// Returns a standard set of middleware for the Rusty-Forum API.
pub fn standard_middleware() -> Logger {
    // remote-ip "request-line" status-code response-size "referrer" "user-agent"
    Logger::default()
}

/// Configures CORS (Cross-Origin Resource Sharing) for a UI served elsewhere,
/// e.g. a static export on another origin.
pub fn cors_policy() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allowed_methods(vec!["GET", "POST", "DELETE"])
        .allow_any_header()
        .max_age(3600)
}

/// Undecodable JSON bodies become a localized 400 instead of actix's plain-text error.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, req: &HttpRequest| {
        log::debug!("Rejected request body for {}: {err}", req.path());
        rejected(req, Message::InvalidRequestBody)
    })
}

/// Same for query strings, e.g. a repeated `?q=`.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, req: &HttpRequest| {
        log::debug!("Rejected query string for {}: {err}", req.path());
        rejected(req, Message::InvalidQuery)
    })
}

fn rejected(req: &HttpRequest, message: Message) -> actix_web::Error {
    let locale = req
        .app_data::<web::Data<AppState>>()
        .map(|state| state.locale)
        .unwrap_or_default();
    ApiError::localize(AppError::Validation(message), locale).into()
}

// TODO: Add a security-header middleware (X-Content-Type-Options: nosniff,
// Referrer-Policy) once the API is served next to the rendered pages.
