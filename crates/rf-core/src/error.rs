//! # AppError
//!
//! Centralized error handling for the Rusty-Forum ecosystem.
//! Every variant carries the [`Message`] shown to the client; the API layer
//! renders it in the configured locale and picks the status code.

use thiserror::Error;

use crate::messages::Message;

/// The primary error type for all rf-core operations.
#[derive(Error, Debug)]
pub enum AppError {
    /// A required field is missing or blank, or a reference is invalid.
    #[error("validation error: {0:?}")]
    Validation(Message),

    /// Lookup or delete target is absent.
    #[error("not found: {0:?}")]
    NotFound(Message),

    /// The storage backend failed. `source` is logged, never sent to clients.
    #[error("backend error ({message:?}): {source}")]
    Backend {
        message: Message,
        #[source]
        source: anyhow::Error,
    },
}

impl AppError {
    pub fn message(&self) -> Message {
        match self {
            AppError::Validation(m) | AppError::NotFound(m) => *m,
            AppError::Backend { message, .. } => *message,
        }
    }
}

/// Wraps a backend failure with the message the client will see, logging the cause.
pub fn backend(message: Message) -> impl FnOnce(anyhow::Error) -> AppError {
    move |source| {
        log::error!("{message:?}: {source:#}");
        AppError::Backend { message, source }
    }
}

/// A specialized Result type for Rusty-Forum logic.
pub type Result<T> = std::result::Result<T, AppError>;
