use std::sync::Arc;

use rf_core::{AppError, BoardRepo, BoardService, Locale, Message, PostService, PostStore};
use serde::Serialize;

use crate::error::ApiError;

/// State shared across all Actix-web workers.
///
/// Built once at startup from whichever backends the binary selected.
pub struct AppState {
    pub posts: PostService,
    pub boards: BoardService,
    pub locale: Locale,
}

/// Body of successful deletes.
#[derive(Serialize)]
pub struct MessageBody {
    pub message: &'static str,
}

impl AppState {
    pub fn new(posts: Arc<dyn PostStore>, boards: Arc<dyn BoardRepo>, locale: Locale) -> Self {
        Self {
            posts: PostService::new(posts),
            boards: BoardService::new(boards),
            locale,
        }
    }

    pub(crate) fn reject(&self) -> impl Fn(AppError) -> ApiError {
        let locale = self.locale;
        move |err| ApiError::localize(err, locale)
    }

    pub(crate) fn message(&self, message: Message) -> MessageBody {
        MessageBody {
            message: message.text(self.locale),
        }
    }
}
