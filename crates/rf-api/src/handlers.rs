//! # rf-api Handlers
//!
//! This module coordinates the flow between HTTP requests and the core
//! services: decode, call one service operation, shape the JSON response.

use actix_web::{web, HttpResponse};
use rf_core::{BoardPostSubmission, CommentSubmission, Message, Page, PostQuery, PostSubmission};
use serde::Deserialize;

use crate::error::ApiError;
use crate::state::AppState;

type ApiResult = Result<HttpResponse, ApiError>;

/// Raw paging parameters. Anything unparsable falls back to the defaults.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl PageParams {
    pub fn to_page(&self) -> Page {
        let number = self
            .page
            .as_deref()
            .and_then(|p| p.trim().parse::<u32>().ok())
            .unwrap_or(1);
        let size = self
            .limit
            .as_deref()
            .and_then(|l| l.trim().parse::<u32>().ok())
            .unwrap_or(Page::DEFAULT_SIZE);
        Page::new(number, size)
    }
}

// ── Blog posts ──────────────────────────────────────────────────────────────

/// GET /api/posts?q=&category=&tag=
pub async fn list_posts(state: web::Data<AppState>, query: web::Query<PostQuery>) -> ApiResult {
    let posts = state.posts.list(&query).await.map_err(state.reject())?;
    Ok(HttpResponse::Ok().json(posts))
}

/// POST /api/posts
pub async fn create_post(state: web::Data<AppState>, body: web::Json<PostSubmission>) -> ApiResult {
    let post = state
        .posts
        .create(body.into_inner())
        .await
        .map_err(state.reject())?;
    log::info!("Created post {}", post.id);
    Ok(HttpResponse::Created().json(post))
}

/// GET /api/posts/{id}
pub async fn get_post(state: web::Data<AppState>, path: web::Path<String>) -> ApiResult {
    let post = state.posts.get(&path).await.map_err(state.reject())?;
    Ok(HttpResponse::Ok().json(post))
}

/// DELETE /api/posts/{id}
pub async fn delete_post(state: web::Data<AppState>, path: web::Path<String>) -> ApiResult {
    state.posts.delete(&path).await.map_err(state.reject())?;
    log::info!("Deleted post {}", path.as_str());
    Ok(HttpResponse::Ok().json(state.message(Message::PostDeleted)))
}

// ── Boards ──────────────────────────────────────────────────────────────────

/// GET /api/boards
pub async fn list_boards(state: web::Data<AppState>) -> ApiResult {
    let boards = state.boards.list_boards().await.map_err(state.reject())?;
    Ok(HttpResponse::Ok().json(boards))
}

/// GET /api/boards/{slug}
pub async fn get_board(state: web::Data<AppState>, path: web::Path<String>) -> ApiResult {
    let board = state.boards.board(&path).await.map_err(state.reject())?;
    Ok(HttpResponse::Ok().json(board))
}

/// GET /api/boards/{slug}/posts?page=&limit=
pub async fn list_board_posts(
    state: web::Data<AppState>,
    path: web::Path<String>,
    params: web::Query<PageParams>,
) -> ApiResult {
    let posts = state
        .boards
        .list_posts(&path, params.to_page())
        .await
        .map_err(state.reject())?;
    Ok(HttpResponse::Ok().json(posts))
}

/// POST /api/boards/{slug}/posts
pub async fn create_board_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<BoardPostSubmission>,
) -> ApiResult {
    let post = state
        .boards
        .create_post(&path, body.into_inner())
        .await
        .map_err(state.reject())?;
    log::info!("Created board post {} on /{}", post.id, path.as_str());
    Ok(HttpResponse::Created().json(post))
}

/// GET /api/boards/{slug}/posts/{id}
///
/// Not idempotent: every call counts a view.
pub async fn view_board_post(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> ApiResult {
    let (slug, id) = path.into_inner();
    let post = state
        .boards
        .view_post(&slug, &id)
        .await
        .map_err(state.reject())?;
    Ok(HttpResponse::Ok().json(post))
}

/// DELETE /api/boards/{slug}/posts/{id}
pub async fn delete_board_post(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> ApiResult {
    let (slug, id) = path.into_inner();
    state
        .boards
        .delete_post(&slug, &id)
        .await
        .map_err(state.reject())?;
    log::info!("Deleted board post {id} on /{slug}");
    Ok(HttpResponse::Ok().json(state.message(Message::BoardPostDeleted)))
}

// ── Comments ────────────────────────────────────────────────────────────────

/// GET /api/boards/{slug}/posts/{id}/comments
pub async fn list_comments(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> ApiResult {
    let (slug, post_id) = path.into_inner();
    let threads = state
        .boards
        .list_comments(&slug, &post_id)
        .await
        .map_err(state.reject())?;
    Ok(HttpResponse::Ok().json(threads))
}

/// POST /api/boards/{slug}/posts/{id}/comments
pub async fn create_comment(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
    body: web::Json<CommentSubmission>,
) -> ApiResult {
    let (slug, post_id) = path.into_inner();
    let comment = state
        .boards
        .create_comment(&slug, &post_id, body.into_inner())
        .await
        .map_err(state.reject())?;
    Ok(HttpResponse::Created().json(comment))
}

/// DELETE /api/boards/{slug}/posts/{id}/comments/{comment_id}
pub async fn delete_comment(
    state: web::Data<AppState>,
    path: web::Path<(String, String, String)>,
) -> ApiResult {
    let (slug, post_id, comment_id) = path.into_inner();
    state
        .boards
        .delete_comment(&slug, &post_id, &comment_id)
        .await
        .map_err(state.reject())?;
    Ok(HttpResponse::Ok().json(state.message(Message::CommentDeleted)))
}
