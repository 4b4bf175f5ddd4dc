//! # Core Traits (Ports)
//!
//! Any storage plugin must implement these traits to be wired in by the binary.

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{Board, BoardPost, BoardPostDraft, Comment, CommentDraft, Page, Post, PostDraft};

/// Persistence contract for blog posts.
///
/// Several backends implement it; exactly one is selected at startup.
/// Listings are ordered newest first.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait PostStore: Send + Sync {
    async fn list_all(&self) -> anyhow::Result<Vec<Post>>;
    async fn save(&self, draft: PostDraft) -> anyhow::Result<Post>;
    async fn get_by_id(&self, id: &str) -> anyhow::Result<Option<Post>>;
    /// Returns `false` when nothing was stored under `id`.
    async fn delete(&self, id: &str) -> anyhow::Result<bool>;
    async fn list_by_category(&self, category: &str) -> anyhow::Result<Vec<Post>>;
    /// Exact tag membership.
    async fn list_by_tag(&self, tag: &str) -> anyhow::Result<Vec<Post>>;
    /// Case-insensitive substring match over title, content and tags.
    async fn search(&self, query: &str) -> anyhow::Result<Vec<Post>>;
}

/// Data persistence contract for boards, board posts and comments.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait BoardRepo: Send + Sync {
    // Board Operations
    /// Active boards only, by display order.
    async fn list_boards(&self) -> anyhow::Result<Vec<Board>>;
    async fn get_board(&self, slug: &str) -> anyhow::Result<Option<Board>>;

    // Post Operations
    /// Notices first, then newest first.
    async fn list_posts(&self, board_id: Uuid, page: Page) -> anyhow::Result<Vec<BoardPost>>;
    async fn create_post(&self, draft: BoardPostDraft) -> anyhow::Result<BoardPost>;
    /// Counts a view, then reads. The returned `view_count` includes this view.
    async fn get_post(&self, id: Uuid) -> anyhow::Result<Option<BoardPost>>;
    /// Reads without counting a view.
    async fn find_post(&self, id: Uuid) -> anyhow::Result<Option<BoardPost>>;
    async fn delete_post(&self, id: Uuid) -> anyhow::Result<bool>;

    // Comment Operations
    /// Every comment of the post, flat, oldest first.
    async fn list_comments(&self, post_id: Uuid) -> anyhow::Result<Vec<Comment>>;
    async fn get_comment(&self, id: Uuid) -> anyhow::Result<Option<Comment>>;
    async fn create_comment(&self, draft: CommentDraft) -> anyhow::Result<Comment>;
    async fn delete_comment(&self, id: Uuid) -> anyhow::Result<bool>;
}
