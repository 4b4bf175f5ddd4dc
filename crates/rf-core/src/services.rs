//! # Services
//!
//! The data-access layer between HTTP handlers and storage plugins. Each
//! operation validates its input, calls exactly one port, and maps absent
//! results and backend failures onto [`AppError`].

use std::sync::Arc;

use serde::Deserialize;
use uuid::Uuid;

use crate::error::{backend, AppError, Result};
use crate::messages::Message;
use crate::models::{
    Board, BoardPost, BoardPostDraft, Comment, CommentDraft, CommentThread, Page, Post, PostDraft,
};
use crate::threads::thread_comments;
use crate::traits::{BoardRepo, PostStore};

/// Category filter values meaning "no filter".
const ALL_CATEGORIES: [&str; 2] = ["전체", "all"];

/// Trimmed value, or `None` when missing or blank.
fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

/// Path ids that are not UUIDs cannot name anything.
fn parse_id(raw: &str, missing: Message) -> Result<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::NotFound(missing))
}

/// Filters accepted by the post listing. `q` wins over `category`, which
/// wins over `tag`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostQuery {
    pub q: Option<String>,
    pub category: Option<String>,
    pub tag: Option<String>,
}

/// Raw fields of a blog post submission.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostSubmission {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
    /// Anything but an array is treated as no tags.
    pub tags: Option<serde_json::Value>,
}

impl PostSubmission {
    pub fn into_draft(self) -> Result<PostDraft> {
        let (Some(title), Some(content)) = (present(self.title), present(self.content)) else {
            return Err(AppError::Validation(Message::PostFieldsRequired));
        };
        let tags = match self.tags {
            Some(serde_json::Value::Array(items)) => items
                .into_iter()
                .filter_map(|item| match item {
                    serde_json::Value::String(tag) => Some(tag),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        };
        Ok(PostDraft {
            title,
            content,
            category: present(self.category),
            tags,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardPostSubmission {
    pub title: Option<String>,
    pub content: Option<String>,
    pub author: Option<String>,
    pub is_notice: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentSubmission {
    pub content: Option<String>,
    pub author: Option<String>,
    pub parent_id: Option<String>,
}

/// Blog post access over whichever [`PostStore`] is wired in.
#[derive(Clone)]
pub struct PostService {
    store: Arc<dyn PostStore>,
}

impl PostService {
    pub fn new(store: Arc<dyn PostStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self, query: &PostQuery) -> Result<Vec<Post>> {
        let q = present(query.q.clone());
        let category = present(query.category.clone()).filter(|c| !ALL_CATEGORIES.contains(&c.as_str()));
        let tag = present(query.tag.clone());

        let posts = if let Some(q) = q {
            self.store.search(&q).await
        } else if let Some(category) = category {
            self.store.list_by_category(&category).await
        } else if let Some(tag) = tag {
            self.store.list_by_tag(&tag).await
        } else {
            self.store.list_all().await
        };
        posts.map_err(backend(Message::PostListFailed))
    }

    pub async fn create(&self, submission: PostSubmission) -> Result<Post> {
        let draft = submission.into_draft()?;
        self.store.save(draft).await.map_err(backend(Message::PostSaveFailed))
    }

    pub async fn get(&self, id: &str) -> Result<Post> {
        self.store
            .get_by_id(id)
            .await
            .map_err(backend(Message::PostLoadFailed))?
            .ok_or(AppError::NotFound(Message::PostNotFound))
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let deleted = self
            .store
            .delete(id)
            .await
            .map_err(backend(Message::PostDeleteFailed))?;
        if deleted {
            Ok(())
        } else {
            Err(AppError::NotFound(Message::PostDeleteNotFound))
        }
    }
}

/// Board, board post and comment access.
#[derive(Clone)]
pub struct BoardService {
    repo: Arc<dyn BoardRepo>,
}

impl BoardService {
    pub fn new(repo: Arc<dyn BoardRepo>) -> Self {
        Self { repo }
    }

    pub async fn list_boards(&self) -> Result<Vec<Board>> {
        self.repo.list_boards().await.map_err(backend(Message::BoardListFailed))
    }

    pub async fn board(&self, slug: &str) -> Result<Board> {
        self.lookup_board(slug, Message::BoardLoadFailed).await
    }

    pub async fn list_posts(&self, slug: &str, page: Page) -> Result<Vec<BoardPost>> {
        let board = self.lookup_board(slug, Message::BoardPostListFailed).await?;
        self.repo
            .list_posts(board.id, page)
            .await
            .map_err(backend(Message::BoardPostListFailed))
    }

    pub async fn create_post(&self, slug: &str, submission: BoardPostSubmission) -> Result<BoardPost> {
        let (Some(title), Some(content), Some(author)) = (
            present(submission.title),
            present(submission.content),
            present(submission.author),
        ) else {
            return Err(AppError::Validation(Message::BoardPostFieldsRequired));
        };
        let board = self.lookup_board(slug, Message::BoardPostCreateFailed).await?;

        self.repo
            .create_post(BoardPostDraft {
                title,
                content,
                author,
                board_id: board.id,
                is_notice: submission.is_notice.unwrap_or(false),
            })
            .await
            .map_err(backend(Message::BoardPostCreateFailed))
    }

    /// Detail view. Counts one view per call.
    pub async fn view_post(&self, slug: &str, id: &str) -> Result<BoardPost> {
        let post = self.lookup_post(slug, id, Message::BoardPostLoadFailed).await?;
        self.repo
            .get_post(post.id)
            .await
            .map_err(backend(Message::BoardPostLoadFailed))?
            .ok_or(AppError::NotFound(Message::BoardPostNotFound))
    }

    pub async fn delete_post(&self, slug: &str, id: &str) -> Result<()> {
        let post = self.lookup_post(slug, id, Message::BoardPostDeleteFailed).await?;
        let deleted = self
            .repo
            .delete_post(post.id)
            .await
            .map_err(backend(Message::BoardPostDeleteFailed))?;
        if deleted {
            Ok(())
        } else {
            Err(AppError::NotFound(Message::BoardPostNotFound))
        }
    }

    pub async fn list_comments(&self, slug: &str, post_id: &str) -> Result<Vec<CommentThread>> {
        let post = self.lookup_post(slug, post_id, Message::CommentListFailed).await?;
        let flat = self
            .repo
            .list_comments(post.id)
            .await
            .map_err(backend(Message::CommentListFailed))?;
        Ok(thread_comments(flat))
    }

    pub async fn create_comment(
        &self,
        slug: &str,
        post_id: &str,
        submission: CommentSubmission,
    ) -> Result<Comment> {
        let (Some(content), Some(author)) = (present(submission.content), present(submission.author)) else {
            return Err(AppError::Validation(Message::CommentFieldsRequired));
        };
        let post = self.lookup_post(slug, post_id, Message::CommentCreateFailed).await?;

        let parent_id = match present(submission.parent_id) {
            None => None,
            Some(raw) => {
                let parent_id = Uuid::parse_str(&raw)
                    .map_err(|_| AppError::Validation(Message::CommentParentInvalid))?;
                let parent = self
                    .repo
                    .get_comment(parent_id)
                    .await
                    .map_err(backend(Message::CommentCreateFailed))?;
                match parent {
                    Some(parent) if parent.post_id == post.id => Some(parent.id),
                    _ => return Err(AppError::Validation(Message::CommentParentInvalid)),
                }
            }
        };

        self.repo
            .create_comment(CommentDraft {
                content,
                author,
                post_id: post.id,
                parent_id,
            })
            .await
            .map_err(backend(Message::CommentCreateFailed))
    }

    pub async fn delete_comment(&self, slug: &str, post_id: &str, comment_id: &str) -> Result<()> {
        let post = self.lookup_post(slug, post_id, Message::CommentDeleteFailed).await?;
        let comment_id = parse_id(comment_id, Message::CommentNotFound)?;
        let comment = self
            .repo
            .get_comment(comment_id)
            .await
            .map_err(backend(Message::CommentDeleteFailed))?
            .filter(|c| c.post_id == post.id)
            .ok_or(AppError::NotFound(Message::CommentNotFound))?;

        let deleted = self
            .repo
            .delete_comment(comment.id)
            .await
            .map_err(backend(Message::CommentDeleteFailed))?;
        if deleted {
            Ok(())
        } else {
            Err(AppError::NotFound(Message::CommentNotFound))
        }
    }

    async fn lookup_board(&self, slug: &str, failure: Message) -> Result<Board> {
        self.repo
            .get_board(slug)
            .await
            .map_err(backend(failure))?
            .ok_or(AppError::NotFound(Message::BoardNotFound))
    }

    /// Resolves a post through its board; a post on another board is absent here.
    async fn lookup_post(&self, slug: &str, id: &str, failure: Message) -> Result<BoardPost> {
        let board = self.lookup_board(slug, failure).await?;
        let id = parse_id(id, Message::BoardPostNotFound)?;
        self.repo
            .find_post(id)
            .await
            .map_err(backend(failure))?
            .filter(|post| post.board_id == board.id)
            .ok_or(AppError::NotFound(Message::BoardPostNotFound))
    }
}
