//! # Domain Models
//!
//! These structs represent the core entities of Rusty-Forum.
//! Board-side records use UUID v7 for time-ordered identification. Blog posts
//! carry an opaque string id because every post backend mints its own.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Current time truncated to the microsecond precision every backend stores.
pub fn timestamp() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// A standalone blog-style article, independent of the board system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub title: String,
    pub content: String,
    /// Absent categories go over the wire as `""`.
    #[serde(default, with = "category_field")]
    pub category: Option<String>,
    /// Order is preserved exactly as submitted.
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A validated, trimmed post submission that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PostDraft {
    pub title: String,
    pub content: String,
    pub category: Option<String>,
    pub tags: Vec<String>,
}

impl PostDraft {
    /// Stamps the draft with a backend-issued id and a single creation time.
    pub fn into_post(self, id: String, now: DateTime<Utc>) -> Post {
        Post {
            id,
            title: self.title,
            content: self.content,
            category: self.category,
            tags: self.tags,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A named discussion category (e.g. "free", "qna").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    /// The URL slug. Unique and never changes once seeded.
    pub slug: String,
    /// Display sort key, ascending.
    pub order: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Live number of posts on the board at read time.
    #[serde(default)]
    pub post_count: i64,
}

/// A message within a board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardPost {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    /// Free text, there is no identity system behind it.
    pub author: String,
    pub board_id: Uuid,
    pub view_count: i64,
    /// Notices are pinned above regular posts.
    pub is_notice: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub comment_count: i64,
    /// The owning board, embedded on reads.
    #[serde(default)]
    pub board: Option<Board>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoardPostDraft {
    pub title: String,
    pub content: String,
    pub author: String,
    pub board_id: Uuid,
    pub is_notice: bool,
}

/// A reply to a board post. `parent_id` set means it answers another comment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: Uuid,
    pub content: String,
    pub author: String,
    pub post_id: Uuid,
    pub parent_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommentDraft {
    pub content: String,
    pub author: String,
    pub post_id: Uuid,
    pub parent_id: Option<Uuid>,
}

/// A top-level comment with its direct replies, as returned by listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentThread {
    #[serde(flatten)]
    pub comment: Comment,
    pub replies: Vec<Comment>,
}

/// Offset pagination for board post listings. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub number: u32,
    pub size: u32,
}

impl Page {
    pub const DEFAULT_SIZE: u32 = 20;
    pub const MAX_SIZE: u32 = 100;

    /// Clamps to a page number of at least 1 and a size within `1..=MAX_SIZE`.
    pub fn new(number: u32, size: u32) -> Self {
        Self {
            number: number.max(1),
            size: size.clamp(1, Self::MAX_SIZE),
        }
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.number - 1) * i64::from(self.size)
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.size)
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(1, Self::DEFAULT_SIZE)
    }
}

mod category_field {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<String>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(value.as_deref().unwrap_or(""))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        let raw = Option::<String>::deserialize(d)?;
        Ok(raw.filter(|c| !c.is_empty()))
    }
}
