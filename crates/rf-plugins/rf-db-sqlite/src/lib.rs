//! # rf-db-sqlite Implementation
//!
//! This module implements the data mapping between the SQLite relational model
//! and the `rf-core` domain models. It backs the board system and can also
//! serve as the blog `PostStore`.

mod seed;

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use rf_core::models::{
    timestamp, Board, BoardPost, BoardPostDraft, Comment, CommentDraft, Page, Post, PostDraft,
};
use rf_core::traits::{BoardRepo, PostStore};
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use uuid::Uuid;

pub use seed::{SeedReport, DEFAULT_BOARDS};

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

const POST_COLUMNS: &str = "id, title, content, category, tags, created_at, updated_at";

const BOARD_SELECT: &str = "SELECT b.id, b.name, b.description, b.slug, b.sort_order, b.is_active, \
    b.created_at, b.updated_at, \
    (SELECT COUNT(*) FROM board_posts p WHERE p.board_id = b.id) AS post_count \
    FROM boards b";

/// Board posts joined with their board; board columns carry a `board_` prefix.
const BOARD_POST_SELECT: &str = "SELECT p.id, p.title, p.content, p.author, p.board_id, p.view_count, \
    p.is_notice, p.created_at, p.updated_at, \
    (SELECT COUNT(*) FROM comments c WHERE c.post_id = p.id) AS comment_count, \
    b.name AS board_name, b.description AS board_description, b.slug AS board_slug, \
    b.sort_order AS board_sort_order, b.is_active AS board_is_active, \
    b.created_at AS board_created_at, b.updated_at AS board_updated_at, \
    (SELECT COUNT(*) FROM board_posts bp WHERE bp.board_id = b.id) AS board_post_count \
    FROM board_posts p JOIN boards b ON b.id = p.board_id";

const COMMENT_COLUMNS: &str = "id, content, author, post_id, parent_id, created_at, updated_at";

#[derive(Clone)]
pub struct SqliteRepo {
    pool: SqlitePool,
}

impl SqliteRepo {
    /// Connects with a default pool size and applies pending migrations.
    pub async fn new(url: &str) -> anyhow::Result<Self> {
        Self::connect(url, 5).await
    }

    pub async fn connect(url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        // An in-memory database lives exactly as long as its single connection.
        let in_memory = url.contains(":memory:") || url.contains("mode=memory");
        let pool = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?
        } else {
            SqlitePoolOptions::new()
                .max_connections(max_connections.max(1))
                .connect_with(options)
                .await?
        };

        MIGRATOR.run(&pool).await?;
        let repo = Self { pool };
        repo.backfill_search_columns().await?;
        log::info!("SQLite ready at {url}");
        Ok(repo)
    }

    /// Fills the lowercased search columns for rows written before they existed.
    async fn backfill_search_columns(&self) -> anyhow::Result<()> {
        let sql = format!("SELECT {POST_COLUMNS} FROM posts WHERE search_title IS NULL");
        let stale = self.fetch_posts(&sql, None).await?;
        for post in &stale {
            let (title, content, tags) = search_columns(post)?;
            sqlx::query("UPDATE posts SET search_title = ?, search_content = ?, search_tags = ? WHERE id = ?")
                .bind(title)
                .bind(content)
                .bind(tags)
                .bind(&post.id)
                .execute(&self.pool)
                .await?;
        }
        if !stale.is_empty() {
            log::info!("Backfilled search columns for {} post(s)", stale.len());
        }
        Ok(())
    }

    /// Drains and closes the pool. Call once on shutdown.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

// Helpers for TEXT column conversion. Timestamps use a fixed-width format so
// lexical order in SQL equals chronological order.
fn encode_ts(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn decode_ts(row: &SqliteRow, column: &str) -> anyhow::Result<DateTime<Utc>> {
    let raw: String = row.try_get(column)?;
    Ok(DateTime::parse_from_rfc3339(&raw)?.with_timezone(&Utc))
}

fn decode_uuid(row: &SqliteRow, column: &str) -> anyhow::Result<Uuid> {
    let raw: String = row.try_get(column)?;
    Ok(Uuid::parse_str(&raw)?)
}

/// `%query%` with LIKE wildcards in the query taken literally (escape char `\`).
fn like_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for ch in query.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// Unicode-lowercased title, content and tag array for the `search_*` columns.
fn search_columns(post: &Post) -> anyhow::Result<(String, String, String)> {
    let tags: Vec<String> = post.tags.iter().map(|t| t.to_lowercase()).collect();
    Ok((
        post.title.to_lowercase(),
        post.content.to_lowercase(),
        serde_json::to_string(&tags)?,
    ))
}

fn post_from_row(row: &SqliteRow) -> anyhow::Result<Post> {
    let tags: String = row.try_get("tags")?;
    Ok(Post {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        content: row.try_get("content")?,
        category: row.try_get("category")?,
        tags: serde_json::from_str(&tags)?,
        created_at: decode_ts(row, "created_at")?,
        updated_at: decode_ts(row, "updated_at")?,
    })
}

fn board_from_row(row: &SqliteRow) -> anyhow::Result<Board> {
    board_columns(row, "")
}

/// Maps board columns named `{prefix}id`, `{prefix}name` and so on.
fn board_columns(row: &SqliteRow, prefix: &str) -> anyhow::Result<Board> {
    let col = |name: &str| format!("{prefix}{name}");
    Ok(Board {
        id: decode_uuid(row, &col("id"))?,
        name: row.try_get(col("name").as_str())?,
        description: row.try_get(col("description").as_str())?,
        slug: row.try_get(col("slug").as_str())?,
        order: row.try_get(col("sort_order").as_str())?,
        is_active: row.try_get(col("is_active").as_str())?,
        created_at: decode_ts(row, &col("created_at"))?,
        updated_at: decode_ts(row, &col("updated_at"))?,
        post_count: row.try_get(col("post_count").as_str())?,
    })
}

fn board_post_from_row(row: &SqliteRow) -> anyhow::Result<BoardPost> {
    Ok(BoardPost {
        id: decode_uuid(row, "id")?,
        title: row.try_get("title")?,
        content: row.try_get("content")?,
        author: row.try_get("author")?,
        board_id: decode_uuid(row, "board_id")?,
        view_count: row.try_get("view_count")?,
        is_notice: row.try_get("is_notice")?,
        created_at: decode_ts(row, "created_at")?,
        updated_at: decode_ts(row, "updated_at")?,
        comment_count: row.try_get("comment_count")?,
        board: Some(board_columns(row, "board_")?),
    })
}

fn comment_from_row(row: &SqliteRow) -> anyhow::Result<Comment> {
    let parent_id: Option<String> = row.try_get("parent_id")?;
    Ok(Comment {
        id: decode_uuid(row, "id")?,
        content: row.try_get("content")?,
        author: row.try_get("author")?,
        post_id: decode_uuid(row, "post_id")?,
        parent_id: parent_id.as_deref().map(Uuid::parse_str).transpose()?,
        created_at: decode_ts(row, "created_at")?,
        updated_at: decode_ts(row, "updated_at")?,
    })
}

impl SqliteRepo {
    async fn fetch_posts(&self, sql: &str, bind: Option<String>) -> anyhow::Result<Vec<Post>> {
        let mut query = sqlx::query(sql);
        if let Some(value) = bind {
            query = query.bind(value);
        }
        query
            .fetch_all(&self.pool)
            .await?
            .iter()
            .map(post_from_row)
            .collect()
    }
}

#[async_trait]
impl PostStore for SqliteRepo {
    async fn list_all(&self) -> anyhow::Result<Vec<Post>> {
        let sql = format!("SELECT {POST_COLUMNS} FROM posts ORDER BY created_at DESC, id DESC");
        self.fetch_posts(&sql, None).await
    }

    async fn save(&self, draft: PostDraft) -> anyhow::Result<Post> {
        let post = draft.into_post(Uuid::now_v7().to_string(), timestamp());
        let (search_title, search_content, search_tags) = search_columns(&post)?;
        sqlx::query(
            "INSERT INTO posts (id, title, content, category, tags, created_at, updated_at, \
             search_title, search_content, search_tags) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&post.id)
        .bind(&post.title)
        .bind(&post.content)
        .bind(&post.category)
        .bind(serde_json::to_string(&post.tags)?)
        .bind(encode_ts(post.created_at))
        .bind(encode_ts(post.updated_at))
        .bind(search_title)
        .bind(search_content)
        .bind(search_tags)
        .execute(&self.pool)
        .await?;
        Ok(post)
    }

    async fn get_by_id(&self, id: &str) -> anyhow::Result<Option<Post>> {
        let sql = format!("SELECT {POST_COLUMNS} FROM posts WHERE id = ?");
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(post_from_row).transpose()
    }

    async fn delete(&self, id: &str) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM posts WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_by_category(&self, category: &str) -> anyhow::Result<Vec<Post>> {
        let sql = format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE category = ? ORDER BY created_at DESC, id DESC"
        );
        self.fetch_posts(&sql, Some(category.to_owned())).await
    }

    async fn list_by_tag(&self, tag: &str) -> anyhow::Result<Vec<Post>> {
        let sql = format!(
            "SELECT {POST_COLUMNS} FROM posts \
             WHERE EXISTS (SELECT 1 FROM json_each(posts.tags) WHERE json_each.value = ?) \
             ORDER BY created_at DESC, id DESC"
        );
        self.fetch_posts(&sql, Some(tag.to_owned())).await
    }

    /// LIKE over the lowercased title, content and each lowercased tag.
    /// Both sides are folded in Rust, so matching is Unicode case-insensitive.
    async fn search(&self, query: &str) -> anyhow::Result<Vec<Post>> {
        let sql = format!(
            r"SELECT {POST_COLUMNS} FROM posts
              WHERE search_title LIKE ?1 ESCAPE '\'
                 OR search_content LIKE ?1 ESCAPE '\'
                 OR EXISTS (SELECT 1 FROM json_each(posts.search_tags)
                            WHERE json_each.value LIKE ?1 ESCAPE '\')
              ORDER BY created_at DESC, id DESC"
        );
        self.fetch_posts(&sql, Some(like_pattern(&query.to_lowercase()))).await
    }
}

#[async_trait]
impl BoardRepo for SqliteRepo {
    async fn list_boards(&self) -> anyhow::Result<Vec<Board>> {
        let sql = format!("{BOARD_SELECT} WHERE b.is_active = 1 ORDER BY b.sort_order ASC, b.slug ASC");
        sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await?
            .iter()
            .map(board_from_row)
            .collect()
    }

    /// Retrieves an active board by its slug.
    async fn get_board(&self, slug: &str) -> anyhow::Result<Option<Board>> {
        let sql = format!("{BOARD_SELECT} WHERE b.slug = ? AND b.is_active = 1");
        let row = sqlx::query(&sql)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(board_from_row).transpose()
    }

    async fn list_posts(&self, board_id: Uuid, page: Page) -> anyhow::Result<Vec<BoardPost>> {
        let sql = format!(
            "{BOARD_POST_SELECT} WHERE p.board_id = ? \
             ORDER BY p.is_notice DESC, p.created_at DESC, p.id DESC LIMIT ? OFFSET ?"
        );
        sqlx::query(&sql)
            .bind(board_id.to_string())
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?
            .iter()
            .map(board_post_from_row)
            .collect()
    }

    /// Inserts the post and reads it back with its board embedded.
    async fn create_post(&self, draft: BoardPostDraft) -> anyhow::Result<BoardPost> {
        let id = Uuid::now_v7();
        let now = encode_ts(timestamp());

        sqlx::query(
            "INSERT INTO board_posts (id, title, content, author, board_id, view_count, is_notice, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, 0, ?, ?, ?)",
        )
        .bind(id.to_string())
        .bind(&draft.title)
        .bind(&draft.content)
        .bind(&draft.author)
        .bind(draft.board_id.to_string())
        .bind(draft.is_notice)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        self.find_post(id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("board post {id} vanished after insert"))
    }

    /// Increments the view count atomically, then reads the row back.
    async fn get_post(&self, id: Uuid) -> anyhow::Result<Option<BoardPost>> {
        let updated = sqlx::query("UPDATE board_posts SET view_count = view_count + 1 WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        if updated.rows_affected() == 0 {
            return Ok(None);
        }
        self.find_post(id).await
    }

    async fn find_post(&self, id: Uuid) -> anyhow::Result<Option<BoardPost>> {
        let sql = format!("{BOARD_POST_SELECT} WHERE p.id = ?");
        let row = sqlx::query(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(board_post_from_row).transpose()
    }

    async fn delete_post(&self, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM board_posts WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_comments(&self, post_id: Uuid) -> anyhow::Result<Vec<Comment>> {
        let sql = format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE post_id = ? ORDER BY created_at ASC, id ASC"
        );
        sqlx::query(&sql)
            .bind(post_id.to_string())
            .fetch_all(&self.pool)
            .await?
            .iter()
            .map(comment_from_row)
            .collect()
    }

    async fn get_comment(&self, id: Uuid) -> anyhow::Result<Option<Comment>> {
        let sql = format!("SELECT {COMMENT_COLUMNS} FROM comments WHERE id = ?");
        let row = sqlx::query(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(comment_from_row).transpose()
    }

    async fn create_comment(&self, draft: CommentDraft) -> anyhow::Result<Comment> {
        let now = timestamp();
        let comment = Comment {
            id: Uuid::now_v7(),
            content: draft.content,
            author: draft.author,
            post_id: draft.post_id,
            parent_id: draft.parent_id,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            "INSERT INTO comments (id, content, author, post_id, parent_id, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(comment.id.to_string())
        .bind(&comment.content)
        .bind(&comment.author)
        .bind(comment.post_id.to_string())
        .bind(comment.parent_id.map(|p| p.to_string()))
        .bind(encode_ts(now))
        .bind(encode_ts(now))
        .execute(&self.pool)
        .await?;

        Ok(comment)
    }

    async fn delete_comment(&self, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM comments WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
