//! # rf-docstore-surreal
//!
//! Document-store implementation of `PostStore` on embedded SurrealDB.
//! Category filtering runs as a native equality query; search and tag
//! filtering scan the table and filter in process with the shared matchers
//! from `rf_core::search`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rf_core::models::{timestamp, Post, PostDraft};
use rf_core::search::{has_tag, matches_query};
use rf_core::traits::PostStore;
use serde::{Deserialize, Serialize};
use surrealdb::engine::local::{Db, Mem, RocksDb};
use surrealdb::Surreal;
use uuid::Uuid;

/// Path value selecting the in-memory engine.
pub const IN_MEMORY: &str = "mem://";

const DOC_FIELDS: &str = "post_id, title, content, category, tags, created_at, updated_at";

/// Stored shape of a post. Timestamps are microseconds since the epoch so
/// the store orders them numerically.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PostDoc {
    post_id: String,
    title: String,
    content: String,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
    created_at: i64,
    updated_at: i64,
}

impl From<&Post> for PostDoc {
    fn from(post: &Post) -> Self {
        Self {
            post_id: post.id.clone(),
            title: post.title.clone(),
            content: post.content.clone(),
            category: post.category.clone(),
            tags: post.tags.clone(),
            created_at: post.created_at.timestamp_micros(),
            updated_at: post.updated_at.timestamp_micros(),
        }
    }
}

fn from_micros(micros: i64) -> anyhow::Result<DateTime<Utc>> {
    DateTime::from_timestamp_micros(micros)
        .ok_or_else(|| anyhow::anyhow!("timestamp out of range: {micros}"))
}

impl TryFrom<PostDoc> for Post {
    type Error = anyhow::Error;

    fn try_from(doc: PostDoc) -> anyhow::Result<Self> {
        Ok(Post {
            id: doc.post_id,
            title: doc.title,
            content: doc.content,
            category: doc.category,
            tags: doc.tags,
            created_at: from_micros(doc.created_at)?,
            updated_at: from_micros(doc.updated_at)?,
        })
    }
}

fn into_posts(docs: Vec<PostDoc>) -> anyhow::Result<Vec<Post>> {
    docs.into_iter().map(Post::try_from).collect()
}

pub struct SurrealPostStore {
    db: Surreal<Db>,
}

impl SurrealPostStore {
    /// Opens `path` with the RocksDB engine, or an in-memory database for [`IN_MEMORY`].
    pub async fn open(path: &str) -> anyhow::Result<Self> {
        let db: Surreal<Db> = if path == IN_MEMORY {
            Surreal::new::<Mem>(()).await?
        } else {
            Surreal::new::<RocksDb>(path).await?
        };
        db.use_ns("rusty_forum").use_db("blog").await?;
        db.query("DEFINE INDEX IF NOT EXISTS post_category ON TABLE post COLUMNS category")
            .await?
            .check()?;

        log::info!("Document store ready at {path}");
        Ok(Self { db })
    }

    async fn select(&self, filter: &str, binding: Option<(&'static str, String)>) -> anyhow::Result<Vec<Post>> {
        let sql = format!(
            "SELECT {DOC_FIELDS} FROM post {filter} ORDER BY created_at DESC, post_id DESC"
        );
        let mut query = self.db.query(sql);
        if let Some(binding) = binding {
            query = query.bind(binding);
        }
        let docs: Vec<PostDoc> = query.await?.take(0)?;
        into_posts(docs)
    }

    async fn scan(&self, keep: impl Fn(&Post) -> bool + Send) -> anyhow::Result<Vec<Post>> {
        Ok(self.list_all().await?.into_iter().filter(|p| keep(p)).collect())
    }
}

#[async_trait]
impl PostStore for SurrealPostStore {
    async fn list_all(&self) -> anyhow::Result<Vec<Post>> {
        self.select("", None).await
    }

    async fn save(&self, draft: PostDraft) -> anyhow::Result<Post> {
        let post = draft.into_post(Uuid::now_v7().to_string(), timestamp());
        self.db
            .query("CREATE type::thing('post', $id) CONTENT $doc RETURN NONE")
            .bind(("id", post.id.clone()))
            .bind(("doc", PostDoc::from(&post)))
            .await?
            .check()?;
        Ok(post)
    }

    async fn get_by_id(&self, id: &str) -> anyhow::Result<Option<Post>> {
        let sql = format!("SELECT {DOC_FIELDS} FROM type::thing('post', $id)");
        let docs: Vec<PostDoc> = self
            .db
            .query(sql)
            .bind(("id", id.to_owned()))
            .await?
            .take(0)?;
        docs.into_iter().next().map(Post::try_from).transpose()
    }

    /// A single statement, so only one of two racing deletes sees the record.
    async fn delete(&self, id: &str) -> anyhow::Result<bool> {
        let removed: Vec<PostDoc> = self
            .db
            .query("DELETE type::thing('post', $id) RETURN BEFORE")
            .bind(("id", id.to_owned()))
            .await?
            .take(0)?;
        Ok(!removed.is_empty())
    }

    async fn list_by_category(&self, category: &str) -> anyhow::Result<Vec<Post>> {
        self.select("WHERE category = $category", Some(("category", category.to_owned())))
            .await
    }

    async fn list_by_tag(&self, tag: &str) -> anyhow::Result<Vec<Post>> {
        self.scan(|p| has_tag(p, tag)).await
    }

    async fn search(&self, query: &str) -> anyhow::Result<Vec<Post>> {
        self.scan(|p| matches_query(p, query)).await
    }
}
