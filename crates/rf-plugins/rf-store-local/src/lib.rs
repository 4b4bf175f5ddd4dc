//! # rf-store-local
//! rusty-forum/crates/rf-plugins/rf-store-local/src/lib.rs
//! Local filesystem implementation of `PostStore`.
//! Features: a key/value document store with `localStorage` semantics, one
//! JSON file per key, atomic replacement on write.

use std::path::PathBuf;

use async_trait::async_trait;
use rf_core::models::{timestamp, Post, PostDraft};
use rf_core::search::{has_tag, matches_query};
use rf_core::traits::PostStore;
use tokio::fs;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Every post lives under this single key, newest first.
pub const POSTS_STORAGE_KEY: &str = "blog_posts";

/// String values addressed by key, persisted as files under one directory.
pub struct LocalStorage {
    /// Root directory for all items (e.g., "./data/local")
    root_path: PathBuf,
}

impl LocalStorage {
    pub fn new(root: PathBuf) -> Self {
        Self { root_path: root }
    }

    /// Maps a key to "<root>/<key>.json", keeping only filename-safe characters.
    fn item_path(&self, key: &str) -> PathBuf {
        let safe: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.root_path.join(format!("{safe}.json"))
    }

    pub async fn get_item(&self, key: &str) -> anyhow::Result<Option<String>> {
        match fs::read_to_string(self.item_path(key)).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Writes to a sibling temp file and renames it over the target, so
    /// readers never observe a half-written value.
    pub async fn set_item(&self, key: &str, value: &str) -> anyhow::Result<()> {
        fs::create_dir_all(&self.root_path).await?;
        let target = self.item_path(key);
        let staging = target.with_extension("json.tmp");
        fs::write(&staging, value).await?;
        fs::rename(&staging, &target).await?;
        Ok(())
    }
}

/// Blog posts kept as one JSON array in [`LocalStorage`].
///
/// There is no query engine: every lookup loads the array and filters it.
pub struct LocalPostStore {
    storage: LocalStorage,
    /// Serializes read-modify-write cycles on the posts key.
    write_lock: Mutex<()>,
}

impl LocalPostStore {
    pub fn new(root: PathBuf) -> Self {
        Self {
            storage: LocalStorage::new(root),
            write_lock: Mutex::new(()),
        }
    }

    async fn load(&self) -> anyhow::Result<Vec<Post>> {
        match self.storage.get_item(POSTS_STORAGE_KEY).await? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    async fn store(&self, posts: &[Post]) -> anyhow::Result<()> {
        let raw = serde_json::to_string(posts)?;
        self.storage.set_item(POSTS_STORAGE_KEY, &raw).await
    }

    async fn filtered(&self, keep: impl Fn(&Post) -> bool + Send) -> anyhow::Result<Vec<Post>> {
        Ok(self.load().await?.into_iter().filter(|p| keep(p)).collect())
    }
}

#[async_trait]
impl PostStore for LocalPostStore {
    async fn list_all(&self) -> anyhow::Result<Vec<Post>> {
        self.load().await
    }

    /// Prepends the new post so the stored array stays newest first.
    async fn save(&self, draft: PostDraft) -> anyhow::Result<Post> {
        let post = draft.into_post(Uuid::now_v7().to_string(), timestamp());

        let _guard = self.write_lock.lock().await;
        let mut posts = self.load().await?;
        posts.insert(0, post.clone());
        self.store(&posts).await?;

        log::debug!("Stored post {} ({} total)", post.id, posts.len());
        Ok(post)
    }

    async fn get_by_id(&self, id: &str) -> anyhow::Result<Option<Post>> {
        Ok(self.load().await?.into_iter().find(|p| p.id == id))
    }

    async fn delete(&self, id: &str) -> anyhow::Result<bool> {
        let _guard = self.write_lock.lock().await;
        let mut posts = self.load().await?;
        let before = posts.len();
        posts.retain(|p| p.id != id);
        if posts.len() == before {
            return Ok(false);
        }
        self.store(&posts).await?;
        Ok(true)
    }

    async fn list_by_category(&self, category: &str) -> anyhow::Result<Vec<Post>> {
        self.filtered(|p| p.category.as_deref() == Some(category)).await
    }

    async fn list_by_tag(&self, tag: &str) -> anyhow::Result<Vec<Post>> {
        self.filtered(|p| has_tag(p, tag)).await
    }

    async fn search(&self, query: &str) -> anyhow::Result<Vec<Post>> {
        self.filtered(|p| matches_query(p, query)).await
    }
}
