//! rusty-forum/crates/rf-core/src/lib.rs
//!
//! The central domain logic and interface definitions for Rusty-Forum.

pub mod error;
pub mod messages;
pub mod models;
pub mod search;
pub mod services;
pub mod threads;
pub mod traits;

// Re-exporting for easier access in other crates
pub use error::*;
pub use messages::*;
pub use models::*;
pub use services::*;
pub use traits::*;

#[cfg(test)]
mod tests {
    use super::models::*;
    use uuid::Uuid;

    #[test]
    fn test_board_post_creation_v7() {
        let id = Uuid::now_v7();
        let now = timestamp();
        let post = BoardPost {
            id,
            title: "Hello".to_string(),
            content: "Hello Rust!".to_string(),
            author: "tester".to_string(),
            board_id: Uuid::now_v7(),
            view_count: 0,
            is_notice: true,
            created_at: now,
            updated_at: now,
            comment_count: 0,
            board: None,
        };
        assert_eq!(post.id, id);
        assert_eq!(post.id.get_version_num(), 7);
        assert!(post.is_notice);
    }

    #[test]
    fn test_post_json_shape() {
        let post = PostDraft {
            title: "A".into(),
            content: "B".into(),
            category: None,
            tags: vec![],
        }
        .into_post("p1".into(), timestamp());

        let json = serde_json::to_value(&post).unwrap();
        assert_eq!(json["category"], "");
        assert_eq!(json["tags"], serde_json::json!([]));
        assert!(json["createdAt"].as_str().unwrap().ends_with('Z'));

        let back: Post = serde_json::from_value(json).unwrap();
        assert_eq!(back, post);
    }

    #[test]
    fn test_page_clamps() {
        assert_eq!(Page::new(0, 0), Page { number: 1, size: 1 });
        assert_eq!(Page::new(3, 500).limit(), Page::MAX_SIZE as i64);
        assert_eq!(Page::new(3, 20).offset(), 40);
        assert_eq!(Page::default().offset(), 0);
    }
}
