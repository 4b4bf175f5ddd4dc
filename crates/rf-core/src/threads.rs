//! Comment threading.
//!
//! Comments are stored flat with a nullable parent id. Listings show one level
//! of nesting: top-level comments, each with its direct replies.

use std::collections::HashMap;

use uuid::Uuid;

use crate::models::{Comment, CommentThread};

/// Rebuilds the one-level tree in a single grouping pass.
///
/// Both levels come out oldest first. Replies to replies are not materialized.
pub fn thread_comments(mut flat: Vec<Comment>) -> Vec<CommentThread> {
    flat.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));

    let mut top_level = Vec::new();
    let mut replies: HashMap<Uuid, Vec<Comment>> = HashMap::new();
    for comment in flat {
        match comment.parent_id {
            None => top_level.push(comment),
            Some(parent) => replies.entry(parent).or_default().push(comment),
        }
    }

    top_level
        .into_iter()
        .map(|comment| CommentThread {
            replies: replies.remove(&comment.id).unwrap_or_default(),
            comment,
        })
        .collect()
}
