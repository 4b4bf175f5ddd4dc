//! In-process post filtering for backends without a query engine able to
//! express it natively.

use crate::models::Post;

/// Case-insensitive substring match over title, content and every tag.
pub fn matches_query(post: &Post, query: &str) -> bool {
    let needle = query.to_lowercase();
    post.title.to_lowercase().contains(&needle)
        || post.content.to_lowercase().contains(&needle)
        || post.tags.iter().any(|tag| tag.to_lowercase().contains(&needle))
}

pub fn has_tag(post: &Post, tag: &str) -> bool {
    post.tags.iter().any(|t| t == tag)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{timestamp, PostDraft};

    fn post(title: &str, content: &str, tags: &[&str]) -> Post {
        PostDraft {
            title: title.into(),
            content: content.into(),
            category: None,
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
        .into_post(title.into(), timestamp())
    }

    #[test]
    fn query_matches_any_field_ignoring_case() {
        assert!(matches_query(&post("Hello FOO", "", &[]), "foo"));
        assert!(matches_query(&post("", "a Foobar b", &[]), "FOO"));
        assert!(matches_query(&post("", "", &["rust", "FOOd"]), "foo"));
        assert!(!matches_query(&post("bar", "baz", &["qux"]), "foo"));
    }

    #[test]
    fn tag_filter_is_exact() {
        let p = post("t", "c", &["Next.js", "배포"]);
        assert!(has_tag(&p, "배포"));
        assert!(!has_tag(&p, "next.js"));
        assert!(!has_tag(&p, "Next"));
    }
}
