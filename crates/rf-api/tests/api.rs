//! End-to-end tests over the actix service with real storage plugins.

use std::sync::Arc;

use actix_web::http::header::ContentType;
use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use rf_api::{configure_routes, AppState};
use rf_core::{Locale, MockPostStore, PostStore};
use rf_db_sqlite::SqliteRepo;
use rf_store_local::LocalPostStore;
use serde_json::{json, Value};

async fn seeded_repo() -> SqliteRepo {
    let repo = SqliteRepo::new("sqlite::memory:").await.unwrap();
    repo.seed_defaults().await.unwrap();
    repo
}

async fn sqlite_state(locale: Locale) -> AppState {
    let repo = seeded_repo().await;
    AppState::new(Arc::new(repo.clone()), Arc::new(repo), locale)
}

async fn state_with_posts(posts: Arc<dyn PostStore>) -> AppState {
    AppState::new(posts, Arc::new(seeded_repo().await), Locale::En)
}

macro_rules! app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state))
                .configure(configure_routes),
        )
        .await
    };
}

macro_rules! send {
    ($app:expr, $req:expr) => {{
        let resp = test::call_service(&$app, $req.to_request()).await;
        let status = resp.status();
        let body: Value = test::read_body_json(resp).await;
        (status, body)
    }};
}

fn post_json(uri: &str, body: Value) -> test::TestRequest {
    test::TestRequest::post().uri(uri).set_json(body)
}

// ── Blog posts ──────────────────────────────────────────────────────────────

#[actix_web::test]
async fn test_create_post_fills_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let state = state_with_posts(Arc::new(LocalPostStore::new(dir.path().to_path_buf()))).await;
    let app = app!(state);

    let (status, created) = send!(app, post_json("/api/posts", json!({"title": "A", "content": "B"})));
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["title"], "A");
    assert_eq!(created["category"], "");
    assert_eq!(created["tags"], json!([]));
    assert!(created["createdAt"].is_string());

    let id = created["id"].as_str().unwrap();
    let (status, fetched) = send!(app, test::TestRequest::get().uri(&format!("/api/posts/{id}")));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let (status, listed) = send!(app, test::TestRequest::get().uri("/api/posts"));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn test_post_filters() {
    let app = app!(sqlite_state(Locale::En).await);

    send!(
        app,
        post_json(
            "/api/posts",
            json!({"title": "Rust tips", "content": "borrowing", "category": "dev", "tags": ["rust"]})
        )
    );
    send!(
        app,
        post_json(
            "/api/posts",
            json!({"title": "Travel", "content": "Busan", "category": "life", "tags": ["trip", 3]})
        )
    );

    let (_, found) = send!(app, test::TestRequest::get().uri("/api/posts?q=RUST"));
    assert_eq!(found.as_array().unwrap().len(), 1);
    assert_eq!(found[0]["title"], "Rust tips");

    let (_, life) = send!(app, test::TestRequest::get().uri("/api/posts?category=life"));
    assert_eq!(life.as_array().unwrap().len(), 1);
    assert_eq!(life[0]["tags"], json!(["trip"]));

    let (_, all) = send!(app, test::TestRequest::get().uri("/api/posts?category=all"));
    assert_eq!(all.as_array().unwrap().len(), 2);

    let (_, tagged) = send!(app, test::TestRequest::get().uri("/api/posts?tag=rust"));
    assert_eq!(tagged.as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn test_create_post_requires_title_and_content() {
    let app = app!(sqlite_state(Locale::En).await);

    let (status, body) = send!(app, post_json("/api/posts", json!({"title": "  ", "content": "B"})));
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Title and content are required.");
}

#[actix_web::test]
async fn test_malformed_body_is_localized() {
    let app = app!(sqlite_state(Locale::En).await);

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .insert_header(ContentType::json())
        .set_payload("{not json");
    let (status, body) = send!(app, req);
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "The request body could not be parsed.");
}

#[actix_web::test]
async fn test_bad_query_string_is_localized() {
    let app = app!(sqlite_state(Locale::En).await);

    let (status, body) = send!(app, test::TestRequest::get().uri("/api/posts?q=a&q=b"));
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "The query parameters could not be parsed.");

    let (status, body) = send!(app, test::TestRequest::get().uri("/api/boards/free/posts?page=1&page=2"));
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "The query parameters could not be parsed.");
}

#[actix_web::test]
async fn test_delete_post() {
    let app = app!(sqlite_state(Locale::En).await);

    let (_, created) = send!(app, post_json("/api/posts", json!({"title": "A", "content": "B"})));
    let uri = format!("/api/posts/{}", created["id"].as_str().unwrap());

    let (status, body) = send!(app, test::TestRequest::delete().uri(&uri));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Post deleted.");

    let (status, body) = send!(app, test::TestRequest::delete().uri(&uri));
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Post not found or could not be deleted.");

    let (status, _) = send!(app, test::TestRequest::get().uri(&uri));
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_store_failure_is_500() {
    let mut store = MockPostStore::new();
    store
        .expect_list_all()
        .returning(|| Err(anyhow::anyhow!("disk unavailable")));
    let app = app!(state_with_posts(Arc::new(store)).await);

    let (status, body) = send!(app, test::TestRequest::get().uri("/api/posts"));
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to load posts.");
}

// ── Boards ──────────────────────────────────────────────────────────────────

#[actix_web::test]
async fn test_seeded_boards_in_order() {
    let app = app!(sqlite_state(Locale::En).await);

    let (status, boards) = send!(app, test::TestRequest::get().uri("/api/boards"));
    assert_eq!(status, StatusCode::OK);
    let slugs: Vec<&str> = boards
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["slug"].as_str().unwrap())
        .collect();
    assert_eq!(slugs, ["notice", "free", "qna", "dev"]);
    assert_eq!(boards[0]["postCount"], 1);
    assert_eq!(boards[1]["postCount"], 0);

    let (status, board) = send!(app, test::TestRequest::get().uri("/api/boards/qna"));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(board["name"], "질문게시판");
}

#[actix_web::test]
async fn test_unknown_board_defaults_to_korean() {
    let app = app!(sqlite_state(Locale::default()).await);

    let (status, body) = send!(app, test::TestRequest::get().uri("/api/boards/nope"));
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "게시판을 찾을 수 없습니다.");

    let (status, _) = send!(app, test::TestRequest::get().uri("/api/boards/nope/posts"));
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ── Board posts ─────────────────────────────────────────────────────────────

#[actix_web::test]
async fn test_viewing_counts_views() {
    let app = app!(sqlite_state(Locale::En).await);

    let (status, created) = send!(
        app,
        post_json("/api/boards/free/posts", json!({"title": "Hi", "content": "there", "author": "kim"}))
    );
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["viewCount"], 0);
    assert_eq!(created["isNotice"], false);
    assert_eq!(created["board"]["slug"], "free");

    let uri = format!("/api/boards/free/posts/{}", created["id"].as_str().unwrap());
    let (_, first) = send!(app, test::TestRequest::get().uri(&uri));
    let (_, second) = send!(app, test::TestRequest::get().uri(&uri));
    assert_eq!(first["viewCount"], 1);
    assert_eq!(second["viewCount"], 2);
    assert_eq!(second["board"]["name"], "자유게시판");
    assert_eq!(second["board"]["id"], second["boardId"]);
}

#[actix_web::test]
async fn test_board_post_requires_author() {
    let app = app!(sqlite_state(Locale::En).await);

    let (status, body) = send!(
        app,
        post_json("/api/boards/free/posts", json!({"title": "Hi", "content": "there"}))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Title, content and author are required.");
}

#[actix_web::test]
async fn test_post_is_scoped_to_its_board() {
    let app = app!(sqlite_state(Locale::En).await);

    let (_, created) = send!(
        app,
        post_json("/api/boards/free/posts", json!({"title": "Hi", "content": "there", "author": "kim"}))
    );
    let id = created["id"].as_str().unwrap();

    let (status, body) = send!(app, test::TestRequest::get().uri(&format!("/api/boards/qna/posts/{id}")));
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Board post not found.");

    let (status, _) = send!(app, test::TestRequest::get().uri("/api/boards/free/posts/not-a-uuid"));
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_listing_pages_with_notices_first() {
    let app = app!(sqlite_state(Locale::En).await);

    send!(
        app,
        post_json("/api/boards/dev/posts", json!({"title": "Rules", "content": "Be kind", "author": "admin", "isNotice": true}))
    );
    for n in 0..3 {
        send!(
            app,
            post_json("/api/boards/dev/posts", json!({"title": format!("Post {n}"), "content": "x", "author": "lee"}))
        );
    }

    let (_, first) = send!(app, test::TestRequest::get().uri("/api/boards/dev/posts?page=1&limit=2"));
    assert_eq!(first.as_array().unwrap().len(), 2);
    assert_eq!(first[0]["board"]["slug"], "dev");
    assert_eq!(first[0]["title"], "Rules");
    assert_eq!(first[1]["title"], "Post 2");

    let (_, second) = send!(app, test::TestRequest::get().uri("/api/boards/dev/posts?page=2&limit=2"));
    assert_eq!(second.as_array().unwrap().len(), 2);
    assert_eq!(second[1]["title"], "Post 0");

    let (status, lenient) = send!(app, test::TestRequest::get().uri("/api/boards/dev/posts?page=zero&limit=abc"));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(lenient.as_array().unwrap().len(), 4);
}

#[actix_web::test]
async fn test_delete_board_post() {
    let app = app!(sqlite_state(Locale::En).await);

    let (_, created) = send!(
        app,
        post_json("/api/boards/free/posts", json!({"title": "Hi", "content": "there", "author": "kim"}))
    );
    let uri = format!("/api/boards/free/posts/{}", created["id"].as_str().unwrap());

    let (status, body) = send!(app, test::TestRequest::delete().uri(&uri));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Board post deleted.");

    let (status, _) = send!(app, test::TestRequest::delete().uri(&uri));
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ── Comments ────────────────────────────────────────────────────────────────

#[actix_web::test]
async fn test_comment_threads() {
    let app = app!(sqlite_state(Locale::En).await);

    let (_, post) = send!(
        app,
        post_json("/api/boards/free/posts", json!({"title": "Hi", "content": "there", "author": "kim"}))
    );
    let base = format!("/api/boards/free/posts/{}", post["id"].as_str().unwrap());
    let comments = format!("{base}/comments");

    let (status, root) = send!(app, post_json(&comments, json!({"content": "first", "author": "park"})));
    assert_eq!(status, StatusCode::CREATED);
    assert!(root["parentId"].is_null());

    let (status, reply) = send!(
        app,
        post_json(&comments, json!({"content": "reply", "author": "kim", "parentId": root["id"]}))
    );
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(reply["parentId"], root["id"]);

    let (status, threads) = send!(app, test::TestRequest::get().uri(&comments));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(threads.as_array().unwrap().len(), 1);
    assert_eq!(threads[0]["content"], "first");
    assert_eq!(threads[0]["replies"][0]["content"], "reply");

    let (_, viewed) = send!(app, test::TestRequest::get().uri(&base));
    assert_eq!(viewed["commentCount"], 2);
}

#[actix_web::test]
async fn test_reply_parent_must_share_the_post() {
    let app = app!(sqlite_state(Locale::En).await);

    let mut comment_uris = Vec::new();
    for title in ["one", "two"] {
        let (_, post) = send!(
            app,
            post_json("/api/boards/free/posts", json!({"title": title, "content": "x", "author": "kim"}))
        );
        comment_uris.push(format!("/api/boards/free/posts/{}/comments", post["id"].as_str().unwrap()));
    }

    let (_, elsewhere) = send!(app, post_json(&comment_uris[0], json!({"content": "c", "author": "a"})));
    let (status, body) = send!(
        app,
        post_json(&comment_uris[1], json!({"content": "r", "author": "b", "parentId": elsewhere["id"]}))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "The comment being replied to does not belong to this post.");

    let (status, _) = send!(
        app,
        post_json(&comment_uris[1], json!({"content": "r", "author": "b", "parentId": "garbage"}))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_delete_comment() {
    let app = app!(sqlite_state(Locale::En).await);

    let (_, post) = send!(
        app,
        post_json("/api/boards/free/posts", json!({"title": "Hi", "content": "there", "author": "kim"}))
    );
    let comments = format!("/api/boards/free/posts/{}/comments", post["id"].as_str().unwrap());
    let (_, root) = send!(app, post_json(&comments, json!({"content": "first", "author": "park"})));
    send!(
        app,
        post_json(&comments, json!({"content": "reply", "author": "kim", "parentId": root["id"]}))
    );

    let uri = format!("{comments}/{}", root["id"].as_str().unwrap());
    let (status, body) = send!(app, test::TestRequest::delete().uri(&uri));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Comment deleted.");

    // Replies go with their parent.
    let (_, threads) = send!(app, test::TestRequest::get().uri(&comments));
    assert_eq!(threads, json!([]));

    let (status, body) = send!(app, test::TestRequest::delete().uri(&uri));
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Comment not found.");
}

#[actix_web::test]
async fn test_comments_on_missing_post() {
    let app = app!(sqlite_state(Locale::En).await);

    let uri = format!("/api/boards/free/posts/{}/comments", uuid::Uuid::now_v7());
    let (status, body) = send!(app, test::TestRequest::get().uri(&uri));
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Board post not found.");
}
