//! Seeds a fresh deployment: default boards, the welcome notice, and a
//! couple of sample blog posts when the configured post store is empty.
//! Safe to run repeatedly.

use rf_config::AppConfig;
use rf_core::PostDraft;

fn sample_posts() -> Vec<PostDraft> {
    vec![
        PostDraft {
            title: "블로그에 오신 것을 환영합니다".into(),
            content: "첫 번째 샘플 글입니다. 글 목록, 검색, 카테고리와 태그 필터를 확인해 보세요.".into(),
            category: Some("공지".into()),
            tags: vec!["환영".into(), "샘플".into()],
        },
        PostDraft {
            title: "Rust로 만든 게시판".into(),
            content: "actix-web과 SQLite 위에서 동작하는 게시판과 블로그 API를 소개합니다.".into(),
            category: Some("기술".into()),
            tags: vec!["Rust".into(), "actix-web".into(), "SQLite".into()],
        },
    ]
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = AppConfig::load()?;
    let repo = rusty_forum::connect_database(&config).await?;

    let report = repo.seed_defaults().await?;
    log::info!(
        "Boards created: {}, welcome notice created: {}",
        report.boards_created,
        report.notice_created
    );

    let posts = rusty_forum::build_post_store(&config, &repo).await?;
    if posts.list_all().await?.is_empty() {
        for draft in sample_posts() {
            let post = posts.save(draft).await?;
            log::info!("Added sample post {} ({})", post.id, post.title);
        }
    } else {
        log::info!("Post store already has posts, skipping samples");
    }

    repo.close().await;
    Ok(())
}
