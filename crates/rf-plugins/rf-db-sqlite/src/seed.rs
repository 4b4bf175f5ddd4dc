//! Deployment-time seed data: the default boards and a welcome notice.

use uuid::Uuid;

use rf_core::models::timestamp;

use crate::{encode_ts, SqliteRepo};

/// `(name, description, slug, order)` for every board created on first deploy.
pub const DEFAULT_BOARDS: [(&str, &str, &str, i64); 4] = [
    ("공지사항", "사이트 관련 공지사항을 확인하세요", "notice", 1),
    ("자유게시판", "자유롭게 이야기를 나누는 공간입니다", "free", 2),
    ("질문게시판", "궁금한 것이 있으면 언제든지 질문하세요", "qna", 3),
    ("개발토론", "개발 관련 토론과 정보 공유", "dev", 4),
];

const WELCOME_TITLE: &str = "게시판 시스템이 오픈되었습니다!";
const WELCOME_AUTHOR: &str = "관리자";
const WELCOME_CONTENT: &str = "안녕하세요!

새로운 게시판 시스템이 오픈되었습니다.

주요 기능:
- 글 작성
- 댓글 시스템 (대댓글 지원)
- 조회수 표시
- 공지사항 고정

게시판 목록:
- 공지사항: 중요한 공지사항
- 자유게시판: 자유로운 소통 공간
- 질문게시판: 궁금한 점 질문
- 개발토론: 개발 관련 토론

많은 참여 부탁드립니다!";

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub boards_created: u64,
    pub notice_created: bool,
}

impl SqliteRepo {
    /// Idempotent: boards are keyed by slug and the welcome notice is only
    /// added while the notice board has no notice.
    pub async fn seed_defaults(&self) -> anyhow::Result<SeedReport> {
        let mut report = SeedReport::default();
        let now = encode_ts(timestamp());

        for (name, description, slug, order) in DEFAULT_BOARDS {
            let result = sqlx::query(
                "INSERT INTO boards (id, name, description, slug, sort_order, is_active, created_at, updated_at) \
                 VALUES (?, ?, ?, ?, ?, 1, ?, ?) ON CONFLICT (slug) DO NOTHING",
            )
            .bind(Uuid::now_v7().to_string())
            .bind(name)
            .bind(description)
            .bind(slug)
            .bind(order)
            .bind(&now)
            .bind(&now)
            .execute(&self.pool)
            .await?;
            report.boards_created += result.rows_affected();
        }
        log::info!("Seeded {} new board(s)", report.boards_created);

        let notice_board: Option<String> = sqlx::query_scalar("SELECT id FROM boards WHERE slug = 'notice'")
            .fetch_optional(&self.pool)
            .await?;
        if let Some(board_id) = notice_board {
            let notices: i64 =
                sqlx::query_scalar("SELECT COUNT(*) FROM board_posts WHERE board_id = ? AND is_notice = 1")
                    .bind(&board_id)
                    .fetch_one(&self.pool)
                    .await?;
            if notices == 0 {
                sqlx::query(
                    "INSERT INTO board_posts (id, title, content, author, board_id, view_count, is_notice, created_at, updated_at) \
                     VALUES (?, ?, ?, ?, ?, 0, 1, ?, ?)",
                )
                .bind(Uuid::now_v7().to_string())
                .bind(WELCOME_TITLE)
                .bind(WELCOME_CONTENT)
                .bind(WELCOME_AUTHOR)
                .bind(&board_id)
                .bind(&now)
                .bind(&now)
                .execute(&self.pool)
                .await?;
                report.notice_created = true;
                log::info!("Seeded welcome notice");
            }
        }

        Ok(report)
    }
}
