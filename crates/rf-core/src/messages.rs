//! # Localized Messages
//!
//! Every user-facing string the API returns. Handlers pick the text for the
//! configured [`Locale`]; nothing else in the workspace formats messages.

use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Ko,
    En,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    InvalidRequestBody,
    InvalidQuery,

    PostListFailed,
    PostSaveFailed,
    PostLoadFailed,
    PostDeleteFailed,
    PostFieldsRequired,
    PostNotFound,
    PostDeleteNotFound,
    PostDeleted,

    BoardListFailed,
    BoardLoadFailed,
    BoardNotFound,

    BoardPostListFailed,
    BoardPostCreateFailed,
    BoardPostLoadFailed,
    BoardPostDeleteFailed,
    BoardPostFieldsRequired,
    BoardPostNotFound,
    BoardPostDeleted,

    CommentListFailed,
    CommentCreateFailed,
    CommentDeleteFailed,
    CommentFieldsRequired,
    CommentParentInvalid,
    CommentNotFound,
    CommentDeleted,
}

impl Message {
    pub fn text(self, locale: Locale) -> &'static str {
        match locale {
            Locale::Ko => self.ko(),
            Locale::En => self.en(),
        }
    }

    fn ko(self) -> &'static str {
        use Message::*;
        match self {
            InvalidRequestBody => "요청 본문을 해석할 수 없습니다.",
            InvalidQuery => "요청 매개변수를 해석할 수 없습니다.",

            PostListFailed => "글 목록을 불러오는 중 오류가 발생했습니다.",
            PostSaveFailed => "글 저장 중 오류가 발생했습니다.",
            PostLoadFailed => "글을 불러오는 중 오류가 발생했습니다.",
            PostDeleteFailed => "글 삭제 중 오류가 발생했습니다.",
            PostFieldsRequired => "제목과 내용은 필수입니다.",
            PostNotFound => "글을 찾을 수 없습니다.",
            PostDeleteNotFound => "글을 찾을 수 없거나 삭제할 수 없습니다.",
            PostDeleted => "글이 성공적으로 삭제되었습니다.",

            BoardListFailed => "게시판 목록을 불러오는 중 오류가 발생했습니다.",
            BoardLoadFailed => "게시판 정보를 불러오는 중 오류가 발생했습니다.",
            BoardNotFound => "게시판을 찾을 수 없습니다.",

            BoardPostListFailed => "게시글 목록을 불러오는 중 오류가 발생했습니다.",
            BoardPostCreateFailed => "게시글 작성 중 오류가 발생했습니다.",
            BoardPostLoadFailed => "게시글을 불러오는 중 오류가 발생했습니다.",
            BoardPostDeleteFailed => "게시글 삭제 중 오류가 발생했습니다.",
            BoardPostFieldsRequired => "제목, 내용, 작성자는 필수입니다.",
            BoardPostNotFound => "게시글을 찾을 수 없습니다.",
            BoardPostDeleted => "게시글이 삭제되었습니다.",

            CommentListFailed => "댓글을 불러오는 중 오류가 발생했습니다.",
            CommentCreateFailed => "댓글 작성 중 오류가 발생했습니다.",
            CommentDeleteFailed => "댓글 삭제 중 오류가 발생했습니다.",
            CommentFieldsRequired => "내용과 작성자는 필수입니다.",
            CommentParentInvalid => "답글을 달 댓글이 이 게시글에 없습니다.",
            CommentNotFound => "댓글을 찾을 수 없습니다.",
            CommentDeleted => "댓글이 삭제되었습니다.",
        }
    }

    fn en(self) -> &'static str {
        use Message::*;
        match self {
            InvalidRequestBody => "The request body could not be parsed.",
            InvalidQuery => "The query parameters could not be parsed.",

            PostListFailed => "Failed to load posts.",
            PostSaveFailed => "Failed to save the post.",
            PostLoadFailed => "Failed to load the post.",
            PostDeleteFailed => "Failed to delete the post.",
            PostFieldsRequired => "Title and content are required.",
            PostNotFound => "Post not found.",
            PostDeleteNotFound => "Post not found or could not be deleted.",
            PostDeleted => "Post deleted.",

            BoardListFailed => "Failed to load boards.",
            BoardLoadFailed => "Failed to load the board.",
            BoardNotFound => "Board not found.",

            BoardPostListFailed => "Failed to load board posts.",
            BoardPostCreateFailed => "Failed to create the board post.",
            BoardPostLoadFailed => "Failed to load the board post.",
            BoardPostDeleteFailed => "Failed to delete the board post.",
            BoardPostFieldsRequired => "Title, content and author are required.",
            BoardPostNotFound => "Board post not found.",
            BoardPostDeleted => "Board post deleted.",

            CommentListFailed => "Failed to load comments.",
            CommentCreateFailed => "Failed to create the comment.",
            CommentDeleteFailed => "Failed to delete the comment.",
            CommentFieldsRequired => "Content and author are required.",
            CommentParentInvalid => "The comment being replied to does not belong to this post.",
            CommentNotFound => "Comment not found.",
            CommentDeleted => "Comment deleted.",
        }
    }
}
