//! Comment domain model.

use super::post::PostId;
use super::validation::{check_max_chars, ValidationError};

/// Storage-assigned comment identity.
pub type CommentId = i64;

pub const COMMENT_AUTHOR_MAX_CHARS: usize = 50;

/// Writable comment fields. `post_id` must reference a live post when the
/// draft is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub text: String,
    pub author: String,
    pub post_id: PostId,
}

impl NewComment {
    pub fn new(text: impl Into<String>, author: impl Into<String>, post_id: PostId) -> Self {
        Self {
            text: text.into(),
            author: author.into(),
            post_id,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        check_max_chars("author", &self.author, COMMENT_AUTHOR_MAX_CHARS)
    }

    pub fn into_comment(self, id: CommentId) -> Comment {
        Comment {
            id,
            text: self.text,
            author: self.author,
            post_id: self.post_id,
        }
    }
}

/// A persisted comment attached to exactly one post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: CommentId,
    pub text: String,
    pub author: String,
    pub post_id: PostId,
}

impl Comment {
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_max_chars("author", &self.author, COMMENT_AUTHOR_MAX_CHARS)
    }
}
