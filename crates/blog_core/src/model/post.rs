//! Post domain model.
//!
//! # Invariants
//! - `title` is at most 100 characters, `author` at most 50.
//! - `publish_date` keeps the caller's UTC offset.

use super::validation::{check_max_chars, ValidationError};
use chrono::{DateTime, FixedOffset};

/// Storage-assigned post identity.
pub type PostId = i64;

pub const POST_TITLE_MAX_CHARS: usize = 100;
pub const POST_AUTHOR_MAX_CHARS: usize = 50;

/// Writable post fields, used for creation and full-replacement updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub title: String,
    pub description: String,
    pub publish_date: DateTime<FixedOffset>,
    pub author: String,
}

impl NewPost {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        publish_date: DateTime<FixedOffset>,
        author: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            publish_date,
            author: author.into(),
        }
    }

    /// Checks bounded text fields. `description` is unbounded.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_max_chars("title", &self.title, POST_TITLE_MAX_CHARS)?;
        check_max_chars("author", &self.author, POST_AUTHOR_MAX_CHARS)
    }

    /// Attaches a storage-assigned identity.
    pub fn into_post(self, id: PostId) -> Post {
        Post {
            id,
            title: self.title,
            description: self.description,
            publish_date: self.publish_date,
            author: self.author,
        }
    }
}

/// A persisted blog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub description: String,
    pub publish_date: DateTime<FixedOffset>,
    pub author: String,
}

impl Post {
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_max_chars("title", &self.title, POST_TITLE_MAX_CHARS)?;
        check_max_chars("author", &self.author, POST_AUTHOR_MAX_CHARS)
    }
}
