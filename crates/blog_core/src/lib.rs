//! Core domain logic for the blog backend.
//! This crate is the single source of truth for post/comment invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LogTarget};
pub use model::comment::{Comment, CommentId, NewComment, COMMENT_AUTHOR_MAX_CHARS};
pub use model::post::{NewPost, Post, PostId, POST_AUTHOR_MAX_CHARS, POST_TITLE_MAX_CHARS};
pub use model::validation::ValidationError;
pub use repo::blog_repo::{BlogRepository, RepoError, RepoResult, SqliteBlogRepository};
pub use service::blog_service::{BlogService, BlogServiceError, ServiceResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
