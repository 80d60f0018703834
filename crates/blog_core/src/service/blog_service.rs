//! Post/comment use-case service.
//!
//! # Responsibility
//! - Provide the create/read/update/delete entry points used by the facade.
//! - Translate repository outcomes into domain errors.
//!
//! # Invariants
//! - Reads report absence as `None`/empty, never as an error.
//! - Targeted mutations (`update_post`, `create_comment`) report a missing
//!   post as `BlogServiceError::PostNotFound`.
//! - Deletes report a missing record as `false`.
//! - The service holds no state besides its repository.

use crate::model::comment::{Comment, CommentId, NewComment};
use crate::model::post::{NewPost, Post, PostId};
use crate::model::validation::ValidationError;
use crate::repo::blog_repo::{BlogRepository, RepoError, POSTS_TABLE};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, BlogServiceError>;

/// Service error for blog use-cases.
#[derive(Debug)]
pub enum BlogServiceError {
    /// Input failed field validation; nothing was written.
    Validation(ValidationError),
    /// Target post does not exist.
    PostNotFound(PostId),
    /// Persistence-layer failure.
    Storage(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for BlogServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::PostNotFound(id) => write!(f, "post not found: {id}"),
            Self::Storage(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent blog state: {details}"),
        }
    }
}

impl Error for BlogServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Storage(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for BlogServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            RepoError::NotFound { table, id } if table == POSTS_TABLE => Self::PostNotFound(id),
            other => Self::Storage(other),
        }
    }
}

/// Blog service facade over repository implementations.
pub struct BlogService<R: BlogRepository> {
    repo: R,
}

impl<R: BlogRepository> BlogService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates one post and returns it as stored.
    pub fn create_post(&self, post: NewPost) -> ServiceResult<Post> {
        let post_id = self
            .repo
            .insert_post(&post)
            .inspect_err(log_write_failure("post_create"))?;
        info!("event=post_create module=service status=ok post_id={post_id}");
        self.read_back_post(post_id, "created post not found in read-back")
    }

    /// Creates a post together with its first comment, authored by the post
    /// author. Either both records are stored or neither is.
    pub fn create_post_with_comment(
        &self,
        post: NewPost,
        comment_text: impl Into<String>,
    ) -> ServiceResult<Post> {
        let comment_text = comment_text.into();
        let (post_id, comment_id) = self
            .repo
            .insert_post_with_comment(&post, comment_text.as_str())
            .inspect_err(log_write_failure("post_create_with_comment"))?;
        info!(
            "event=post_create_with_comment module=service status=ok post_id={post_id} comment_id={comment_id}"
        );
        self.read_back_post(post_id, "created post not found in read-back")
    }

    /// Attaches a comment to an existing post.
    ///
    /// # Errors
    /// - `PostNotFound` when `post_id` does not resolve; nothing is written.
    pub fn create_comment(
        &self,
        text: impl Into<String>,
        author: impl Into<String>,
        post_id: PostId,
    ) -> ServiceResult<Comment> {
        let comment = NewComment::new(text, author, post_id);
        let comment_id = self
            .repo
            .insert_comment(&comment)
            .inspect_err(log_write_failure("comment_create"))?;
        info!(
            "event=comment_create module=service status=ok comment_id={comment_id} post_id={post_id}"
        );
        Ok(comment.into_comment(comment_id))
    }

    /// Overwrites title, description, publish date and author of a post.
    ///
    /// # Errors
    /// - `PostNotFound` when `id` does not resolve; storage is unchanged.
    pub fn update_post(&self, id: PostId, changes: NewPost) -> ServiceResult<Post> {
        let post = changes.into_post(id);
        self.repo
            .update_post(&post)
            .inspect_err(log_write_failure("post_update"))?;
        info!("event=post_update module=service status=ok post_id={id}");
        self.read_back_post(id, "updated post not found in read-back")
    }

    /// Deletes a post and all of its comments. Returns `false` when the post
    /// did not exist.
    pub fn delete_post(&self, id: PostId) -> ServiceResult<bool> {
        let found = self
            .repo
            .delete_post_cascade(id)
            .inspect_err(log_write_failure("post_delete"))?;
        info!("event=post_delete module=service status=ok post_id={id} found={found}");
        Ok(found)
    }

    /// Deletes one comment. Returns `false` when it did not exist.
    pub fn delete_comment(&self, id: CommentId) -> ServiceResult<bool> {
        let found = self
            .repo
            .delete_comment(id)
            .inspect_err(log_write_failure("comment_delete"))?;
        info!("event=comment_delete module=service status=ok comment_id={id} found={found}");
        Ok(found)
    }

    pub fn get_post(&self, id: PostId) -> ServiceResult<Option<Post>> {
        Ok(self.repo.get_post(id)?)
    }

    /// Lists all posts ordered by id.
    pub fn list_posts(&self) -> ServiceResult<Vec<Post>> {
        Ok(self.repo.list_posts()?)
    }

    pub fn get_comment(&self, id: CommentId) -> ServiceResult<Option<Comment>> {
        Ok(self.repo.get_comment(id)?)
    }

    /// Lists comments of one post ordered by id; empty for unknown posts.
    pub fn list_comments(&self, post_id: PostId) -> ServiceResult<Vec<Comment>> {
        Ok(self.repo.list_comments_for_post(post_id)?)
    }

    fn read_back_post(&self, id: PostId, details: &'static str) -> ServiceResult<Post> {
        self.repo
            .get_post(id)?
            .ok_or(BlogServiceError::InconsistentState(details))
    }
}

fn log_write_failure(event: &'static str) -> impl Fn(&RepoError) {
    move |err: &RepoError| {
        if err.is_storage_failure() {
            warn!("event={event} module=service status=error error={err}");
        } else {
            info!("event={event} module=service status=rejected reason={err}");
        }
    }
}
