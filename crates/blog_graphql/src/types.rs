//! GraphQL output types.
//!
//! Output objects are built from domain records through explicit `From`
//! mappings, so the wire shape can change without touching `blog_core`.

use crate::error::{internal_error, UserError};
use crate::schema::blog_service;
use async_graphql::{ComplexObject, Context, Result as GraphQLResult, SimpleObject};
use blog_core::{Comment, CommentId, Post, PostId};
use chrono::{DateTime, FixedOffset};

#[derive(SimpleObject, Clone, Debug, PartialEq, Eq)]
#[graphql(name = "Post", complex)]
pub struct PostObject {
    pub id: PostId,
    pub title: String,
    pub description: String,
    pub publish_date: DateTime<FixedOffset>,
    pub author: String,
}

impl From<Post> for PostObject {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            title: post.title,
            description: post.description,
            publish_date: post.publish_date,
            author: post.author,
        }
    }
}

#[ComplexObject]
impl PostObject {
    /// Comments on this post, oldest first.
    async fn comments(&self, ctx: &Context<'_>) -> GraphQLResult<Vec<CommentObject>> {
        let comments = blog_service(ctx)?
            .list_comments(self.id)
            .map_err(|err| internal_error("post_comments", &err))?;
        Ok(comments.into_iter().map(CommentObject::from).collect())
    }
}

#[derive(SimpleObject, Clone, Debug, PartialEq, Eq)]
#[graphql(name = "Comment", complex)]
pub struct CommentObject {
    pub id: CommentId,
    pub text: String,
    pub author: String,
    pub post_id: PostId,
}

impl From<Comment> for CommentObject {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            text: comment.text,
            author: comment.author,
            post_id: comment.post_id,
        }
    }
}

#[ComplexObject]
impl CommentObject {
    /// Parent post. `null` only if the post was deleted after this comment
    /// was loaded.
    async fn post(&self, ctx: &Context<'_>) -> GraphQLResult<Option<PostObject>> {
        let post = blog_service(ctx)?
            .get_post(self.post_id)
            .map_err(|err| internal_error("comment_post", &err))?;
        Ok(post.map(PostObject::from))
    }
}

/// Result of post-returning mutations.
#[derive(SimpleObject, Clone, Debug)]
pub struct PostPayload {
    pub post: Option<PostObject>,
    pub error: Option<UserError>,
}

impl PostPayload {
    pub fn success(post: Post) -> Self {
        Self {
            post: Some(post.into()),
            error: None,
        }
    }

    pub fn failure(error: UserError) -> Self {
        Self {
            post: None,
            error: Some(error),
        }
    }
}

/// Result of comment-returning mutations.
#[derive(SimpleObject, Clone, Debug)]
pub struct CommentPayload {
    pub comment: Option<CommentObject>,
    pub error: Option<UserError>,
}

impl CommentPayload {
    pub fn success(comment: Comment) -> Self {
        Self {
            comment: Some(comment.into()),
            error: None,
        }
    }

    pub fn failure(error: UserError) -> Self {
        Self {
            comment: None,
            error: Some(error),
        }
    }
}

/// Result of delete mutations. `success = false` with no error means the
/// record did not exist.
#[derive(SimpleObject, Clone, Debug)]
pub struct DeletePayload {
    pub success: bool,
    pub error: Option<UserError>,
}

impl DeletePayload {
    pub fn deleted(found: bool) -> Self {
        Self {
            success: found,
            error: None,
        }
    }

    pub fn failure(error: UserError) -> Self {
        Self {
            success: false,
            error: Some(error),
        }
    }
}
