//! Comment queries and mutations.

use super::blog_service;
use crate::error::{internal_error, UserError};
use crate::types::{CommentObject, CommentPayload, DeletePayload};
use async_graphql::{Context, Object, Result as GraphQLResult};
use blog_core::{CommentId, PostId};

#[derive(Default)]
pub struct CommentQuery;

#[Object]
impl CommentQuery {
    async fn comment(
        &self,
        ctx: &Context<'_>,
        id: CommentId,
    ) -> GraphQLResult<Option<CommentObject>> {
        let comment = blog_service(ctx)?
            .get_comment(id)
            .map_err(|err| internal_error("comment", &err))?;
        Ok(comment.map(CommentObject::from))
    }
}

#[derive(Default)]
pub struct CommentMutation;

#[Object]
impl CommentMutation {
    /// Fails with `POST_NOT_FOUND` when `postId` does not resolve.
    async fn create_comment(
        &self,
        ctx: &Context<'_>,
        text: String,
        author: String,
        post_id: PostId,
    ) -> GraphQLResult<CommentPayload> {
        let payload = match blog_service(ctx)?.create_comment(text, author, post_id) {
            Ok(comment) => CommentPayload::success(comment),
            Err(err) => CommentPayload::failure(UserError::from_service("comment_create", &err)),
        };
        Ok(payload)
    }

    async fn delete_comment(
        &self,
        ctx: &Context<'_>,
        id: CommentId,
    ) -> GraphQLResult<DeletePayload> {
        let payload = match blog_service(ctx)?.delete_comment(id) {
            Ok(found) => DeletePayload::deleted(found),
            Err(err) => DeletePayload::failure(UserError::from_service("comment_delete", &err)),
        };
        Ok(payload)
    }
}
