//! Post queries and mutations.

use super::blog_service;
use crate::error::{internal_error, UserError};
use crate::types::{DeletePayload, PostObject, PostPayload};
use async_graphql::{Context, Object, Result as GraphQLResult};
use blog_core::{NewPost, Post, PostId, ServiceResult};
use chrono::{DateTime, FixedOffset};

#[derive(Default)]
pub struct PostQuery;

#[Object]
impl PostQuery {
    /// All posts ordered by id.
    async fn posts(&self, ctx: &Context<'_>) -> GraphQLResult<Vec<PostObject>> {
        let posts = blog_service(ctx)?
            .list_posts()
            .map_err(|err| internal_error("posts", &err))?;
        Ok(posts.into_iter().map(PostObject::from).collect())
    }

    /// One post, or `null` when no post has this id.
    async fn post(&self, ctx: &Context<'_>, id: PostId) -> GraphQLResult<Option<PostObject>> {
        let post = blog_service(ctx)?
            .get_post(id)
            .map_err(|err| internal_error("post", &err))?;
        Ok(post.map(PostObject::from))
    }
}

#[derive(Default)]
pub struct PostMutation;

#[Object]
impl PostMutation {
    async fn create_post(
        &self,
        ctx: &Context<'_>,
        title: String,
        description: String,
        publish_date: DateTime<FixedOffset>,
        author: String,
    ) -> GraphQLResult<PostPayload> {
        let draft = NewPost::new(title, description, publish_date, author);
        let result = blog_service(ctx)?.create_post(draft);
        Ok(post_payload("post_create", result))
    }

    /// Creates a post and its first comment, written by the same author.
    /// Neither record is stored if either write fails.
    async fn create_post_with_comment(
        &self,
        ctx: &Context<'_>,
        title: String,
        description: String,
        publish_date: DateTime<FixedOffset>,
        author: String,
        comment_text: String,
    ) -> GraphQLResult<PostPayload> {
        let draft = NewPost::new(title, description, publish_date, author);
        let result = blog_service(ctx)?.create_post_with_comment(draft, comment_text);
        Ok(post_payload("post_create_with_comment", result))
    }

    /// Replaces every mutable field. Fails with `POST_NOT_FOUND` for unknown
    /// ids.
    async fn update_post(
        &self,
        ctx: &Context<'_>,
        id: PostId,
        title: String,
        description: String,
        publish_date: DateTime<FixedOffset>,
        author: String,
    ) -> GraphQLResult<PostPayload> {
        let changes = NewPost::new(title, description, publish_date, author);
        let result = blog_service(ctx)?.update_post(id, changes);
        Ok(post_payload("post_update", result))
    }

    /// Deletes a post and its comments.
    async fn delete_post(&self, ctx: &Context<'_>, id: PostId) -> GraphQLResult<DeletePayload> {
        let payload = match blog_service(ctx)?.delete_post(id) {
            Ok(found) => DeletePayload::deleted(found),
            Err(err) => DeletePayload::failure(UserError::from_service("post_delete", &err)),
        };
        Ok(payload)
    }
}

fn post_payload(operation: &'static str, result: ServiceResult<Post>) -> PostPayload {
    match result {
        Ok(post) => PostPayload::success(post),
        Err(err) => PostPayload::failure(UserError::from_service(operation, &err)),
    }
}
