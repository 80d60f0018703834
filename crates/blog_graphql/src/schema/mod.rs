//! GraphQL schema roots and construction.

pub mod comment;
pub mod post;

use crate::error::internal_error;
use async_graphql::{Context, EmptySubscription, MergedObject, Result as GraphQLResult, Schema};
use blog_core::{BlogService, SqliteBlogRepository};

/// Service instance shared by every resolver through schema data.
pub type SharedBlogService = BlogService<SqliteBlogRepository>;

/// Nesting cap for `post { comments { post { ... } } }` cycles.
const MAX_QUERY_DEPTH: usize = 32;

#[derive(MergedObject, Default)]
pub struct QueryRoot(post::PostQuery, comment::CommentQuery);

#[derive(MergedObject, Default)]
pub struct MutationRoot(post::PostMutation, comment::CommentMutation);

pub type BlogSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Builds the schema once at startup; the returned value is cheap to clone
/// and is what request handlers execute against.
pub fn build_schema(service: SharedBlogService) -> BlogSchema {
    Schema::build(QueryRoot::default(), MutationRoot::default(), EmptySubscription)
        .data(service)
        .limit_depth(MAX_QUERY_DEPTH)
        .finish()
}

pub(crate) fn blog_service<'a>(ctx: &Context<'a>) -> GraphQLResult<&'a SharedBlogService> {
    ctx.data::<SharedBlogService>()
        .map_err(|_| internal_error("service_lookup", &"blog service missing from schema data"))
}
