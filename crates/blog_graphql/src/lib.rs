//! GraphQL facade for the blog backend.
//!
//! Maps every blog use-case to one named query or mutation field. Mutations
//! never fail at the GraphQL level for domain reasons: they return a payload
//! carrying either the affected entity or a `UserError` with a stable code.

pub mod error;
pub mod schema;
pub mod types;

pub use error::{ErrorCode, UserError};
pub use schema::{build_schema, BlogSchema, MutationRoot, QueryRoot, SharedBlogService};
