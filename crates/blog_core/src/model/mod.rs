//! Blog domain model.
//!
//! # Responsibility
//! - Define the persisted `Post` and `Comment` records and their drafts.
//! - Own field-level validation shared by storage write paths.
//!
//! # Invariants
//! - Identity (`PostId`, `CommentId`) is allocated by storage, never by callers.
//! - Records carry no behavior beyond `validate()`.

pub mod comment;
pub mod post;
pub mod validation;
