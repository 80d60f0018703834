//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the storage contract for posts and comments.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository writes call `validate()` before persistence.
//! - Multi-row writes (post + first comment, cascade delete, comment insert
//!   with parent check) run inside one SQLite transaction.

pub mod blog_repo;
