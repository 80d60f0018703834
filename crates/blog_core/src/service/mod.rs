//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into the blog's use-case level APIs.
//! - Keep the GraphQL facade decoupled from storage details.

pub mod blog_service;
