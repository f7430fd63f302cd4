//! # NoteGreen Shared Library
//!
//! Persistence layer for the NoteGreen API: connection pool, embedded
//! migrations, and the note/folder/tag/user models.
//!
//! ## Module Organization
//!
//! - `db`: Connection pool and migrations
//! - `models`: Database models and their queries
//! - `auth`: Password hashing

pub mod auth;
pub mod db;
pub mod models;

/// Current version of the NoteGreen shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
