//! # NoteGreen API Server Library
//!
//! REST API for notes, folders and tags, plus the optional static web client.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `extract`: Extractors that reject with `ApiError`
//! - `de`: Serde helpers for request bodies
//! - `middleware`: Security headers
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod de;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;
