/// API route handlers
///
/// Handlers are organized by resource:
///
/// - `health`: Health check endpoint
/// - `notes`: Note CRUD and search
/// - `folders`: Folder CRUD and per-folder note listing
/// - `tags`: Tag CRUD and per-tag note listing
/// - `users`: Registration and login

pub mod folders;
pub mod health;
pub mod notes;
pub mod tags;
pub mod users;

use crate::error::ApiError;

/// Fallback for unknown `/api` paths
pub async fn api_not_found() -> ApiError {
    ApiError::NotFound("No such API endpoint".to_string())
}
