/// User endpoints
///
/// Accounts are standalone: notes, folders and tags are shared and carry no
/// owner, and no session token is issued.
///
/// # Endpoints
///
/// - `POST /api/users` - Register a user
/// - `POST /api/users/login` - Check a username and password

use crate::{
    app::AppState,
    de::trimmed,
    error::{ApiError, ApiResult},
    extract::ValidatedJson,
};
use axum::{extract::State, http::StatusCode, Json};
use notegreen_shared::{
    auth::password,
    models::user::{CreateUser, User},
};
use serde::Deserialize;
use validator::Validate;

const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 3, max = 50, message = "Username must be between 3 and 50 characters"))]
    pub username: String,

    /// Checked against the password rules before hashing
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Register a new user
///
/// # Endpoint
///
/// ```text
/// POST /api/users
/// Content-Type: application/json
///
/// { "username": "ada", "password": "analytical-engine" }
/// ```
///
/// # Response
///
/// ```json
/// { "id": "uuid", "username": "ada", "createdAt": "2025-03-01T12:00:00Z" }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `409 Conflict`: Username already taken
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<User>)> {
    password::validate_password(&req.password)
        .map_err(|message| ApiError::invalid_field("password", message))?;

    // Argon2 is CPU-bound; keep it off the async workers
    let plaintext = req.password;
    let password_hash =
        tokio::task::spawn_blocking(move || password::hash_password(&plaintext)).await??;

    let user = User::create(
        &state.db,
        CreateUser {
            username: req.username,
            password_hash,
        },
    )
    .await
    .map_err(|e| ApiError::from_db(e, "Username is already taken"))?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok((StatusCode::CREATED, Json(user)))
}

/// Verify credentials
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `401 Unauthorized`: Unknown user or wrong password
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<User>> {
    let user = User::find_by_username(&state.db, &req.username).await?;
    let plaintext = req.password;

    let Some(user) = user else {
        tokio::task::spawn_blocking(move || password::verify_dummy(&plaintext)).await??;
        tracing::debug!("Rejected login for unknown username");
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    };

    let stored_hash = user.password_hash.clone();
    let valid =
        tokio::task::spawn_blocking(move || password::verify_password(&plaintext, &stored_hash))
            .await??;

    if !valid {
        tracing::debug!(user_id = %user.id, "Rejected login");
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }

    Ok(Json(user))
}
