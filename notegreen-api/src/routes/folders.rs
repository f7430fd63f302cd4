/// Folder endpoints
///
/// # Endpoints
///
/// - `GET /api/folders` - List folders by name
/// - `POST /api/folders` - Create a folder
/// - `PUT /api/folders/:id` - Rename a folder
/// - `DELETE /api/folders/:id` - Delete a folder; its notes become unfiled
/// - `GET /api/folders/:id/notes` - Notes in a folder (`null` = unfiled)

use crate::{
    app::AppState,
    de::trimmed,
    error::{ApiError, ApiResult},
    extract::{AppPath, ValidatedJson},
};
use axum::{extract::State, http::StatusCode, Json};
use notegreen_shared::models::{
    folder::{CreateFolder, Folder},
    note::Note,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

const DUPLICATE_NAME: &str = "A folder with this name already exists";

/// Path segment that selects notes without a folder
const UNFILED: &str = "null";

/// Create or rename folder request
#[derive(Debug, Deserialize, Validate)]
pub struct FolderRequest {
    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 1, max = 100, message = "Folder name must be between 1 and 100 characters"))]
    pub name: String,
}

fn folder_not_found() -> ApiError {
    ApiError::NotFound("Folder not found".to_string())
}

/// List all folders ordered by name
pub async fn list_folders(State(state): State<AppState>) -> ApiResult<Json<Vec<Folder>>> {
    let folders = Folder::list(&state.db).await?;
    Ok(Json(folders))
}

/// Create a folder
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `409 Conflict`: Name already taken
pub async fn create_folder(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<FolderRequest>,
) -> ApiResult<(StatusCode, Json<Folder>)> {
    let folder = Folder::create(&state.db, CreateFolder { name: req.name })
        .await
        .map_err(|e| ApiError::from_db(e, DUPLICATE_NAME))?;

    tracing::info!(folder_id = %folder.id, "Folder created");

    Ok((StatusCode::CREATED, Json(folder)))
}

/// Rename a folder
///
/// # Errors
///
/// - `404 Not Found`: No such folder
/// - `409 Conflict`: Name already taken
pub async fn update_folder(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    ValidatedJson(req): ValidatedJson<FolderRequest>,
) -> ApiResult<Json<Folder>> {
    let folder = Folder::rename(&state.db, id, &req.name)
        .await
        .map_err(|e| ApiError::from_db(e, DUPLICATE_NAME))?
        .ok_or_else(folder_not_found)?;

    Ok(Json(folder))
}

/// Delete a folder, keeping its notes
pub async fn delete_folder(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> ApiResult<StatusCode> {
    if !Folder::delete(&state.db, id).await? {
        return Err(folder_not_found());
    }

    tracing::info!(folder_id = %id, "Folder deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// List notes in a folder, newest first
///
/// # Endpoint
///
/// ```text
/// GET /api/folders/:id/notes
/// GET /api/folders/null/notes    # notes without a folder
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: ID is neither a UUID nor `null`
/// - `404 Not Found`: No such folder
pub async fn list_folder_notes(
    State(state): State<AppState>,
    AppPath(raw_id): AppPath<String>,
) -> ApiResult<Json<Vec<Note>>> {
    let folder_id = parse_folder_id(&raw_id)?;

    if let Some(id) = folder_id {
        Folder::find_by_id(&state.db, id)
            .await?
            .ok_or_else(folder_not_found)?;
    }

    let notes = Note::list_by_folder(&state.db, folder_id).await?;
    Ok(Json(notes))
}

fn parse_folder_id(raw: &str) -> ApiResult<Option<Uuid>> {
    if raw == UNFILED {
        return Ok(None);
    }

    Uuid::parse_str(raw)
        .map(Some)
        .map_err(|_| ApiError::BadRequest("Invalid folder ID".to_string()))
}
