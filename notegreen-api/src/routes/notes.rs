/// Note endpoints
///
/// # Endpoints
///
/// - `GET /api/notes?q=` - List notes, newest first, optionally filtered
/// - `POST /api/notes` - Create a note, optionally with tags
/// - `GET /api/notes/:id` - Fetch a note with its tags
/// - `PUT /api/notes/:id` - Partially update a note
/// - `DELETE /api/notes/:id` - Delete a note

use crate::{
    app::AppState,
    de::{double_option, trimmed, trimmed_option},
    error::{ApiError, ApiResult},
    extract::{AppPath, AppQuery, ValidatedJson},
};
use axum::{extract::State, http::StatusCode, Json};
use notegreen_shared::models::note::{CreateNote, Note, NoteWithTags, UpdateNote};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// Query parameters for listing notes
#[derive(Debug, Default, Deserialize)]
pub struct ListNotesQuery {
    /// Case-insensitive substring matched against title and content
    pub q: Option<String>,
}

/// Create note request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateNoteRequest {
    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 1, max = 500, message = "Title must be between 1 and 500 characters"))]
    pub title: String,

    /// Rich-text body (HTML), stored as given
    #[serde(default)]
    pub content: String,

    #[serde(default)]
    pub folder_id: Option<Uuid>,

    #[serde(default)]
    pub tag_ids: Vec<Uuid>,
}

/// Update note request
///
/// Omitted fields are left unchanged. `folderId: null` takes the note out of
/// its folder; `tagIds` replaces the whole tag set.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNoteRequest {
    #[serde(default, deserialize_with = "trimmed_option")]
    #[validate(length(min = 1, max = 500, message = "Title must be between 1 and 500 characters"))]
    pub title: Option<String>,

    pub content: Option<String>,

    #[serde(default, deserialize_with = "double_option")]
    pub folder_id: Option<Option<Uuid>>,

    pub tag_ids: Option<Vec<Uuid>>,
}

fn note_not_found() -> ApiError {
    ApiError::NotFound("Note not found".to_string())
}

/// List notes
///
/// # Endpoint
///
/// ```text
/// GET /api/notes?q=groceries
/// ```
///
/// Returns notes without their tags, most recently updated first. A blank
/// `q` lists everything.
pub async fn list_notes(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ListNotesQuery>,
) -> ApiResult<Json<Vec<Note>>> {
    let notes = Note::list(&state.db, query.q.as_deref()).await?;
    Ok(Json(notes))
}

/// Fetch a single note with its tags
///
/// # Errors
///
/// - `400 Bad Request`: Malformed ID
/// - `404 Not Found`: No such note
pub async fn get_note(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> ApiResult<Json<NoteWithTags>> {
    let note = Note::find_with_tags(&state.db, id)
        .await?
        .ok_or_else(note_not_found)?;

    Ok(Json(note))
}

/// Create a note
///
/// # Endpoint
///
/// ```text
/// POST /api/notes
/// Content-Type: application/json
///
/// {
///   "title": "Groceries",
///   "content": "<p>milk, eggs</p>",
///   "folderId": "4f0c...",
///   "tagIds": ["9a1e..."]
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed, or the folder or a tag doesn't
///   exist (nothing is written)
pub async fn create_note(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateNoteRequest>,
) -> ApiResult<(StatusCode, Json<NoteWithTags>)> {
    let note = Note::create(
        &state.db,
        CreateNote {
            title: req.title,
            content: req.content,
            folder_id: req.folder_id,
            tag_ids: req.tag_ids,
        },
    )
    .await?;

    tracing::info!(note_id = %note.note.id, "Note created");

    Ok((StatusCode::CREATED, Json(note)))
}

/// Partially update a note
///
/// Always advances `updatedAt`, even for an empty body.
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed, or the folder or a tag doesn't exist
/// - `404 Not Found`: No such note
pub async fn update_note(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateNoteRequest>,
) -> ApiResult<Json<NoteWithTags>> {
    let note = Note::update(
        &state.db,
        id,
        UpdateNote {
            title: req.title,
            content: req.content,
            folder_id: req.folder_id,
            tag_ids: req.tag_ids,
        },
    )
    .await?
    .ok_or_else(note_not_found)?;

    Ok(Json(note))
}

/// Delete a note and its tag associations
pub async fn delete_note(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> ApiResult<StatusCode> {
    if !Note::delete(&state.db, id).await? {
        return Err(note_not_found());
    }

    tracing::info!(note_id = %id, "Note deleted");
    Ok(StatusCode::NO_CONTENT)
}
