/// Tag endpoints
///
/// # Endpoints
///
/// - `GET /api/tags` - List tags by name
/// - `POST /api/tags` - Create a tag
/// - `PUT /api/tags/:id` - Change a tag's name and/or color
/// - `DELETE /api/tags/:id` - Delete a tag; notes keep existing
/// - `GET /api/tags/:id/notes` - Notes carrying a tag

use crate::{
    app::AppState,
    de::{trimmed, trimmed_option},
    error::{ApiError, ApiResult},
    extract::{AppPath, ValidatedJson},
};
use axum::{extract::State, http::StatusCode, Json};
use notegreen_shared::models::{
    note::Note,
    tag::{is_hex_color, CreateTag, Tag, UpdateTag, DEFAULT_TAG_COLOR},
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

const DUPLICATE_NAME: &str = "A tag with this name already exists";

/// Create tag request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTagRequest {
    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 1, max = 50, message = "Tag name must be between 1 and 50 characters"))]
    pub name: String,

    /// `#RGB` or `#RRGGBB`; defaults to the standard tag color
    #[serde(default, deserialize_with = "trimmed_option")]
    pub color: Option<String>,
}

/// Update tag request; omitted fields are left unchanged
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateTagRequest {
    #[serde(default, deserialize_with = "trimmed_option")]
    #[validate(length(min = 1, max = 50, message = "Tag name must be between 1 and 50 characters"))]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "trimmed_option")]
    pub color: Option<String>,
}

fn tag_not_found() -> ApiError {
    ApiError::NotFound("Tag not found".to_string())
}

fn check_color(color: &str) -> ApiResult<()> {
    if is_hex_color(color) {
        Ok(())
    } else {
        Err(ApiError::invalid_field(
            "color",
            "Color must be a hex color such as #CC3300",
        ))
    }
}

/// List all tags ordered by name
pub async fn list_tags(State(state): State<AppState>) -> ApiResult<Json<Vec<Tag>>> {
    let tags = Tag::list(&state.db).await?;
    Ok(Json(tags))
}

/// Create a tag
///
/// # Endpoint
///
/// ```text
/// POST /api/tags
/// Content-Type: application/json
///
/// { "name": "urgent", "color": "#FF3300" }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `409 Conflict`: Name already taken
pub async fn create_tag(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateTagRequest>,
) -> ApiResult<(StatusCode, Json<Tag>)> {
    let color = req.color.unwrap_or_else(|| DEFAULT_TAG_COLOR.to_string());
    check_color(&color)?;

    let tag = Tag::create(
        &state.db,
        CreateTag {
            name: req.name,
            color,
        },
    )
    .await
    .map_err(|e| ApiError::from_db(e, DUPLICATE_NAME))?;

    tracing::info!(tag_id = %tag.id, "Tag created");

    Ok((StatusCode::CREATED, Json(tag)))
}

/// Update a tag
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `404 Not Found`: No such tag
/// - `409 Conflict`: Name already taken
pub async fn update_tag(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateTagRequest>,
) -> ApiResult<Json<Tag>> {
    if let Some(color) = &req.color {
        check_color(color)?;
    }

    let tag = Tag::update(
        &state.db,
        id,
        UpdateTag {
            name: req.name,
            color: req.color,
        },
    )
    .await
    .map_err(|e| ApiError::from_db(e, DUPLICATE_NAME))?
    .ok_or_else(tag_not_found)?;

    Ok(Json(tag))
}

/// Delete a tag and its note associations
pub async fn delete_tag(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> ApiResult<StatusCode> {
    if !Tag::delete(&state.db, id).await? {
        return Err(tag_not_found());
    }

    tracing::info!(tag_id = %id, "Tag deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// List notes carrying a tag, newest first
///
/// # Errors
///
/// - `404 Not Found`: No such tag
pub async fn list_tag_notes(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> ApiResult<Json<Vec<Note>>> {
    Tag::find_by_id(&state.db, id)
        .await?
        .ok_or_else(tag_not_found)?;

    let notes = Note::list_by_tag(&state.db, id).await?;
    Ok(Json(notes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_color() {
        assert!(check_color("#CC3300").is_ok());
        assert!(check_color("#abc").is_ok());
        assert!(matches!(
            check_color("red"),
            Err(ApiError::ValidationError(_))
        ));
    }

    #[test]
    fn test_update_request_is_partial() {
        let req: UpdateTagRequest = serde_json::from_str(r##"{"color": "#00FF00"}"##).unwrap();
        assert!(req.name.is_none());
        assert_eq!(req.color.as_deref(), Some("#00FF00"));
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_create_request_rejects_long_name() {
        let req = CreateTagRequest {
            name: "x".repeat(51),
            color: None,
        };
        assert!(req.validate().is_err());
    }
}
