/// Tag model and database operations
///
/// Tags are uniquely named, colored labels attached to notes through the
/// `note_tags` join table.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tags (
///     id BLOB PRIMARY KEY NOT NULL,
///     name TEXT NOT NULL UNIQUE,
///     color TEXT NOT NULL
/// );
/// ```
///
/// Deleting a tag cascades to its `note_tags` rows; the notes themselves stay.

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

/// Default color offered to clients that don't pick one
pub const DEFAULT_TAG_COLOR: &str = "#CC3300";

/// Tag model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Tag {
    /// Unique tag ID (UUID v4)
    pub id: Uuid,

    /// Tag name, unique across all tags
    pub name: String,

    /// CSS hex color, e.g. `#3399FF`
    pub color: String,
}

/// Input for creating a new tag
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTag {
    pub name: String,
    pub color: String,
}

/// Input for updating a tag; None leaves the field unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTag {
    pub name: Option<String>,
    pub color: Option<String>,
}

/// Checks for a `#RGB` or `#RRGGBB` color
pub fn is_hex_color(value: &str) -> bool {
    match value.strip_prefix('#') {
        Some(hex) => (hex.len() == 3 || hex.len() == 6) && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}

impl Tag {
    /// Creates a new tag
    ///
    /// # Errors
    ///
    /// Returns a unique-violation database error if the name is taken
    pub async fn create(pool: &SqlitePool, data: CreateTag) -> Result<Self, sqlx::Error> {
        let tag = sqlx::query_as::<_, Tag>(
            r#"
            INSERT INTO tags (id, name, color)
            VALUES (?, ?, ?)
            RETURNING id, name, color
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.name)
        .bind(data.color)
        .fetch_one(pool)
        .await?;

        Ok(tag)
    }

    /// Finds a tag by ID
    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let tag = sqlx::query_as::<_, Tag>("SELECT id, name, color FROM tags WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(tag)
    }

    /// Lists all tags ordered by name
    pub async fn list(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        let tags = sqlx::query_as::<_, Tag>("SELECT id, name, color FROM tags ORDER BY name")
            .fetch_all(pool)
            .await?;

        Ok(tags)
    }

    /// Updates a tag's name and/or color
    ///
    /// # Returns
    ///
    /// The updated tag, or None if it doesn't exist
    ///
    /// # Errors
    ///
    /// Returns a unique-violation database error if the new name is taken
    pub async fn update(
        pool: &SqlitePool,
        id: Uuid,
        data: UpdateTag,
    ) -> Result<Option<Self>, sqlx::Error> {
        let tag = sqlx::query_as::<_, Tag>(
            r#"
            UPDATE tags
            SET name = COALESCE(?, name),
                color = COALESCE(?, color)
            WHERE id = ?
            RETURNING id, name, color
            "#,
        )
        .bind(data.name)
        .bind(data.color)
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(tag)
    }

    /// Deletes a tag and its note associations
    ///
    /// # Returns
    ///
    /// True if the tag was deleted, false if it didn't exist
    pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tags WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_color_accepts_short_and_long_forms() {
        assert!(is_hex_color("#fff"));
        assert!(is_hex_color("#3399FF"));
        assert!(is_hex_color(DEFAULT_TAG_COLOR));
    }

    #[test]
    fn test_hex_color_rejects_other_values() {
        assert!(!is_hex_color("3399FF"));
        assert!(!is_hex_color("#33"));
        assert!(!is_hex_color("#3399FG"));
        assert!(!is_hex_color("#3399FF00"));
        assert!(!is_hex_color("red"));
        assert!(!is_hex_color(""));
    }

    #[test]
    fn test_update_tag_default() {
        let update = UpdateTag::default();
        assert!(update.name.is_none());
        assert!(update.color.is_none());
    }
}
