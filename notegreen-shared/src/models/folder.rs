/// Folder model and database operations
///
/// A folder is a uniquely named container. A note sits in at most one folder.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE folders (
///     id BLOB PRIMARY KEY NOT NULL,
///     name TEXT NOT NULL UNIQUE
/// );
/// ```
///
/// Deleting a folder never deletes its notes: `notes.folder_id` is declared
/// `ON DELETE SET NULL`, so they become unfiled.
///
/// # Example
///
/// ```no_run
/// use notegreen_shared::models::folder::{Folder, CreateFolder};
/// # use sqlx::SqlitePool;
///
/// # async fn example(pool: SqlitePool) -> Result<(), sqlx::Error> {
/// let folder = Folder::create(&pool, CreateFolder { name: "Work".to_string() }).await?;
/// Folder::rename(&pool, folder.id, "Projects").await?;
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

/// Folder model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Folder {
    /// Unique folder ID (UUID v4)
    pub id: Uuid,

    /// Folder name, unique across all folders
    pub name: String,
}

/// Input for creating a new folder
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFolder {
    pub name: String,
}

impl Folder {
    /// Creates a new folder
    ///
    /// # Errors
    ///
    /// Returns a unique-violation database error if the name is taken
    pub async fn create(pool: &SqlitePool, data: CreateFolder) -> Result<Self, sqlx::Error> {
        let folder = sqlx::query_as::<_, Folder>(
            r#"
            INSERT INTO folders (id, name)
            VALUES (?, ?)
            RETURNING id, name
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.name)
        .fetch_one(pool)
        .await?;

        Ok(folder)
    }

    /// Finds a folder by ID
    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let folder = sqlx::query_as::<_, Folder>("SELECT id, name FROM folders WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(folder)
    }

    /// Lists all folders ordered by name
    pub async fn list(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        let folders = sqlx::query_as::<_, Folder>("SELECT id, name FROM folders ORDER BY name")
            .fetch_all(pool)
            .await?;

        Ok(folders)
    }

    /// Renames a folder
    ///
    /// # Returns
    ///
    /// The updated folder, or None if it doesn't exist
    ///
    /// # Errors
    ///
    /// Returns a unique-violation database error if the new name is taken
    pub async fn rename(
        pool: &SqlitePool,
        id: Uuid,
        name: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let folder = sqlx::query_as::<_, Folder>(
            r#"
            UPDATE folders
            SET name = ?
            WHERE id = ?
            RETURNING id, name
            "#,
        )
        .bind(name)
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(folder)
    }

    /// Deletes a folder; its notes become unfiled
    ///
    /// # Returns
    ///
    /// True if the folder was deleted, false if it didn't exist
    pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM folders WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
