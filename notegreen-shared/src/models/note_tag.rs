/// Note-tag join table operations
///
/// # Schema
///
/// ```sql
/// CREATE TABLE note_tags (
///     note_id BLOB NOT NULL REFERENCES notes(id) ON DELETE CASCADE,
///     tag_id BLOB NOT NULL REFERENCES tags(id) ON DELETE CASCADE,
///     PRIMARY KEY (note_id, tag_id)
/// );
/// ```
///
/// Functions take any SQLite executor so they can run on the pool or inside a
/// note transaction.

use crate::models::{note::Note, tag::Tag};
use serde::{Deserialize, Serialize};
use sqlx::{Executor, Sqlite, SqliteConnection};
use uuid::Uuid;

/// A single note-tag association
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct NoteTag {
    pub note_id: Uuid,
    pub tag_id: Uuid,
}

impl NoteTag {
    /// Raw associations of a note
    pub async fn for_note<'e, E>(executor: E, note_id: Uuid) -> Result<Vec<Self>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, NoteTag>("SELECT note_id, tag_id FROM note_tags WHERE note_id = ?")
            .bind(note_id)
            .fetch_all(executor)
            .await
    }

    /// Tags attached to a note, ordered by name
    pub async fn tags_for_note<'e, E>(executor: E, note_id: Uuid) -> Result<Vec<Tag>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, Tag>(
            r#"
            SELECT t.id, t.name, t.color
            FROM note_tags nt
            INNER JOIN tags t ON t.id = nt.tag_id
            WHERE nt.note_id = ?
            ORDER BY t.name
            "#,
        )
        .bind(note_id)
        .fetch_all(executor)
        .await
    }

    /// Notes carrying a tag, most recently updated first
    pub async fn notes_for_tag<'e, E>(executor: E, tag_id: Uuid) -> Result<Vec<Note>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, Note>(
            r#"
            SELECT n.id, n.title, n.content, n.folder_id, n.created_at, n.updated_at
            FROM note_tags nt
            INNER JOIN notes n ON n.id = nt.note_id
            WHERE nt.tag_id = ?
            ORDER BY n.updated_at DESC
            "#,
        )
        .bind(tag_id)
        .fetch_all(executor)
        .await
    }

    /// Attaches a tag to a note; attaching twice is a no-op
    ///
    /// # Errors
    ///
    /// Returns a foreign-key database error if the note or tag doesn't exist
    pub async fn add<'e, E>(executor: E, note_id: Uuid, tag_id: Uuid) -> Result<(), sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query("INSERT OR IGNORE INTO note_tags (note_id, tag_id) VALUES (?, ?)")
            .bind(note_id)
            .bind(tag_id)
            .execute(executor)
            .await?;

        Ok(())
    }

    /// Detaches a tag from a note
    ///
    /// # Returns
    ///
    /// True if an association was removed
    pub async fn remove<'e, E>(executor: E, note_id: Uuid, tag_id: Uuid) -> Result<bool, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM note_tags WHERE note_id = ? AND tag_id = ?")
            .bind(note_id)
            .bind(tag_id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Makes a note's tag set exactly `tag_ids`
    ///
    /// Associations missing from `tag_ids` are removed and new ones added;
    /// duplicates in the input are ignored. Callers wrap this in a transaction.
    pub async fn replace_for_note(
        conn: &mut SqliteConnection,
        note_id: Uuid,
        tag_ids: &[Uuid],
    ) -> Result<(), sqlx::Error> {
        let existing: Vec<Uuid> = Self::for_note(&mut *conn, note_id)
            .await?
            .into_iter()
            .map(|link| link.tag_id)
            .collect();

        for tag_id in existing.iter().filter(|id| !tag_ids.contains(id)) {
            Self::remove(&mut *conn, note_id, *tag_id).await?;
        }

        for tag_id in tag_ids.iter().filter(|id| !existing.contains(id)) {
            Self::add(&mut *conn, note_id, *tag_id).await?;
        }

        Ok(())
    }
}
