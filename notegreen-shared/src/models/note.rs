/// Note model and database operations
///
/// Notes hold a title and an opaque rich-text body (HTML from the client
/// editor). A note is in at most one folder and carries any number of tags.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE notes (
///     id BLOB PRIMARY KEY NOT NULL,
///     title TEXT NOT NULL,
///     content TEXT NOT NULL DEFAULT '',
///     folder_id BLOB REFERENCES folders(id) ON DELETE SET NULL,
///     created_at TEXT NOT NULL,
///     updated_at TEXT NOT NULL
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use notegreen_shared::models::note::{Note, CreateNote, UpdateNote};
/// # use sqlx::SqlitePool;
///
/// # async fn example(pool: SqlitePool) -> Result<(), sqlx::Error> {
/// let created = Note::create(
///     &pool,
///     CreateNote {
///         title: "Groceries".to_string(),
///         content: "<p>milk, eggs</p>".to_string(),
///         folder_id: None,
///         tag_ids: vec![],
///     },
/// )
/// .await?;
///
/// let update = UpdateNote {
///     title: Some("Weekly groceries".to_string()),
///     ..Default::default()
/// };
/// Note::update(&pool, created.note.id, update).await?;
/// # Ok(())
/// # }
/// ```

use crate::models::{note_tag::NoteTag, tag::Tag};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

const NOTE_COLUMNS: &str = "id, title, content, folder_id, created_at, updated_at";

/// Note model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Unique note ID (UUID v4)
    pub id: Uuid,

    pub title: String,

    /// Rich-text body, stored verbatim
    pub content: String,

    /// Folder the note is filed in, if any
    pub folder_id: Option<Uuid>,

    pub created_at: DateTime<Utc>,

    /// Advances on every update
    pub updated_at: DateTime<Utc>,
}

/// A note together with its tags
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteWithTags {
    #[serde(flatten)]
    pub note: Note,

    pub tags: Vec<Tag>,
}

/// Input for creating a new note
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateNote {
    pub title: String,
    pub content: String,
    pub folder_id: Option<Uuid>,

    /// Tags to attach in the same transaction
    pub tag_ids: Vec<Uuid>,
}

/// Input for updating a note
///
/// None leaves a field unchanged. `folder_id: Some(None)` moves the note out
/// of its folder. `tag_ids: Some(..)` replaces the whole tag set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateNote {
    pub title: Option<String>,
    pub content: Option<String>,
    pub folder_id: Option<Option<Uuid>>,
    pub tag_ids: Option<Vec<Uuid>>,
}

/// Timestamp for an update: now, or just past the previous value when the
/// clock hasn't moved (or moved backwards)
pub fn next_updated_at(previous: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    if now > previous {
        now
    } else {
        previous + Duration::milliseconds(1)
    }
}

/// Builds a LIKE pattern matching `query` as a literal substring
fn like_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

impl Note {
    /// Creates a note and attaches its initial tags atomically
    ///
    /// # Errors
    ///
    /// Returns a foreign-key database error if `folder_id` or any of
    /// `tag_ids` doesn't exist; nothing is written in that case.
    pub async fn create(pool: &SqlitePool, data: CreateNote) -> Result<NoteWithTags, sqlx::Error> {
        let now = Utc::now();
        let mut tx = pool.begin().await?;

        let note = sqlx::query_as::<_, Note>(&format!(
            r#"
            INSERT INTO notes (id, title, content, folder_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING {NOTE_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(data.title)
        .bind(data.content)
        .bind(data.folder_id)
        .bind(now)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        for tag_id in &data.tag_ids {
            NoteTag::add(&mut *tx, note.id, *tag_id).await?;
        }

        let tags = NoteTag::tags_for_note(&mut *tx, note.id).await?;
        tx.commit().await?;

        tracing::debug!(note_id = %note.id, tags = tags.len(), "Created note");
        Ok(NoteWithTags { note, tags })
    }

    /// Finds a note by ID
    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let note = sqlx::query_as::<_, Note>(&format!(
            "SELECT {NOTE_COLUMNS} FROM notes WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(note)
    }

    /// Finds a note by ID together with its tags
    pub async fn find_with_tags(
        pool: &SqlitePool,
        id: Uuid,
    ) -> Result<Option<NoteWithTags>, sqlx::Error> {
        let Some(note) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };

        let tags = NoteTag::tags_for_note(pool, id).await?;
        Ok(Some(NoteWithTags { note, tags }))
    }

    /// Lists notes, most recently updated first
    ///
    /// A non-blank `search` keeps only notes whose title or content contains
    /// it, ignoring ASCII case.
    pub async fn list(pool: &SqlitePool, search: Option<&str>) -> Result<Vec<Self>, sqlx::Error> {
        let search = search.map(str::trim).filter(|q| !q.is_empty());

        let notes = match search {
            Some(query) => {
                let pattern = like_pattern(query);
                sqlx::query_as::<_, Note>(&format!(
                    r#"
                    SELECT {NOTE_COLUMNS}
                    FROM notes
                    WHERE title LIKE ? ESCAPE '\' OR content LIKE ? ESCAPE '\'
                    ORDER BY updated_at DESC
                    "#
                ))
                .bind(&pattern)
                .bind(&pattern)
                .fetch_all(pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Note>(&format!(
                    "SELECT {NOTE_COLUMNS} FROM notes ORDER BY updated_at DESC"
                ))
                .fetch_all(pool)
                .await?
            }
        };

        Ok(notes)
    }

    /// Lists notes in a folder, or unfiled notes when `folder_id` is None
    pub async fn list_by_folder(
        pool: &SqlitePool,
        folder_id: Option<Uuid>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let notes = match folder_id {
            Some(folder_id) => {
                sqlx::query_as::<_, Note>(&format!(
                    "SELECT {NOTE_COLUMNS} FROM notes WHERE folder_id = ? ORDER BY updated_at DESC"
                ))
                .bind(folder_id)
                .fetch_all(pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Note>(&format!(
                    "SELECT {NOTE_COLUMNS} FROM notes WHERE folder_id IS NULL ORDER BY updated_at DESC"
                ))
                .fetch_all(pool)
                .await?
            }
        };

        Ok(notes)
    }

    /// Lists notes carrying a tag, most recently updated first
    pub async fn list_by_tag(pool: &SqlitePool, tag_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        NoteTag::notes_for_tag(pool, tag_id).await
    }

    /// Applies a partial update and advances `updated_at`
    ///
    /// Field changes, the tag sync and the timestamp bump commit together.
    ///
    /// # Returns
    ///
    /// The updated note with its tags, or None if it doesn't exist
    ///
    /// # Errors
    ///
    /// Returns a foreign-key database error if the new folder or a tag
    /// doesn't exist; the note is left untouched in that case.
    pub async fn update(
        pool: &SqlitePool,
        id: Uuid,
        data: UpdateNote,
    ) -> Result<Option<NoteWithTags>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        // Write before reading anything: a deferred transaction that reads
        // first can't wait out a concurrent writer when it upgrades.
        let previous_updated_at: Option<DateTime<Utc>> = sqlx::query_scalar(
            r#"
            UPDATE notes
            SET title = COALESCE(?, title),
                content = COALESCE(?, content),
                folder_id = CASE WHEN ? THEN ? ELSE folder_id END
            WHERE id = ?
            RETURNING updated_at
            "#,
        )
        .bind(data.title)
        .bind(data.content)
        .bind(data.folder_id.is_some())
        .bind(data.folder_id.flatten())
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(previous_updated_at) = previous_updated_at else {
            return Ok(None);
        };

        let note = sqlx::query_as::<_, Note>(&format!(
            "UPDATE notes SET updated_at = ? WHERE id = ? RETURNING {NOTE_COLUMNS}"
        ))
        .bind(next_updated_at(previous_updated_at, Utc::now()))
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        if let Some(tag_ids) = data.tag_ids {
            NoteTag::replace_for_note(&mut tx, id, &tag_ids).await?;
        }

        let tags = NoteTag::tags_for_note(&mut *tx, id).await?;
        tx.commit().await?;

        tracing::debug!(note_id = %id, "Updated note");
        Ok(Some(NoteWithTags { note, tags }))
    }

    /// Deletes a note and its tag associations
    ///
    /// # Returns
    ///
    /// True if the note was deleted, false if it didn't exist
    pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM notes WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
