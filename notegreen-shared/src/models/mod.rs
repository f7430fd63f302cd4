/// Database models for NoteGreen
///
/// Each model owns its SQL and exposes associated async functions taking the
/// pool (or, for join-table helpers, any executor).
///
/// # Models
///
/// - `folder`: Uniquely named note containers
/// - `tag`: Uniquely named, colored labels
/// - `note`: Notes and their partial updates
/// - `note_tag`: Note-tag associations
/// - `user`: User accounts
///
/// # Example
///
/// ```no_run
/// use notegreen_shared::db::pool::{create_pool, DatabaseConfig};
/// use notegreen_shared::models::tag::{Tag, CreateTag};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::in_memory()).await?;
///
/// let tag = Tag::create(
///     &pool,
///     CreateTag {
///         name: "ideas".to_string(),
///         color: "#33CC66".to_string(),
///     },
/// )
/// .await?;
/// # Ok(())
/// # }
/// ```

pub mod folder;
pub mod note;
pub mod note_tag;
pub mod tag;
pub mod user;
