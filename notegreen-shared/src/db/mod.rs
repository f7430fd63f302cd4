/// Database layer for NoteGreen
///
/// # Modules
///
/// - `pool`: SQLite connection pool with health checks
/// - `migrations`: Embedded schema migrations
/// - Models are in the `models` module at crate root level
///
/// # Example
///
/// ```no_run
/// use notegreen_shared::db::{migrations::run_migrations, pool::{create_pool, DatabaseConfig}};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let pool = create_pool(DatabaseConfig {
///         url: std::env::var("DATABASE_URL")?,
///         ..Default::default()
///     })
///     .await?;
///     run_migrations(&pool).await?;
///     Ok(())
/// }
/// ```

pub mod migrations;
pub mod pool;
