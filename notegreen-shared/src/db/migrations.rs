/// Database migration runner
///
/// Migrations live in `notegreen-shared/migrations/` and are embedded into the
/// binary at compile time with `sqlx::migrate!`, so a deployed server needs
/// nothing but its database URL.
///
/// # Example
///
/// ```no_run
/// use notegreen_shared::db::pool::{create_pool, DatabaseConfig};
/// use notegreen_shared::db::migrations::{run_migrations, get_migration_status};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let pool = create_pool(DatabaseConfig::in_memory()).await?;
///
///     run_migrations(&pool).await?;
///
///     let status = get_migration_status(&pool).await?;
///     println!("Applied {} migrations", status.applied_migrations);
///
///     Ok(())
/// }
/// ```

use sqlx::{migrate::MigrateDatabase, migrate::Migrator, Sqlite, SqlitePool};
use tracing::{debug, info, warn};

/// Embedded schema migrations
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Migration status information
#[derive(Debug, Clone)]
pub struct MigrationStatus {
    /// Number of migrations that have been applied
    pub applied_migrations: usize,

    /// Latest applied migration version (timestamp)
    pub latest_version: Option<i64>,

    /// Whether every embedded migration has been applied
    pub is_up_to_date: bool,
}

/// Runs all pending database migrations
///
/// Each migration runs in its own transaction. Already applied migrations are
/// skipped, so this is safe to call on every startup.
///
/// # Errors
///
/// Returns an error if a migration fails to execute or an applied migration
/// no longer matches its embedded checksum.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("Starting database migrations");

    match MIGRATOR.run(pool).await {
        Ok(()) => {
            info!("All database migrations completed successfully");
            Ok(())
        }
        Err(e) => {
            warn!("Migration failed: {}", e);
            Err(e)
        }
    }
}

/// Gets the current migration status
///
/// Compares the `_sqlx_migrations` bookkeeping table against the embedded
/// migration set.
///
/// # Errors
///
/// Returns an error if the bookkeeping table cannot be queried
pub async fn get_migration_status(pool: &SqlitePool) -> Result<MigrationStatus, sqlx::Error> {
    debug!("Checking migration status");

    let table_exists: bool = sqlx::query_scalar(
        "SELECT EXISTS (
            SELECT 1 FROM sqlite_master
            WHERE type = 'table' AND name = '_sqlx_migrations'
        )",
    )
    .fetch_one(pool)
    .await?;

    if !table_exists {
        debug!("Migrations table does not exist yet");
        return Ok(MigrationStatus {
            applied_migrations: 0,
            latest_version: None,
            is_up_to_date: MIGRATOR.iter().next().is_none(),
        });
    }

    let (count, latest_version): (i64, Option<i64>) = sqlx::query_as(
        "SELECT COUNT(*), MAX(version)
         FROM _sqlx_migrations
         WHERE success = 1",
    )
    .fetch_one(pool)
    .await?;

    let expected_latest = MIGRATOR.iter().map(|m| m.version).max();
    let expected_count = MIGRATOR.iter().count();

    debug!(
        applied_migrations = count,
        latest_version = ?latest_version,
        expected_count,
        "Migration status retrieved"
    );

    Ok(MigrationStatus {
        applied_migrations: count as usize,
        latest_version,
        is_up_to_date: count as usize >= expected_count && latest_version == expected_latest,
    })
}

/// Creates the database file if it doesn't exist
///
/// In-memory URLs are accepted and left alone.
///
/// # Errors
///
/// Returns an error if the URL is invalid or the file cannot be created
pub async fn ensure_database_exists(database_url: &str) -> Result<(), sqlx::Error> {
    info!("Checking if database exists");

    if !Sqlite::database_exists(database_url).await? {
        info!("Database does not exist, creating it");
        Sqlite::create_database(database_url).await?;
        info!("Database created successfully");
    } else {
        debug!("Database already exists");
    }

    Ok(())
}

/// Deletes the database file (USE WITH CAUTION!)
///
/// Only meant for development and test environments.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be removed
pub async fn drop_database(database_url: &str) -> Result<(), sqlx::Error> {
    warn!("Dropping database: {}", database_url);

    if Sqlite::database_exists(database_url).await? {
        Sqlite::drop_database(database_url).await?;
        info!("Database dropped successfully");
    } else {
        debug!("Database does not exist, nothing to drop");
    }

    Ok(())
}
