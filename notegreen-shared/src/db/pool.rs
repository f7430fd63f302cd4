/// Database connection pool management
///
/// This module builds the SQLite connection pool used by the API server.
/// Foreign keys are switched on for every connection, since the note/folder/tag
/// cascade rules live in the schema.
///
/// # Example
///
/// ```no_run
/// use notegreen_shared::db::pool::{create_pool, DatabaseConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = DatabaseConfig {
///         url: "sqlite://notegreen.db".to_string(),
///         ..Default::default()
///     };
///
///     let pool = create_pool(config).await?;
///
///     let row: (i64,) = sqlx::query_as("SELECT ?")
///         .bind(42i64)
///         .fetch_one(&pool)
///         .await?;
///
///     Ok(())
/// }
/// ```

use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info, warn};

/// URL of a private in-memory database
pub const IN_MEMORY_URL: &str = "sqlite::memory:";

/// Configuration for the database connection pool
///
/// All timeouts are specified in seconds for ease of configuration from environment variables.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// SQLite connection URL (e.g., "sqlite://notegreen.db" or "sqlite::memory:")
    pub url: String,

    /// Maximum number of connections in the pool
    ///
    /// Forced to 1 for in-memory databases.
    pub max_connections: u32,

    /// Minimum number of idle connections to maintain
    pub min_connections: u32,

    /// Timeout for acquiring a connection from the pool (seconds)
    pub connect_timeout_seconds: u64,

    /// How long SQLite waits on a locked database before failing a statement (seconds)
    pub busy_timeout_seconds: u64,

    /// How long a connection can remain idle before being closed (seconds)
    ///
    /// Ignored for in-memory databases.
    pub idle_timeout_seconds: Option<u64>,

    /// Maximum lifetime of a connection before forced recycling (seconds)
    ///
    /// Ignored for in-memory databases.
    pub max_lifetime_seconds: Option<u64>,

    /// Whether to test connections before returning them from the pool
    pub test_before_acquire: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout_seconds: 30,
            busy_timeout_seconds: 5,
            idle_timeout_seconds: Some(600),
            max_lifetime_seconds: Some(1800),
            test_before_acquire: true,
        }
    }
}

impl DatabaseConfig {
    /// Configuration for a fresh, private in-memory database
    pub fn in_memory() -> Self {
        Self {
            url: IN_MEMORY_URL.to_string(),
            ..Default::default()
        }
    }

    /// Whether the URL points at an in-memory database
    pub fn is_in_memory(&self) -> bool {
        is_in_memory_url(&self.url)
    }
}

/// Returns true for `sqlite::memory:` style URLs and `mode=memory` file URLs
pub fn is_in_memory_url(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

/// Creates and initializes a SQLite connection pool
///
/// This function:
/// 1. Parses the URL and creates the database file if it is missing
/// 2. Enables foreign keys (and WAL journaling for file databases)
/// 3. Performs a health check to verify the database is usable
///
/// An in-memory database only lives as long as its connections, so for those
/// the pool is pinned to a single connection that is never recycled.
///
/// # Errors
///
/// Returns an error if:
/// - The database URL is invalid
/// - The database file cannot be opened or created
/// - Health check fails
pub async fn create_pool(config: DatabaseConfig) -> Result<SqlitePool, sqlx::Error> {
    let in_memory = config.is_in_memory();

    info!(
        max_connections = config.max_connections,
        min_connections = config.min_connections,
        in_memory,
        "Creating database connection pool"
    );

    let mut connect_options = SqliteConnectOptions::from_str(&config.url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(config.busy_timeout_seconds));

    if !in_memory {
        connect_options = connect_options
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);
    }

    let mut pool_options = SqlitePoolOptions::new()
        .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
        .test_before_acquire(config.test_before_acquire);

    if in_memory {
        pool_options = pool_options
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None);
    } else {
        pool_options = pool_options
            .max_connections(config.max_connections)
            .min_connections(config.min_connections);

        if let Some(idle_timeout) = config.idle_timeout_seconds {
            pool_options = pool_options.idle_timeout(Duration::from_secs(idle_timeout));
            debug!(idle_timeout_seconds = idle_timeout, "Set idle timeout");
        }

        if let Some(max_lifetime) = config.max_lifetime_seconds {
            pool_options = pool_options.max_lifetime(Duration::from_secs(max_lifetime));
            debug!(max_lifetime_seconds = max_lifetime, "Set max lifetime");
        }
    }

    let pool = pool_options.connect_with(connect_options).await?;

    health_check(&pool).await?;

    info!("Database connection pool created successfully");
    Ok(pool)
}

/// Performs a health check on the database connection
///
/// Executes a trivial query and confirms foreign key enforcement is active.
///
/// # Errors
///
/// Returns an error if the query fails or foreign keys are switched off
pub async fn health_check(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    debug!("Performing database health check");

    let result: (i32,) = sqlx::query_as("SELECT 1").fetch_one(pool).await?;
    if result.0 != 1 {
        warn!("Database health check returned unexpected value: {}", result.0);
        return Err(sqlx::Error::Protocol(
            "Health check returned unexpected value".into(),
        ));
    }

    let (foreign_keys,): (i32,) = sqlx::query_as("PRAGMA foreign_keys")
        .fetch_one(pool)
        .await?;
    if foreign_keys != 1 {
        warn!("Foreign key enforcement is disabled");
        return Err(sqlx::Error::Protocol(
            "Foreign key enforcement is disabled".into(),
        ));
    }

    debug!("Database health check passed");
    Ok(())
}

/// Current pool statistics
#[derive(Debug, Clone)]
pub struct PoolStats {
    /// Number of connections currently in use
    pub active_connections: usize,

    /// Number of idle connections available
    pub idle_connections: usize,

    /// Total connections in the pool
    pub total_connections: usize,
}

pub fn get_pool_stats(pool: &SqlitePool) -> PoolStats {
    let size = pool.size();
    let idle = pool.num_idle() as u32;

    PoolStats {
        active_connections: size.saturating_sub(idle) as usize,
        idle_connections: idle as usize,
        total_connections: size as usize,
    }
}

/// Gracefully closes the connection pool
///
/// Called during shutdown so WAL checkpoints are flushed before exit.
pub async fn close_pool(pool: SqlitePool) {
    info!("Closing database connection pool");
    pool.close().await;
    info!("Database connection pool closed");
}
