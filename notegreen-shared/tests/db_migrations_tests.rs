/// Integration tests for the embedded migrations

use notegreen_shared::db::migrations::{
    drop_database, ensure_database_exists, get_migration_status, run_migrations,
};
use notegreen_shared::db::pool::{close_pool, create_pool, DatabaseConfig, IN_MEMORY_URL};
use tempfile::TempDir;

async fn table_names(pool: &sqlx::SqlitePool) -> Vec<String> {
    sqlx::query_scalar(
        "SELECT name FROM sqlite_master
         WHERE type = 'table' AND name NOT LIKE 'sqlite_%' AND name != '_sqlx_migrations'
         ORDER BY name",
    )
    .fetch_all(pool)
    .await
    .expect("Failed to list tables")
}

#[tokio::test]
async fn test_status_before_migrations() {
    let pool = create_pool(DatabaseConfig::in_memory()).await.unwrap();

    let status = get_migration_status(&pool).await.unwrap();
    assert_eq!(status.applied_migrations, 0);
    assert_eq!(status.latest_version, None);
    assert!(!status.is_up_to_date);

    close_pool(pool).await;
}

#[tokio::test]
async fn test_run_migrations_creates_schema() {
    let pool = create_pool(DatabaseConfig::in_memory()).await.unwrap();

    run_migrations(&pool).await.expect("Migrations failed");

    assert_eq!(
        table_names(&pool).await,
        vec!["folders", "note_tags", "notes", "tags", "users"]
    );

    let status = get_migration_status(&pool).await.unwrap();
    assert!(status.applied_migrations > 0);
    assert!(status.latest_version.is_some());
    assert!(status.is_up_to_date);

    close_pool(pool).await;
}

#[tokio::test]
async fn test_migrations_are_idempotent() {
    let pool = create_pool(DatabaseConfig::in_memory()).await.unwrap();

    run_migrations(&pool).await.expect("First migration run failed");
    let first = get_migration_status(&pool).await.unwrap();

    run_migrations(&pool).await.expect("Second migration run failed");
    let second = get_migration_status(&pool).await.unwrap();

    assert_eq!(first.applied_migrations, second.applied_migrations);
    assert_eq!(first.latest_version, second.latest_version);

    close_pool(pool).await;
}

#[tokio::test]
async fn test_schema_declares_cascade_rules() {
    let pool = create_pool(DatabaseConfig::in_memory()).await.unwrap();
    run_migrations(&pool).await.unwrap();

    let note_fks: Vec<(String, String)> =
        sqlx::query_as("SELECT \"table\", on_delete FROM pragma_foreign_key_list('notes')")
            .fetch_all(&pool)
            .await
            .unwrap();
    assert_eq!(note_fks, vec![("folders".to_string(), "SET NULL".to_string())]);

    let mut join_fks: Vec<(String, String)> =
        sqlx::query_as("SELECT \"table\", on_delete FROM pragma_foreign_key_list('note_tags')")
            .fetch_all(&pool)
            .await
            .unwrap();
    join_fks.sort();
    assert_eq!(
        join_fks,
        vec![
            ("notes".to_string(), "CASCADE".to_string()),
            ("tags".to_string(), "CASCADE".to_string()),
        ]
    );

    close_pool(pool).await;
}

#[tokio::test]
async fn test_ensure_and_drop_file_database() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("lifecycle.db");
    let url = format!("sqlite://{}", path.display());

    ensure_database_exists(&url).await.expect("Failed to create database");
    assert!(path.exists());

    // Second call is a no-op
    ensure_database_exists(&url).await.expect("Second ensure failed");

    drop_database(&url).await.expect("Failed to drop database");
    assert!(!path.exists());

    // Dropping a missing database is fine too
    drop_database(&url).await.expect("Second drop failed");
}

#[tokio::test]
async fn test_ensure_database_accepts_in_memory_url() {
    ensure_database_exists(IN_MEMORY_URL)
        .await
        .expect("In-memory URL should be accepted");
}
