/// User model and database operations
///
/// Accounts are independent of notes: notes carry no owner.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id BLOB PRIMARY KEY NOT NULL,
///     username TEXT NOT NULL UNIQUE,
///     password_hash TEXT NOT NULL,
///     created_at TEXT NOT NULL
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

/// User account
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user ID (UUID v4)
    pub id: Uuid,

    /// Login name, unique across all users
    pub username: String,

    /// Argon2id password hash, never sent to clients
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    pub created_at: DateTime<Utc>,
}

/// Input for creating a new user
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub username: String,

    /// Argon2id password hash (NOT plaintext password!)
    pub password_hash: String,
}

impl User {
    /// Creates a new user
    ///
    /// # Errors
    ///
    /// Returns a unique-violation database error if the username is taken
    pub async fn create(pool: &SqlitePool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, username, password_hash, created_at)
            VALUES (?, ?, ?, ?)
            RETURNING id, username, password_hash, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.username)
        .bind(data.password_hash)
        .bind(Utc::now())
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID
    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, created_at FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by username (case-sensitive)
    pub async fn find_by_username(
        pool: &SqlitePool,
        username: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, created_at FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }
}
