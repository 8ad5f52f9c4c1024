//! Repository for the `users` table.

use cinelog_core::types::DbId;
use cinelog_core::watchlist::Watchlist;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::user::{CreateUser, User, UserWatchlist};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, email, password_hash, watchlist, version, created_at, updated_at";

/// Provides persistence operations for users and their watchlists.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user with an empty watchlist, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (name, email, password_hash)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.password_hash)
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by email (case-sensitive).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Load only the watchlist and its version.
    pub async fn find_watchlist(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<UserWatchlist>, sqlx::Error> {
        sqlx::query_as::<_, UserWatchlist>("SELECT watchlist, version FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Replace the watchlist if `version` still equals `expected_version`.
    ///
    /// Returns the new version, or `None` when no row matched (the user is
    /// gone or another write got there first; see [`UserRepo::exists`]).
    pub async fn save_watchlist(
        pool: &PgPool,
        id: DbId,
        expected_version: i64,
        watchlist: &Watchlist,
    ) -> Result<Option<i64>, sqlx::Error> {
        let row: Option<(i64,)> = sqlx::query_as(
            "UPDATE users SET
                watchlist = $3,
                version = version + 1
             WHERE id = $1 AND version = $2
             RETURNING version",
        )
        .bind(id)
        .bind(expected_version)
        .bind(Json(watchlist))
        .fetch_optional(pool)
        .await?;
        Ok(row.map(|(version,)| version))
    }

    /// Whether a user row with this ID exists.
    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await?;
        Ok(exists)
    }
}
