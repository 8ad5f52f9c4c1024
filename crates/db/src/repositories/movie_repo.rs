//! Repository for the `movies` table. Every query is scoped by `user_id`.

use cinelog_core::types::DbId;
use sqlx::PgPool;

use crate::models::movie::{CreateMovie, Movie, UpdateMovie};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, user_id, title, genre, release_year, rating, created_at, updated_at";

/// Provides CRUD operations for a user's movies.
pub struct MovieRepo;

impl MovieRepo {
    /// Insert a movie owned by `user_id`, returning the created row.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateMovie,
    ) -> Result<Movie, sqlx::Error> {
        let query = format!(
            "INSERT INTO movies (user_id, title, genre, release_year, rating)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Movie>(&query)
            .bind(user_id)
            .bind(&input.title)
            .bind(&input.genre)
            .bind(input.release_year)
            .bind(input.rating)
            .fetch_one(pool)
            .await
    }

    /// List a user's movies in creation order.
    pub async fn list_by_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Movie>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM movies WHERE user_id = $1 ORDER BY id");
        sqlx::query_as::<_, Movie>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Find a movie by ID if `user_id` owns it.
    pub async fn find_by_id_and_user(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<Movie>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM movies WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, Movie>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Overwrite every editable column.
    pub async fn replace(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
        input: &CreateMovie,
    ) -> Result<Option<Movie>, sqlx::Error> {
        let query = format!(
            "UPDATE movies SET
                title = $3,
                genre = $4,
                release_year = $5,
                rating = $6
             WHERE id = $1 AND user_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Movie>(&query)
            .bind(id)
            .bind(user_id)
            .bind(&input.title)
            .bind(&input.genre)
            .bind(input.release_year)
            .bind(input.rating)
            .fetch_optional(pool)
            .await
    }

    /// Partially update a movie.
    ///
    /// `title` uses `COALESCE`; the nullable columns take a "provided" flag so
    /// an explicit `None` can clear them.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
        input: &UpdateMovie,
    ) -> Result<Option<Movie>, sqlx::Error> {
        let query = format!(
            "UPDATE movies SET
                title        = COALESCE($3, title),
                genre        = CASE WHEN $4 THEN $5 ELSE genre END,
                release_year = CASE WHEN $6 THEN $7 ELSE release_year END,
                rating       = CASE WHEN $8 THEN $9 ELSE rating END
             WHERE id = $1 AND user_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Movie>(&query)
            .bind(id)
            .bind(user_id)
            .bind(&input.title)
            .bind(input.genre.is_some())
            .bind(input.genre.as_ref().and_then(|g| g.as_deref()))
            .bind(input.release_year.is_some())
            .bind(input.release_year.flatten())
            .bind(input.rating.is_some())
            .bind(input.rating.flatten())
            .fetch_optional(pool)
            .await
    }

    /// Delete a movie if `user_id` owns it. Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId, user_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM movies WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
