//! Movie row model and DTOs.

use cinelog_core::movies::{MovieInput, MoviePatch, MovieRecord};
use cinelog_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// Full row from the `movies` table.
#[derive(Debug, Clone, FromRow)]
pub struct Movie {
    pub id: DbId,
    pub user_id: DbId,
    pub title: String,
    pub genre: Option<String>,
    pub release_year: Option<i32>,
    pub rating: Option<f64>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting or fully replacing a movie.
#[derive(Debug)]
pub struct CreateMovie {
    pub title: String,
    pub genre: Option<String>,
    pub release_year: Option<i32>,
    pub rating: Option<f64>,
}

/// DTO for partially updating a movie.
///
/// Nullable columns use `Option<Option<T>>` so that `Some(None)` clears them.
#[derive(Debug)]
pub struct UpdateMovie {
    pub title: Option<String>,
    pub genre: Option<Option<String>>,
    pub release_year: Option<Option<i32>>,
    pub rating: Option<Option<f64>>,
}

impl From<Movie> for MovieRecord {
    fn from(row: Movie) -> Self {
        MovieRecord {
            id: row.id,
            user_id: row.user_id,
            title: row.title,
            genre: row.genre,
            release_year: row.release_year,
            rating: row.rating,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl From<&MovieInput> for CreateMovie {
    fn from(input: &MovieInput) -> Self {
        CreateMovie {
            title: input.title.clone(),
            genre: input.genre.clone(),
            release_year: input.release_year,
            rating: input.rating,
        }
    }
}

impl From<&MoviePatch> for UpdateMovie {
    fn from(patch: &MoviePatch) -> Self {
        UpdateMovie {
            title: patch.title.clone(),
            genre: patch.genre.clone(),
            release_year: patch.release_year,
            rating: patch.rating,
        }
    }
}
