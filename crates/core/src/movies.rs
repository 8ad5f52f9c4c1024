//! Personal movie catalog: free-form titles a user records by hand.
//!
//! Unlike watchlist entries, catalog movies are rows of their own with a
//! server-assigned ID. Every operation is scoped to the owning user; a movie
//! that belongs to someone else is reported exactly like one that does not
//! exist.

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};
use crate::watchlist::{MAX_RATING, MIN_RATING};

/// Entity name used in movie not-found errors.
pub const ENTITY_MOVIE: &str = "Movie";

/// Longest accepted title, in characters.
pub const MAX_TITLE_LENGTH: usize = 200;

// ---------------------------------------------------------------------------
// Records and inputs
// ---------------------------------------------------------------------------

/// A stored catalog movie.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieRecord {
    pub id: DbId,
    pub user_id: DbId,
    pub title: String,
    pub genre: Option<String>,
    pub release_year: Option<i32>,
    pub rating: Option<f64>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Body of `POST /movies` and `PUT /movies/{id}`.
///
/// A PUT replaces every field, so omitted optional fields are cleared.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieInput {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub release_year: Option<i32>,
    #[serde(default)]
    pub rating: Option<f64>,
}

/// Body of `PATCH /movies/{id}`.
///
/// Outer `None` leaves a field untouched. For the nullable fields,
/// `Some(None)` (an explicit JSON `null`) clears the stored value.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoviePatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub genre: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub release_year: Option<Option<i32>>,
    #[serde(default, deserialize_with = "present")]
    pub rating: Option<Option<f64>>,
}

/// Confirmation returned by a successful delete.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovieDeleted {
    pub message: &'static str,
}

/// Marks a field as supplied even when its value is `null`.
fn present<'de, D, T>(d: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(d).map(Some)
}

fn check_title(title: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::Validation("title is required".into()));
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(CoreError::Validation(format!(
            "title must be at most {MAX_TITLE_LENGTH} characters"
        )));
    }
    Ok(())
}

fn check_rating(rating: Option<f64>) -> Result<(), CoreError> {
    match rating {
        Some(v) if !v.is_finite() || !(MIN_RATING..=MAX_RATING).contains(&v) => Err(
            CoreError::Validation(format!("rating must be between {MIN_RATING} and {MAX_RATING}")),
        ),
        _ => Ok(()),
    }
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl MovieInput {
    /// Validate and normalize: titles are trimmed, blank genres become `None`.
    pub fn normalized(self) -> Result<Self, CoreError> {
        check_title(&self.title)?;
        check_rating(self.rating)?;
        Ok(Self {
            title: self.title.trim().to_string(),
            genre: trimmed(self.genre),
            release_year: self.release_year,
            rating: self.rating,
        })
    }
}

impl MoviePatch {
    /// Validate and normalize the supplied fields.
    pub fn normalized(self) -> Result<Self, CoreError> {
        if let Some(title) = &self.title {
            check_title(title)?;
        }
        if let Some(rating) = self.rating {
            check_rating(rating)?;
        }
        Ok(Self {
            title: self.title.map(|t| t.trim().to_string()),
            genre: self.genre.map(trimmed),
            release_year: self.release_year,
            rating: self.rating,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.genre.is_none()
            && self.release_year.is_none()
            && self.rating.is_none()
    }
}

/// Parse a movie ID taken from a URL path segment.
pub fn parse_movie_id(raw: &str) -> Result<DbId, CoreError> {
    raw.trim()
        .parse()
        .map_err(|_| CoreError::Validation("movie id must be an integer".into()))
}

// ---------------------------------------------------------------------------
// Store seam
// ---------------------------------------------------------------------------

/// Persistence for catalog movies. Every method is scoped to `user_id`.
#[async_trait]
pub trait MovieStore: Send + Sync {
    /// Insert a movie owned by `user_id`. Stores that enforce the owner
    /// reference fail with [`CoreError::NotFound`] for an unknown user.
    async fn create_movie(&self, user_id: DbId, input: &MovieInput)
        -> Result<MovieRecord, CoreError>;

    /// The user's movies, oldest first.
    async fn list_movies(&self, user_id: DbId) -> Result<Vec<MovieRecord>, CoreError>;

    async fn find_movie(&self, user_id: DbId, id: DbId) -> Result<Option<MovieRecord>, CoreError>;

    /// Overwrite every field. `None` if the movie is missing or not owned.
    async fn replace_movie(
        &self,
        user_id: DbId,
        id: DbId,
        input: &MovieInput,
    ) -> Result<Option<MovieRecord>, CoreError>;

    /// Apply only the supplied fields. `None` if missing or not owned.
    async fn patch_movie(
        &self,
        user_id: DbId,
        id: DbId,
        patch: &MoviePatch,
    ) -> Result<Option<MovieRecord>, CoreError>;

    /// Returns `true` if a movie was deleted.
    async fn delete_movie(&self, user_id: DbId, id: DbId) -> Result<bool, CoreError>;
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Borrowing facade over a [`MovieStore`] that validates input and turns
/// missing rows into [`CoreError::NotFound`].
pub struct MovieCatalog<'a> {
    store: &'a dyn MovieStore,
}

fn movie_not_found(id: DbId) -> CoreError {
    CoreError::NotFound {
        entity: ENTITY_MOVIE,
        id,
    }
}

impl<'a> MovieCatalog<'a> {
    pub fn new(store: &'a dyn MovieStore) -> Self {
        Self { store }
    }

    pub async fn create(&self, user_id: DbId, input: MovieInput) -> Result<MovieRecord, CoreError> {
        let input = input.normalized()?;
        let movie = self.store.create_movie(user_id, &input).await?;
        tracing::info!(user_id, movie_id = movie.id, "Movie created");
        Ok(movie)
    }

    pub async fn list(&self, user_id: DbId) -> Result<Vec<MovieRecord>, CoreError> {
        self.store.list_movies(user_id).await
    }

    pub async fn get(&self, user_id: DbId, raw_id: &str) -> Result<MovieRecord, CoreError> {
        let id = parse_movie_id(raw_id)?;
        self.store
            .find_movie(user_id, id)
            .await?
            .ok_or_else(|| movie_not_found(id))
    }

    pub async fn replace(
        &self,
        user_id: DbId,
        raw_id: &str,
        input: MovieInput,
    ) -> Result<MovieRecord, CoreError> {
        let id = parse_movie_id(raw_id)?;
        let input = input.normalized()?;
        let movie = self
            .store
            .replace_movie(user_id, id, &input)
            .await?
            .ok_or_else(|| movie_not_found(id))?;
        tracing::info!(user_id, movie_id = id, "Movie replaced");
        Ok(movie)
    }

    /// An empty patch is a read: the movie is returned unchanged.
    pub async fn patch(
        &self,
        user_id: DbId,
        raw_id: &str,
        patch: MoviePatch,
    ) -> Result<MovieRecord, CoreError> {
        let id = parse_movie_id(raw_id)?;
        let patch = patch.normalized()?;
        let found = if patch.is_empty() {
            self.store.find_movie(user_id, id).await?
        } else {
            self.store.patch_movie(user_id, id, &patch).await?
        };
        let movie = found.ok_or_else(|| movie_not_found(id))?;
        tracing::info!(user_id, movie_id = id, "Movie patched");
        Ok(movie)
    }

    pub async fn delete(&self, user_id: DbId, raw_id: &str) -> Result<MovieDeleted, CoreError> {
        let id = parse_movie_id(raw_id)?;
        if !self.store.delete_movie(user_id, id).await? {
            return Err(movie_not_found(id));
        }
        tracing::info!(user_id, movie_id = id, "Movie deleted");
        Ok(MovieDeleted {
            message: "Movie deleted successfully",
        })
    }
}
