//! In-process [`UserStore`] and [`MovieStore`] used by tests and
//! database-less local runs.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::CoreError;
use crate::movies::{MovieInput, MoviePatch, MovieRecord, MovieStore};
use crate::store::{NewUser, SaveOutcome, UserRecord, UserStore};
use crate::types::DbId;
use crate::watchlist::Watchlist;

#[derive(Debug, Default)]
struct Inner {
    users: BTreeMap<DbId, UserRecord>,
    next_id: DbId,
}

/// Map-backed store with the same versioning semantics as the Postgres one.
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    inner: RwLock<Inner>,
    fail_writes: AtomicBool,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail with [`CoreError::Internal`].
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_writable(&self) -> Result<(), CoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(CoreError::Internal("memory store is rejecting writes".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create_user(&self, input: &NewUser) -> Result<UserRecord, CoreError> {
        self.check_writable()?;
        let mut inner = self.inner.write().await;

        if inner.users.values().any(|u| u.email == input.email) {
            return Err(CoreError::Conflict("Email is already registered".into()));
        }

        inner.next_id += 1;
        let user = UserRecord {
            id: inner.next_id,
            name: input.name.clone(),
            email: input.email.clone(),
            password_hash: input.password_hash.clone(),
            watchlist: Watchlist::default(),
            version: 0,
            created_at: chrono::Utc::now(),
        };
        inner.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<UserRecord>, CoreError> {
        Ok(self.inner.read().await.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, CoreError> {
        let inner = self.inner.read().await;
        Ok(inner.users.values().find(|u| u.email == email).cloned())
    }

    async fn save_watchlist(
        &self,
        id: DbId,
        expected_version: i64,
        watchlist: &Watchlist,
    ) -> Result<SaveOutcome, CoreError> {
        self.check_writable()?;
        let mut inner = self.inner.write().await;

        let Some(user) = inner.users.get_mut(&id) else {
            return Ok(SaveOutcome::Missing);
        };
        if user.version != expected_version {
            return Ok(SaveOutcome::Stale);
        }

        user.watchlist = watchlist.clone();
        user.version += 1;
        Ok(SaveOutcome::Saved {
            version: user.version,
        })
    }

    async fn health_check(&self) -> Result<(), CoreError> {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Movies
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct MovieRows {
    movies: BTreeMap<DbId, MovieRecord>,
    next_id: DbId,
}

/// Map-backed [`MovieStore`]. It does not know about users, so any owner ID
/// is accepted on create.
#[derive(Debug, Default)]
pub struct MemoryMovieStore {
    rows: RwLock<MovieRows>,
    fail_writes: AtomicBool,
}

impl MemoryMovieStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail with [`CoreError::Internal`].
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_writable(&self) -> Result<(), CoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(CoreError::Internal("memory store is rejecting writes".into()));
        }
        Ok(())
    }
}

/// The caller's row, if it exists and they own it.
fn owned(rows: &mut MovieRows, user_id: DbId, id: DbId) -> Option<&mut MovieRecord> {
    rows.movies.get_mut(&id).filter(|m| m.user_id == user_id)
}

#[async_trait]
impl MovieStore for MemoryMovieStore {
    async fn create_movie(
        &self,
        user_id: DbId,
        input: &MovieInput,
    ) -> Result<MovieRecord, CoreError> {
        self.check_writable()?;
        let mut rows = self.rows.write().await;

        rows.next_id += 1;
        let now = chrono::Utc::now();
        let movie = MovieRecord {
            id: rows.next_id,
            user_id,
            title: input.title.clone(),
            genre: input.genre.clone(),
            release_year: input.release_year,
            rating: input.rating,
            created_at: now,
            updated_at: now,
        };
        rows.movies.insert(movie.id, movie.clone());
        Ok(movie)
    }

    async fn list_movies(&self, user_id: DbId) -> Result<Vec<MovieRecord>, CoreError> {
        let rows = self.rows.read().await;
        Ok(rows
            .movies
            .values()
            .filter(|m| m.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find_movie(&self, user_id: DbId, id: DbId) -> Result<Option<MovieRecord>, CoreError> {
        let rows = self.rows.read().await;
        Ok(rows
            .movies
            .get(&id)
            .filter(|m| m.user_id == user_id)
            .cloned())
    }

    async fn replace_movie(
        &self,
        user_id: DbId,
        id: DbId,
        input: &MovieInput,
    ) -> Result<Option<MovieRecord>, CoreError> {
        self.check_writable()?;
        let mut rows = self.rows.write().await;

        Ok(owned(&mut rows, user_id, id).map(|movie| {
            movie.title = input.title.clone();
            movie.genre = input.genre.clone();
            movie.release_year = input.release_year;
            movie.rating = input.rating;
            movie.updated_at = chrono::Utc::now();
            movie.clone()
        }))
    }

    async fn patch_movie(
        &self,
        user_id: DbId,
        id: DbId,
        patch: &MoviePatch,
    ) -> Result<Option<MovieRecord>, CoreError> {
        self.check_writable()?;
        let mut rows = self.rows.write().await;

        Ok(owned(&mut rows, user_id, id).map(|movie| {
            if let Some(title) = &patch.title {
                movie.title = title.clone();
            }
            if let Some(genre) = &patch.genre {
                movie.genre = genre.clone();
            }
            if let Some(release_year) = patch.release_year {
                movie.release_year = release_year;
            }
            if let Some(rating) = patch.rating {
                movie.rating = rating;
            }
            movie.updated_at = chrono::Utc::now();
            movie.clone()
        }))
    }

    async fn delete_movie(&self, user_id: DbId, id: DbId) -> Result<bool, CoreError> {
        self.check_writable()?;
        let mut rows = self.rows.write().await;

        if owned(&mut rows, user_id, id).is_none() {
            return Ok(false);
        }
        Ok(rows.movies.remove(&id).is_some())
    }
}
