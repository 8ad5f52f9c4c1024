//! Persistence seam for user records.
//!
//! The watchlist engine only talks to a [`UserStore`]. Production uses the
//! Postgres implementation in `cinelog-db`; tests and local runs can use
//! [`crate::memory_store::MemoryUserStore`].

use async_trait::async_trait;

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};
use crate::watchlist::Watchlist;

/// A user record as loaded from the store.
///
/// Contains the password hash -- never serialize this to API responses.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub watchlist: Watchlist,
    /// Incremented on every successful watchlist save.
    pub version: i64,
    pub created_at: Timestamp,
}

/// Input for creating a user. The password must already be hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// Watchlist projection of a user record.
#[derive(Debug, Clone)]
pub struct WatchlistSnapshot {
    pub watchlist: Watchlist,
    pub version: i64,
}

/// Result of a versioned watchlist save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The write landed; carries the new version.
    Saved { version: i64 },
    /// The stored version no longer matched the expected one.
    Stale,
    /// The user record no longer exists.
    Missing,
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a user. Fails with [`CoreError::Conflict`] if the email is taken.
    async fn create_user(&self, input: &NewUser) -> Result<UserRecord, CoreError>;

    async fn find_by_id(&self, id: DbId) -> Result<Option<UserRecord>, CoreError>;

    /// Find a user by email (case-sensitive).
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, CoreError>;

    /// Load only the watchlist and its version.
    async fn load_watchlist(&self, id: DbId) -> Result<Option<WatchlistSnapshot>, CoreError> {
        Ok(self.find_by_id(id).await?.map(|user| WatchlistSnapshot {
            watchlist: user.watchlist,
            version: user.version,
        }))
    }

    /// Replace the user's watchlist if its stored version still equals
    /// `expected_version`. A user that has disappeared since the load is
    /// reported as [`SaveOutcome::Missing`], not as a version race.
    async fn save_watchlist(
        &self,
        id: DbId,
        expected_version: i64,
        watchlist: &Watchlist,
    ) -> Result<SaveOutcome, CoreError>;

    async fn health_check(&self) -> Result<(), CoreError>;
}
