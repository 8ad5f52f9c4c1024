//! User row model and DTOs.

use cinelog_core::store::{NewUser, UserRecord, WatchlistSnapshot};
use cinelog_core::types::{DbId, Timestamp};
use cinelog_core::watchlist::Watchlist;
use sqlx::types::Json;
use sqlx::FromRow;

/// Full row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub watchlist: Json<Watchlist>,
    pub version: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// `watchlist` + `version` projection of a user row.
#[derive(Debug, Clone, FromRow)]
pub struct UserWatchlist {
    pub watchlist: Json<Watchlist>,
    pub version: i64,
}

/// DTO for inserting a user. The password must already be hashed.
#[derive(Debug)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

impl From<User> for UserRecord {
    fn from(row: User) -> Self {
        UserRecord {
            id: row.id,
            name: row.name,
            email: row.email,
            password_hash: row.password_hash,
            watchlist: row.watchlist.0,
            version: row.version,
            created_at: row.created_at,
        }
    }
}

impl From<UserWatchlist> for WatchlistSnapshot {
    fn from(row: UserWatchlist) -> Self {
        WatchlistSnapshot {
            watchlist: row.watchlist.0,
            version: row.version,
        }
    }
}

impl From<&NewUser> for CreateUser {
    fn from(input: &NewUser) -> Self {
        CreateUser {
            name: input.name.clone(),
            email: input.email.clone(),
            password_hash: input.password_hash.clone(),
        }
    }
}
