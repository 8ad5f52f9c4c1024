//! The watchlist engine: per-caller upsert, remove, list and profile.
//!
//! Every operation is a fresh read-modify-write against the [`UserStore`],
//! scoped to the caller's own record. Validation always happens before the
//! store is touched, and a save only lands if the record's version is the
//! one that was loaded.

use serde::Serialize;

use crate::error::CoreError;
use crate::store::{SaveOutcome, UserStore};
use crate::types::{DbId, Timestamp};
use crate::watchlist::{parse_external_id, UpsertEcho, UpsertEntryRequest, UpsertOutcome, WatchlistEntry};

/// Entity name used in user not-found errors.
pub const ENTITY_USER: &str = "User";

/// Entity name used in entry not-found errors.
pub const ENTITY_WATCHLIST_ENTRY: &str = "Watchlist entry";

/// Confirmation returned by a successful removal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RemoveConfirmation {
    pub message: &'static str,
}

/// Public profile summary. Never carries the watchlist or the password hash.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSummary {
    pub name: String,
    pub email: String,
    pub created_at: Timestamp,
    pub favorite_count: usize,
}

/// Borrowing facade over a [`UserStore`].
pub struct WatchlistEngine<'a> {
    store: &'a dyn UserStore,
}

impl<'a> WatchlistEngine<'a> {
    pub fn new(store: &'a dyn UserStore) -> Self {
        Self { store }
    }

    /// Create or update the entry keyed by `(externalId, mediaKind)`.
    ///
    /// Returns `externalId` and the optional fields the request carried,
    /// normalized, not the stored entry.
    pub async fn upsert(
        &self,
        user_id: DbId,
        request: &UpsertEntryRequest,
    ) -> Result<UpsertEcho, CoreError> {
        let upsert = request.validate()?;

        let mut snapshot = self
            .store
            .load_watchlist(user_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: ENTITY_USER,
                id: user_id,
            })?;

        let outcome = snapshot.watchlist.apply(&upsert);
        let version = self
            .persist(user_id, snapshot.version, &snapshot.watchlist)
            .await?;

        tracing::info!(
            user_id,
            external_id = upsert.external_id,
            media_kind = %upsert.media_kind,
            created = matches!(outcome, UpsertOutcome::Created),
            version,
            "Watchlist entry upserted",
        );

        Ok(upsert.echo())
    }

    /// Remove the first entry whose `externalId` matches `raw_external_id`.
    pub async fn remove(
        &self,
        user_id: DbId,
        raw_external_id: &str,
    ) -> Result<RemoveConfirmation, CoreError> {
        let external_id = parse_external_id(raw_external_id)?;

        let mut snapshot = self
            .store
            .load_watchlist(user_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: ENTITY_USER,
                id: user_id,
            })?;

        let removed = snapshot
            .watchlist
            .remove_first(external_id)
            .ok_or(CoreError::NotFound {
                entity: ENTITY_WATCHLIST_ENTRY,
                id: external_id,
            })?;

        let version = self
            .persist(user_id, snapshot.version, &snapshot.watchlist)
            .await?;

        tracing::info!(
            user_id,
            external_id,
            media_kind = %removed.media_kind,
            version,
            "Watchlist entry removed",
        );

        Ok(RemoveConfirmation {
            message: "Entry removed successfully.",
        })
    }

    /// The caller's entries in insertion order.
    pub async fn list(&self, user_id: DbId) -> Result<Vec<WatchlistEntry>, CoreError> {
        let snapshot = self
            .store
            .load_watchlist(user_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: ENTITY_USER,
                id: user_id,
            })?;
        Ok(snapshot.watchlist.into_entries())
    }

    pub async fn profile(&self, user_id: DbId) -> Result<ProfileSummary, CoreError> {
        let user = self
            .store
            .find_by_id(user_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: ENTITY_USER,
                id: user_id,
            })?;

        Ok(ProfileSummary {
            favorite_count: user.watchlist.favorite_count(),
            name: user.name,
            email: user.email,
            created_at: user.created_at,
        })
    }

    async fn persist(
        &self,
        user_id: DbId,
        expected_version: i64,
        watchlist: &crate::watchlist::Watchlist,
    ) -> Result<i64, CoreError> {
        match self
            .store
            .save_watchlist(user_id, expected_version, watchlist)
            .await?
        {
            SaveOutcome::Saved { version } => Ok(version),
            SaveOutcome::Missing => Err(CoreError::NotFound {
                entity: ENTITY_USER,
                id: user_id,
            }),
            SaveOutcome::Stale => {
                tracing::warn!(user_id, expected_version, "Watchlist save lost a version race");
                Err(CoreError::Conflict(
                    "Watchlist was modified by another request; reload and retry".into(),
                ))
            }
        }
    }
}
