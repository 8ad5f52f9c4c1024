//! Watchlist domain: entries, the upsert request schema, and merge rules.
//!
//! A user's watchlist is an ordered list of [`WatchlistEntry`] values keyed by
//! the natural key `(external_id, media_kind)`. Upserts are partial: only the
//! fields present in the request are applied to an existing entry, and the
//! response echoes the request rather than the stored entry.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Lowest accepted rating (inclusive).
pub const MIN_RATING: f64 = 0.0;

/// Highest accepted rating (inclusive).
pub const MAX_RATING: f64 = 10.0;

// ---------------------------------------------------------------------------
// Media kind
// ---------------------------------------------------------------------------

/// Kind of title tracked by an entry.
///
/// Serialized as `"movie"` / `"series"`. `"tv"` is accepted on input as an
/// alias for [`MediaKind::Series`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Movie,
    #[serde(alias = "tv")]
    Series,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Series => "series",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "movie" => Ok(MediaKind::Movie),
            "series" | "tv" => Ok(MediaKind::Series),
            _ => Err(CoreError::Validation(
                "Invalid mediaKind. Must be \"movie\" or \"series\".".into(),
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Entries
// ---------------------------------------------------------------------------

/// A single tracked title in a user's watchlist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchlistEntry {
    /// Identifier of the title in the external catalog.
    pub external_id: i64,
    pub media_kind: MediaKind,
    /// `None` when the user has not rated the title.
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub favorite: bool,
}

/// Ordered collection of entries, in insertion order.
///
/// Invariant: no two entries share the same `(external_id, media_kind)` pair.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Watchlist(Vec<WatchlistEntry>);

/// What an upsert did to the watchlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated,
}

impl Watchlist {
    pub fn new(entries: Vec<WatchlistEntry>) -> Self {
        Self(entries)
    }

    pub fn entries(&self) -> &[WatchlistEntry] {
        &self.0
    }

    pub fn into_entries(self) -> Vec<WatchlistEntry> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Find the entry with the given natural key.
    pub fn find(&self, external_id: i64, media_kind: MediaKind) -> Option<&WatchlistEntry> {
        self.0
            .iter()
            .find(|e| e.external_id == external_id && e.media_kind == media_kind)
    }

    /// Apply a validated upsert.
    ///
    /// An existing entry with the same natural key only has the supplied
    /// fields overwritten. Otherwise a new entry is appended, with an absent
    /// `favorite` defaulting to `false`.
    pub fn apply(&mut self, upsert: &EntryUpsert) -> UpsertOutcome {
        let existing = self
            .0
            .iter_mut()
            .find(|e| e.external_id == upsert.external_id && e.media_kind == upsert.media_kind);

        match existing {
            Some(entry) => {
                match upsert.rating {
                    RatingPatch::Absent => {}
                    RatingPatch::Clear => entry.rating = None,
                    RatingPatch::Set(value) => entry.rating = Some(value),
                }
                if let Some(favorite) = upsert.favorite {
                    entry.favorite = favorite;
                }
                UpsertOutcome::Updated
            }
            None => {
                self.0.push(WatchlistEntry {
                    external_id: upsert.external_id,
                    media_kind: upsert.media_kind,
                    rating: upsert.rating.value(),
                    favorite: upsert.favorite.unwrap_or(false),
                });
                UpsertOutcome::Created
            }
        }
    }

    /// Remove the first entry whose `external_id` matches, regardless of its
    /// media kind. Returns the removed entry.
    pub fn remove_first(&mut self, external_id: i64) -> Option<WatchlistEntry> {
        let index = self.0.iter().position(|e| e.external_id == external_id)?;
        Some(self.0.remove(index))
    }

    /// Number of entries flagged as favorite.
    pub fn favorite_count(&self) -> usize {
        self.0.iter().filter(|e| e.favorite).count()
    }
}

// ---------------------------------------------------------------------------
// Upsert request
// ---------------------------------------------------------------------------

/// Tri-state rating field of an upsert request.
///
/// `Absent` leaves the stored rating untouched, `Clear` (JSON `null` or `""`)
/// removes it, `Set` overwrites it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum RatingPatch {
    #[default]
    Absent,
    Clear,
    Set(f64),
}

impl RatingPatch {
    pub fn is_absent(&self) -> bool {
        matches!(self, RatingPatch::Absent)
    }

    /// The rating a new entry should be created with.
    pub fn value(&self) -> Option<f64> {
        match self {
            RatingPatch::Set(v) => Some(*v),
            RatingPatch::Absent | RatingPatch::Clear => None,
        }
    }
}

impl Serialize for RatingPatch {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RatingPatch::Set(v) => serializer.serialize_f64(*v),
            RatingPatch::Absent | RatingPatch::Clear => serializer.serialize_none(),
        }
    }
}

/// Raw body of `POST /api/user/movies`.
///
/// Every field is optional at this stage so that [`UpsertEntryRequest::validate`]
/// can report missing fields in a fixed order. Loosely typed JSON is coerced
/// here: numeric strings become numbers, `"true"`/`"false"` and `0`/`1`
/// become booleans.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertEntryRequest {
    #[serde(default, deserialize_with = "de_external_id")]
    pub external_id: Option<i64>,
    #[serde(default)]
    pub media_kind: Option<String>,
    #[serde(default, deserialize_with = "de_rating")]
    pub rating: RatingPatch,
    #[serde(default, deserialize_with = "de_favorite")]
    pub favorite: Option<bool>,
}

/// An upsert request that passed validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntryUpsert {
    pub external_id: i64,
    pub media_kind: MediaKind,
    pub rating: RatingPatch,
    pub favorite: Option<bool>,
}

/// Response body of an upsert: `externalId` plus whichever of `rating` and
/// `favorite` the caller sent, normalized. `mediaKind` is never echoed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertEcho {
    pub external_id: i64,
    #[serde(skip_serializing_if = "RatingPatch::is_absent")]
    pub rating: RatingPatch,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favorite: Option<bool>,
}

impl UpsertEntryRequest {
    /// Decode a JSON body, mapping type errors to [`CoreError::Validation`].
    pub fn from_json(body: Value) -> Result<Self, CoreError> {
        serde_json::from_value(body).map_err(|e| CoreError::Validation(e.to_string()))
    }

    /// Validate in order: required fields, media kind, rating range.
    pub fn validate(&self) -> Result<EntryUpsert, CoreError> {
        let (Some(external_id), Some(media_kind)) = (self.external_id, self.media_kind.as_deref())
        else {
            return Err(CoreError::Validation(
                "externalId and mediaKind are both required".into(),
            ));
        };

        let media_kind: MediaKind = media_kind.parse()?;

        if let RatingPatch::Set(value) = self.rating {
            if !value.is_finite() || !(MIN_RATING..=MAX_RATING).contains(&value) {
                return Err(CoreError::Validation(format!(
                    "rating must be between {MIN_RATING} and {MAX_RATING}"
                )));
            }
        }

        Ok(EntryUpsert {
            external_id,
            media_kind,
            rating: self.rating,
            favorite: self.favorite,
        })
    }
}

impl EntryUpsert {
    pub fn echo(&self) -> UpsertEcho {
        UpsertEcho {
            external_id: self.external_id,
            rating: self.rating,
            favorite: self.favorite,
        }
    }
}

/// Parse an `externalId` taken from a URL path segment.
pub fn parse_external_id(raw: &str) -> Result<i64, CoreError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("externalId is required".into()));
    }
    trimmed
        .parse()
        .map_err(|_| CoreError::Validation("externalId must be an integer".into()))
}

// ---------------------------------------------------------------------------
// Coercing deserializers
// ---------------------------------------------------------------------------

fn de_external_id<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
    match Value::deserialize(d)? {
        Value::Null => Ok(None),
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().and_then(integral_f64_to_i64))
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom("externalId must be an integer")),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| serde::de::Error::custom("externalId must be an integer")),
        _ => Err(serde::de::Error::custom("externalId must be an integer")),
    }
}

/// Exact conversion of an integral float; `None` for fractions and for
/// values outside the `i64` range.
fn integral_f64_to_i64(f: f64) -> Option<i64> {
    // i64::MAX as f64 rounds up to 2^63, which is itself out of range.
    const UPPER: f64 = i64::MAX as f64;
    const LOWER: f64 = i64::MIN as f64;
    (f.is_finite() && f.fract() == 0.0 && (LOWER..UPPER).contains(&f)).then_some(f as i64)
}

fn de_rating<'de, D: Deserializer<'de>>(d: D) -> Result<RatingPatch, D::Error> {
    match Value::deserialize(d)? {
        Value::Null => Ok(RatingPatch::Clear),
        Value::Number(n) => n
            .as_f64()
            .map(RatingPatch::Set)
            .ok_or_else(|| serde::de::Error::custom("rating must be a number")),
        Value::String(s) if s.trim().is_empty() => Ok(RatingPatch::Clear),
        Value::String(s) => s
            .trim()
            .parse()
            .map(RatingPatch::Set)
            .map_err(|_| serde::de::Error::custom("rating must be a number")),
        _ => Err(serde::de::Error::custom("rating must be a number or null")),
    }
}

fn de_favorite<'de, D: Deserializer<'de>>(d: D) -> Result<Option<bool>, D::Error> {
    match Value::deserialize(d)? {
        Value::Bool(b) => Ok(Some(b)),
        // An explicit null is a supplied value that reads as "not favorite".
        Value::Null => Ok(Some(false)),
        Value::Number(n) => match n.as_i64() {
            Some(0) => Ok(Some(false)),
            Some(1) => Ok(Some(true)),
            _ => Err(serde::de::Error::custom("favorite must be a boolean")),
        },
        Value::String(s) => match s.trim() {
            "true" => Ok(Some(true)),
            "false" => Ok(Some(false)),
            _ => Err(serde::de::Error::custom("favorite must be a boolean")),
        },
        _ => Err(serde::de::Error::custom("favorite must be a boolean")),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
