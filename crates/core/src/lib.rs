//! Domain core for the Cinelog watchlist service.
//!
//! Holds everything that does not depend on HTTP or on a concrete database:
//! shared types, the error taxonomy, the watchlist merge rules, registration
//! input validation, the personal movie catalog, the [`store::UserStore`] seam and the
//! [`engine::WatchlistEngine`] that ties them together.

pub mod engine;
pub mod error;
pub mod memory_store;
pub mod movies;
pub mod registration;
pub mod store;
pub mod types;
pub mod watchlist;
