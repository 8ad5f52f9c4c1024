//! Request extractors that gate handlers.
//!
//! - [`auth::AuthUser`] -- Resolves the caller from a JWT Bearer token.

pub mod auth;
