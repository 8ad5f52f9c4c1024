//! Row structs and DTOs.
//!
//! Each submodule contains a `FromRow` struct matching the database row and
//! the DTOs used for inserts and updates.

pub mod movie;
pub mod user;
