use std::sync::Arc;

use cinelog_core::engine::WatchlistEngine;
use cinelog_core::movies::{MovieCatalog, MovieStore};
use cinelog_core::store::UserStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Credential store holding users and their watchlists.
    pub store: Arc<dyn UserStore>,
    /// Per-user movie catalog rows.
    pub movies: Arc<dyn MovieStore>,
    /// Server configuration (JWT settings, password policy, ...).
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Watchlist engine bound to this state's store.
    pub fn watchlist(&self) -> WatchlistEngine<'_> {
        WatchlistEngine::new(self.store.as_ref())
    }

    /// Movie catalog bound to this state's movie store.
    pub fn catalog(&self) -> MovieCatalog<'_> {
        MovieCatalog::new(self.movies.as_ref())
    }
}
