//! Route definitions for the personal movie catalog.

use axum::routing::get;
use axum::Router;

use crate::handlers::movies;
use crate::state::AppState;

/// Routes mounted at `/movies`. All require auth.
///
/// ```text
/// GET    /       -> list_movies
/// POST   /       -> create_movie
/// GET    /{id}   -> get_movie
/// PUT    /{id}   -> replace_movie
/// PATCH  /{id}   -> patch_movie
/// DELETE /{id}   -> delete_movie
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(movies::list_movies).post(movies::create_movie))
        .route(
            "/{id}",
            get(movies::get_movie)
                .put(movies::replace_movie)
                .patch(movies::patch_movie)
                .delete(movies::delete_movie),
        )
}
