pub mod bean;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /beans                                 list, create
/// /beans/batch                           create many (POST)
/// /beans/search                          attribute search (GET)
/// /beans/bean-of-the-day                 current (GET), pick new (POST)
/// /beans/{id}                            get, patch, delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/beans", bean::router())
}
