//! Route definitions for the `/beans` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::bean;
use crate::state::AppState;

/// Routes mounted at `/beans`.
///
/// ```text
/// GET    /                   -> list
/// POST   /                   -> create
/// POST   /batch              -> create_batch
/// GET    /search             -> search
/// GET    /bean-of-the-day    -> current_bean_of_the_day
/// POST   /bean-of-the-day    -> pick_bean_of_the_day
/// GET    /{id}               -> get_by_id
/// PATCH  /{id}               -> update
/// DELETE /{id}               -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(bean::list).post(bean::create))
        .route("/batch", post(bean::create_batch))
        .route("/search", get(bean::search))
        .route(
            "/bean-of-the-day",
            get(bean::current_bean_of_the_day).post(bean::pick_bean_of_the_day),
        )
        .route(
            "/{id}",
            get(bean::get_by_id)
                .patch(bean::update)
                .delete(bean::delete),
        )
}
