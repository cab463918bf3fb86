//! Handlers for the `/beans` resource.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use beans_core::bean::{BeanSearch, CreateBean, UpdateBean};
use beans_core::error::CoreError;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

/// GET /api/v1/beans
///
/// An empty catalog is an empty list, not an error.
pub async fn list(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let beans = state.catalog.get_all().await?;
    Ok(Json(DataResponse { data: beans }))
}

/// GET /api/v1/beans/search?name=&description=&country=
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<BeanSearch>,
) -> AppResult<impl IntoResponse> {
    let beans = state.catalog.search(params).await?;
    Ok(Json(DataResponse { data: beans }))
}

/// GET /api/v1/beans/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let bean = state.catalog.get_by_id(&id).await?;
    Ok(Json(DataResponse { data: bean }))
}

/// POST /api/v1/beans
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CreateBean>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(input) = payload?;
    let bean = state.catalog.add(input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: bean })))
}

/// POST /api/v1/beans/batch
///
/// All-or-nothing: any duplicate id rejects the whole batch.
pub async fn create_batch(
    State(state): State<AppState>,
    payload: Result<Json<Vec<CreateBean>>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(inputs) = payload?;
    if inputs.is_empty() {
        return Err(AppError::BadRequest("Bean list is empty".into()));
    }
    let beans = state.catalog.add_many(inputs).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: beans })))
}

/// PATCH /api/v1/beans/{id}
///
/// Only fields present and non-null in the body are changed.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateBean>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(patch) = payload?;
    let bean = state.catalog.update(&id, patch).await?;
    Ok(Json(DataResponse { data: bean }))
}

/// DELETE /api/v1/beans/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.catalog.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Bean of the day
// ---------------------------------------------------------------------------

/// GET /api/v1/beans/bean-of-the-day
pub async fn current_bean_of_the_day(
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let bean = state
        .catalog
        .current_bean_of_the_day()
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Bean of the day",
            id: "current".into(),
        }))?;
    Ok(Json(DataResponse { data: bean }))
}

/// POST /api/v1/beans/bean-of-the-day
///
/// Pick a new bean of the day, excluding the current holder.
pub async fn pick_bean_of_the_day(
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let bean = state.catalog.pick_bean_of_the_day().await?;
    Ok(Json(DataResponse { data: bean }))
}
