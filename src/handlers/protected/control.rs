// handlers/protected/control.rs - /api/control

use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use tracing::info;

use super::utils::json_object;
use crate::app::AppState;
use crate::auth::{Breadcrumb, Principal};
use crate::error::ApiError;
use crate::pagination::{PageQuery, PageRequest};

/// POST /api/control - create a control and return the stored document
pub async fn post(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Extension(breadcrumb): Extension<Breadcrumb>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let data = json_object(&body)?;
    let id = state.controls.create_control(data, &principal, &breadcrumb).await?;
    let control = state.controls.get_control(&id.to_hex(), &principal).await?;
    info!("create_control Success {}, {}", breadcrumb.at_time, breadcrumb.correlation_id);
    Ok((StatusCode::CREATED, Json(control)))
}

/// GET /api/control - one page of controls, optionally filtered by `name`
pub async fn list(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Extension(breadcrumb): Extension<Breadcrumb>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(query) = query?;
    let request = PageRequest::from_query(query, state.config.pagination.default_limit)?;
    let page = state.controls.get_controls(&request, &principal).await?;
    info!("get_controls Success {}, {}", breadcrumb.at_time, breadcrumb.correlation_id);
    Ok(Json(page))
}

/// GET /api/control/:id
pub async fn get(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Extension(breadcrumb): Extension<Breadcrumb>,
    Path(control_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let control = state.controls.get_control(&control_id, &principal).await?;
    info!("get_control Success {}, {}", breadcrumb.at_time, breadcrumb.correlation_id);
    Ok(Json(control))
}

/// PATCH /api/control/:id - shallow merge; `_id`, `created` and `saved` are rejected
pub async fn patch(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Extension(breadcrumb): Extension<Breadcrumb>,
    Path(control_id): Path<String>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let data = json_object(&body)?;
    let control = state
        .controls
        .update_control(&control_id, data, &principal, &breadcrumb)
        .await?;
    info!("update_control Success {}, {}", breadcrumb.at_time, breadcrumb.correlation_id);
    Ok(Json(control))
}
