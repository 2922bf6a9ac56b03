// handlers/protected/create.rs - /api/create

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use tracing::info;

use super::utils::json_object;
use crate::app::AppState;
use crate::auth::{Breadcrumb, Principal};
use crate::error::ApiError;

/// POST /api/create
pub async fn post(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Extension(breadcrumb): Extension<Breadcrumb>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let data = json_object(&body)?;
    let id = state.creates.create_create(data, &principal, &breadcrumb).await?;
    let create = state.creates.get_create(&id.to_hex(), &principal).await?;
    info!("create_create Success {}, {}", breadcrumb.at_time, breadcrumb.correlation_id);
    Ok((StatusCode::CREATED, Json(create)))
}

/// GET /api/create
pub async fn list(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Extension(breadcrumb): Extension<Breadcrumb>,
) -> Result<impl IntoResponse, ApiError> {
    let creates = state.creates.get_creates(&principal).await?;
    info!("get_creates Success {}, {}", breadcrumb.at_time, breadcrumb.correlation_id);
    Ok(Json(creates))
}

/// GET /api/create/:id
pub async fn get(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Extension(breadcrumb): Extension<Breadcrumb>,
    Path(create_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let create = state.creates.get_create(&create_id, &principal).await?;
    info!("get_create Success {}, {}", breadcrumb.at_time, breadcrumb.correlation_id);
    Ok(Json(create))
}
