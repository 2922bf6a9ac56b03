// handlers/protected/testrun.rs - /api/testrun (writes need admin or developer)

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

pub async fn post(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Extension(breadcrumb): Extension<Breadcrumb>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let data = json_object(&body)?;
    let id = state.testruns.create_testrun(data, &principal).await?;
    let testrun = state.testruns.get_testrun(&id.to_hex(), &principal).await?;
    info!("create_testrun Success {}, {}", breadcrumb.at_time, breadcrumb.correlation_id);
    Ok((StatusCode::CREATED, Json(testrun)))
}

pub async fn list(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Extension(breadcrumb): Extension<Breadcrumb>,
) -> Result<impl IntoResponse, ApiError> {
    let testruns = state.testruns.get_testruns(&principal).await?;
    info!("get_testruns Success {}, {}", breadcrumb.at_time, breadcrumb.correlation_id);
    Ok(Json(testruns))
}

pub async fn get(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Extension(breadcrumb): Extension<Breadcrumb>,
    Path(testrun_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let testrun = state.testruns.get_testrun(&testrun_id, &principal).await?;
    info!("get_testrun Success {}, {}", breadcrumb.at_time, breadcrumb.correlation_id);
    Ok(Json(testrun))
}

pub async fn patch(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Extension(breadcrumb): Extension<Breadcrumb>,
    Path(testrun_id): Path<String>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let data = json_object(&body)?;
    let testrun = state.testruns.update_testrun(&testrun_id, data, &principal).await?;
    info!("update_testrun Success {}, {}", breadcrumb.at_time, breadcrumb.correlation_id);
    Ok(Json(testrun))
}
