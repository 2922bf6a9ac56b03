// handlers/protected/grade.rs - /api/grade (read-only, any role)

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Extension, Json,
};
use tracing::info;

use crate::app::AppState;
use crate::auth::{Breadcrumb, Principal};
use crate::error::ApiError;

pub async fn list(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Extension(breadcrumb): Extension<Breadcrumb>,
) -> Result<impl IntoResponse, ApiError> {
    let grades = state.grades.get_grades(&principal).await?;
    info!("get_grades Success {}, {}", breadcrumb.at_time, breadcrumb.correlation_id);
    Ok(Json(grades))
}

pub async fn get(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Extension(breadcrumb): Extension<Breadcrumb>,
    Path(grade_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let grade = state.grades.get_grade(&grade_id, &principal).await?;
    info!("get_grade Success {}, {}", breadcrumb.at_time, breadcrumb.correlation_id);
    Ok(Json(grade))
}
