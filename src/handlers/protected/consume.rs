// handlers/protected/consume.rs - /api/consume (read-only)

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    response::IntoResponse,
    Extension, Json,
};
use tracing::info;

use crate::app::AppState;
use crate::auth::{Breadcrumb, Principal};
use crate::error::ApiError;
use crate::pagination::{PageQuery, PageRequest};

/// GET /api/consume - `{items, limit, has_more, next_cursor}`
pub async fn list(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Extension(breadcrumb): Extension<Breadcrumb>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(query) = query?;
    let request = PageRequest::from_query(query, state.config.pagination.default_limit)?;
    let page = state.consumes.get_consumes(&request, &principal).await?;
    info!("get_consumes Success {}, {}", breadcrumb.at_time, breadcrumb.correlation_id);
    Ok(Json(page))
}

/// GET /api/consume/:id
pub async fn get(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Extension(breadcrumb): Extension<Breadcrumb>,
    Path(consume_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let consume = state.consumes.get_consume(&consume_id, &principal).await?;
    info!("get_consume Success {}, {}", breadcrumb.at_time, breadcrumb.correlation_id);
    Ok(Json(consume))
}
