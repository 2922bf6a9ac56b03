// handlers/protected/config.rs - /api/config

use axum::{extract::State, Extension, Json};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::auth::Breadcrumb;

/// GET /api/config - environment name plus the startup-loaded
/// enumerators and versions
pub async fn get(State(state): State<AppState>, Extension(breadcrumb): Extension<Breadcrumb>) -> Json<Value> {
    tracing::info!("get_config Success {}, {}", breadcrumb.at_time, breadcrumb.correlation_id);
    Json(json!({
        "environment": state.config.environment.as_str(),
        "enumerators": state.reference.enumerators,
        "versions": state.reference.versions,
    }))
}
