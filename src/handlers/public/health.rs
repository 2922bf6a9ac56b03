use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::app::AppState;

/// GET / - describe the API
pub async fn root(State(state): State<AppState>) -> Json<Value> {
    let mut endpoints = json!({
        "home": "/ (public)",
        "health": "/health (public)",
        "config": "/api/config (protected)",
        "control": "/api/control[/:id] (protected)",
        "create": "/api/create[/:id] (protected)",
        "consume": "/api/consume[/:id] (protected)",
        "grade": "/api/grade[/:id] (protected, any role)",
        "testrun": "/api/testrun[/:id] (protected, admin or developer to write)",
    });
    if state.config.security.enable_login {
        endpoints["dev_login"] = json!("/dev-login (public, development only)");
    }

    Json(json!({
        "name": "Creator API",
        "version": env!("CARGO_PKG_VERSION"),
        "environment": state.config.environment.as_str(),
        "endpoints": endpoints,
    }))
}

/// GET /health - 200 when the store answers, 503 otherwise
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.store.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "timestamp": now,
                    "database": "unavailable"
                })),
            )
        }
    }
}
