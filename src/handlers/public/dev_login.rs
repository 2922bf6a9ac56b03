// handlers/public/dev_login.rs - POST /dev-login
//
// Issues a signed token for any subject and role list. Only routed when
// login is enabled, which configuration refuses in production.

use axum::{body::Bytes, extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::app::AppState;
use crate::auth::{generate_jwt, Claims};
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct DevLoginRequest {
    #[serde(default = "default_subject")]
    pub subject: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

fn default_subject() -> String {
    "dev-user".to_string()
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DevLoginResponse {
    pub access_token: String,
    pub token_type: String,
}

pub async fn post(State(state): State<AppState>, body: Bytes) -> Result<Json<DevLoginResponse>, ApiError> {
    let request: DevLoginRequest = if body.iter().all(u8::is_ascii_whitespace) {
        serde_json::from_str("{}")?
    } else {
        serde_json::from_slice(&body)?
    };

    let claims = Claims::new(request.subject, request.roles, &state.config.security);
    let token = generate_jwt(&claims, &state.config.security).map_err(|e| {
        tracing::error!("Dev login failed: {}", e);
        ApiError::internal_server_error("Failed to issue token")
    })?;

    tracing::info!("Issued development token for {}", claims.sub);
    Ok(Json(DevLoginResponse {
        access_token: token,
        token_type: "bearer".to_string(),
    }))
}
