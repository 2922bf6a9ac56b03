use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::app::AppState;
use crate::auth::{validate_jwt, Breadcrumb, Principal};
use crate::error::ApiError;

pub const CORRELATION_HEADER: &str = "x-correlation-id";
pub const FORWARDED_FOR_HEADER: &str = "x-forwarded-for";

/// JWT authentication middleware: verifies the bearer token and injects the
/// caller's `Principal` and request `Breadcrumb` into request extensions
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_jwt_from_headers(request.headers()).map_err(|msg| {
        tracing::warn!("Rejected request to {}: {}", request.uri().path(), msg);
        ApiError::unauthorized(msg)
    })?;

    let claims = validate_jwt(&token, &state.config.security).map_err(|e| {
        tracing::warn!("Rejected request to {}: {}", request.uri().path(), e);
        ApiError::unauthorized(e.to_string())
    })?;

    let principal = Principal::from(claims);
    let breadcrumb = Breadcrumb::new(
        &principal,
        client_ip(&request),
        header_value(request.headers(), CORRELATION_HEADER),
    );

    request.extensions_mut().insert(principal);
    request.extensions_mut().insert(breadcrumb);

    Ok(next.run(request).await)
}

/// Extract JWT token from Authorization header
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get("authorization")
        .ok_or_else(|| "Missing Authorization header".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        if token.trim().is_empty() {
            return Err("Empty JWT token".to_string());
        }
        Ok(token.trim().to_string())
    } else {
        Err("Authorization header must use Bearer token format".to_string())
    }
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim().to_string())
}

/// First hop of X-Forwarded-For, else the socket peer when the server was
/// started with connect info
fn client_ip(request: &Request) -> Option<String> {
    if let Some(forwarded) = header_value(request.headers(), FORWARDED_FOR_HEADER) {
        if let Some(first) = forwarded.split(',').map(str::trim).find(|s| !s.is_empty()) {
            return Some(first.to_string());
        }
    }
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
}
