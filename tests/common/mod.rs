#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use creator_api::app::{router, AppState};
use creator_api::auth::{generate_jwt, Claims};
use creator_api::config::AppConfig;
use creator_api::database::{Document, MemoryDocumentStore, RecordId, StoreHandle};

pub struct TestApp {
    pub router: Router,
    pub store: StoreHandle,
    pub config: AppConfig,
}

/// Router over a fresh in-memory store with the development profile
pub async fn spawn_app() -> Result<TestApp> {
    spawn_app_with(AppConfig::development(), Arc::new(MemoryDocumentStore::new())).await
}

pub async fn spawn_app_with(config: AppConfig, store: StoreHandle) -> Result<TestApp> {
    let state = AppState::load(config.clone(), store.clone())
        .await
        .context("failed to build app state")?;
    Ok(TestApp {
        router: router(state),
        store,
        config,
    })
}

pub fn object(value: Value) -> Document {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {}", other),
    }
}

impl TestApp {
    pub fn token(&self, subject: &str, roles: &[&str]) -> String {
        let roles = roles.iter().map(|r| r.to_string()).collect();
        let claims = Claims::new(subject, roles, &self.config.security);
        generate_jwt(&claims, &self.config.security).expect("failed to sign test token")
    }

    /// Insert documents straight into the store, returning their identifiers in order
    pub async fn seed(&self, collection: &str, docs: Vec<Value>) -> Result<Vec<RecordId>> {
        let mut ids = Vec::with_capacity(docs.len());
        for doc in docs {
            ids.push(self.store.insert_one(collection, object(doc)).await?);
        }
        Ok(ids)
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Result<(StatusCode, Value)> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self.router.clone().oneshot(builder.body(body)?).await?;
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await?;
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        Ok((status, json))
    }

    pub async fn get(&self, uri: &str, token: &str) -> Result<(StatusCode, Value)> {
        self.request(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> Result<(StatusCode, Value)> {
        self.request(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn patch(&self, uri: &str, token: &str, body: Value) -> Result<(StatusCode, Value)> {
        self.request(Method::PATCH, uri, Some(token), Some(body)).await
    }
}
