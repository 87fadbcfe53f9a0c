// Shared helpers for HTTP-level tests on the in-memory backend

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, Response, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use ondas_api::auth::config::JwtConfig;
use ondas_api::auth::AuthConfig;
use ondas_api::storage::{hash_password, CreateUserRow, InMemoryDatabase, StorageBackend, UserRow};
use ondas_api::uploads::UploadConfig;
use ondas_api::{build_app, build_router_with_prefix, AppState};
use ondas_core::Role;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

pub const TEST_SECRET: &str = "integration-test-secret";
pub const TEST_PASSWORD: &str = "correct horse battery";

pub struct TestApp {
    pub app: Router,
    pub state: AppState,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_uploads(UploadConfig::default())
    }

    pub fn with_uploads(uploads: UploadConfig) -> Self {
        Self::build(uploads, "")
    }

    /// Routes nested under `prefix`, as `API_PREFIX` does in the binary
    pub fn with_prefix(prefix: &str) -> Self {
        Self::build(UploadConfig::default(), prefix)
    }

    fn build(uploads: UploadConfig, prefix: &str) -> Self {
        let mut auth = AuthConfig::new(JwtConfig::new(TEST_SECRET));
        auth.secure_cookies = false;
        auth.api_prefix = prefix.to_string();
        let state = AppState::new(StorageBackend::in_memory(), auth, uploads);
        Self {
            app: build_router_with_prefix(build_app(state.clone()), prefix),
            state,
        }
    }

    pub fn memory(&self) -> &Arc<InMemoryDatabase> {
        self.state.storage.memory().unwrap()
    }

    /// Insert a user directly and return it with a fresh access token
    pub async fn user(&self, email: &str, role: Role) -> (UserRow, String) {
        let user = self
            .state
            .storage
            .create_user(CreateUserRow {
                email: email.to_string(),
                name: email.split('@').next().unwrap_or("user").to_string(),
                role,
                password_hash: Some(hash_password(TEST_PASSWORD).unwrap()),
            })
            .await
            .unwrap();
        let token = self.token_for(&user, role);
        (user, token)
    }

    pub fn token_for(&self, user: &UserRow, role: Role) -> String {
        self.state
            .auth
            .jwt_service
            .issue_access_token(&user.id.to_string(), role)
            .unwrap()
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.app.clone().oneshot(request).await.unwrap()
    }

    /// JSON request with an optional bearer token; returns status and parsed body
    pub async fn call(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let response = self.send(request(method, uri, token, body)).await;
        let status = response.status();
        (status, body_json(response).await)
    }
}

pub fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    }
}

/// `name=value` pairs from the Set-Cookie headers of a response
pub fn set_cookies(response: &Response<Body>) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .map(|v| v.split(';').next().unwrap_or("").to_string())
        .collect()
}
