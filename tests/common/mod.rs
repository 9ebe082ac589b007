//! Test harness: the full router over a fresh in-memory store.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use party_registry::{app, AppState, HttpSettings};
use serde_json::{json, Value};
use tower::ServiceExt;
use tower_http::normalize_path::NormalizePath;

pub struct TestApp {
    pub app: NormalizePath<Router>,
    pub state: AppState,
}

impl TestApp {
    /// bcrypt at its minimum cost keeps tests fast.
    pub fn new() -> Self {
        Self::with_bcrypt_cost(4)
    }

    pub fn with_bcrypt_cost(cost: u32) -> Self {
        let state = AppState::in_memory(cost);
        let app = app(state.clone(), &HttpSettings::default());
        TestApp { app, state }
    }

    pub async fn request(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into()))
        };
        (status, body)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request("GET", uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request("POST", uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request("PUT", uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.request("DELETE", uri, None).await
    }

    /// Create an organisation and return its uuid.
    pub async fn organisation(&self, name: &str, country: &str, roles: &[&str]) -> String {
        let (status, body) = self
            .post(
                "/api/v1/organisations",
                json!({"name": name, "city": "Oslo", "countryCode": country, "roles": roles}),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        uuid_of(&body)
    }

    pub async fn user(&self, organisation: &str, email: &str) -> String {
        let (status, body) = self
            .post(
                "/api/v1/users",
                json!({"username": email, "emailAddress": email, "lastName": "Tester",
                       "organisationUuid": organisation}),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        uuid_of(&body)
    }

    pub async fn credential(&self, user: &str, password: &str) -> String {
        let (status, body) = self
            .post("/api/v1/credentials", json!({"userUuid": user, "password": password}))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        uuid_of(&body)
    }
}

pub fn uuid_of(body: &Value) -> String {
    body["uuid"].as_str().expect("uuid in body").to_string()
}
