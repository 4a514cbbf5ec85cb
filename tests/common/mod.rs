//! Shared fixtures for router-level tests.

#![allow(dead_code)]

use anyhow::{anyhow, Result};
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use postcraft_backend::{
    auth::{JwtHandler, UserStore},
    build_router,
    generation::{GenerationRequest, GenerationSettings, PostGenerator},
    AppState,
};
use serde_json::{json, Value};
use std::num::NonZeroU32;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tower::ServiceExt;

pub const JWT_SECRET: &str = "integration-test-secret";
pub const ADMIN_USER: &str = "admin";
pub const ADMIN_PASS: &str = "adminpass";

/// Provider stand-in: echoes the prompt length, or fails on demand
#[derive(Default)]
pub struct FakeGenerator {
    pub calls: AtomicUsize,
    pub fail: AtomicBool,
}

#[async_trait::async_trait]
impl PostGenerator for FakeGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(anyhow!("provider unavailable"));
        }
        Ok(format!("generated post ({} prompt chars)", request.prompt.len()))
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub generator: Arc<FakeGenerator>,
}

impl TestApp {
    pub fn new() -> Self {
        let users = Arc::new(UserStore::new(4).unwrap());
        users.seed_admin(ADMIN_USER, ADMIN_PASS).unwrap();

        let generator = Arc::new(FakeGenerator::default());
        let state = AppState::new(
            users,
            Arc::new(JwtHandler::new(JWT_SECRET)),
            generator.clone(),
            GenerationSettings::default(),
            NonZeroU32::new(1).unwrap(),
        );

        Self {
            router: build_router(state.clone()),
            state,
            generator,
        }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(v) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(v.to_string())
            }
            None => Body::empty(),
        };

        self.send(builder.body(body).unwrap()).await
    }

    pub async fn send(&self, req: Request<Body>) -> (StatusCode, Value) {
        let resp = self.router.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, token, Some(body)).await
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::GET, uri, token, None).await
    }

    pub async fn signup(&self, username: &str, password: &str) -> String {
        let (status, body) = self
            .post(
                "/signup",
                None,
                json!({ "username": username, "password": password }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "signup failed: {body}");
        body["token"].as_str().unwrap().to_string()
    }

    pub async fn login(&self, username: &str, password: &str) -> (StatusCode, Value) {
        self.post(
            "/login",
            None,
            json!({ "username": username, "password": password }),
        )
        .await
    }

    pub async fn admin_token(&self) -> String {
        let (status, body) = self.login(ADMIN_USER, ADMIN_PASS).await;
        assert_eq!(status, StatusCode::OK);
        body["token"].as_str().unwrap().to_string()
    }

    pub async fn generate(&self, token: &str, article: &str) -> (StatusCode, Value) {
        self.post("/generate-post", Some(token), json!({ "article": article }))
            .await
    }
}
