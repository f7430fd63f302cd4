//! Common test utilities for integration tests
//!
//! Each `TestContext` owns a private, migrated in-memory database and the
//! full router built on top of it. Requests go straight into the router via
//! `tower::Service::call`; no socket is opened.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use notegreen_api::app::{build_router, AppState};
use notegreen_api::config::Config;
use notegreen_shared::db::migrations::run_migrations;
use notegreen_shared::db::pool::{create_pool, DatabaseConfig, IN_MEMORY_URL};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use std::collections::HashMap;
use std::path::Path;
use tower::Service as _;

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: SqlitePool,
    pub app: axum::Router,
    pub config: Config,
}

/// Response captured by the request helpers
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    /// Parses the body as JSON, panicking with the raw body on failure
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or_else(|e| {
            panic!(
                "Expected JSON body ({}), got {:?}",
                e,
                String::from_utf8_lossy(&self.body)
            )
        })
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Asserts the status, printing the body when it doesn't match
    pub fn assert_status(&self, expected: StatusCode) -> &Self {
        assert_eq!(
            self.status,
            expected,
            "unexpected status, body: {}",
            self.text()
        );
        self
    }
}

impl TestContext {
    /// Creates a new test context with a fresh database
    pub async fn new() -> anyhow::Result<Self> {
        Self::with_env(&[]).await
    }

    /// Creates a test context that also serves a web client from `dir`
    pub async fn with_static_dir(dir: &Path) -> anyhow::Result<Self> {
        let dir = dir.display().to_string();
        Self::with_env(&[("STATIC_DIR", dir.as_str())]).await
    }

    /// Creates a test context with extra configuration variables
    pub async fn with_env(vars: &[(&str, &str)]) -> anyhow::Result<Self> {
        let mut env: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        env.insert("DATABASE_URL".to_string(), IN_MEMORY_URL.to_string());

        let config = Config::from_lookup(|key| env.get(key).cloned())?;

        let db = create_pool(DatabaseConfig::in_memory()).await?;
        run_migrations(&db).await?;

        let state = AppState::new(db.clone(), config.clone());
        let app = build_router(state);

        Ok(TestContext { db, app, config })
    }

    /// Sends a request with an optional JSON body
    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
        let builder = Request::builder().method(method).uri(uri);

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.send_request(request).await
    }

    /// Sends a prepared request
    pub async fn send_request(&self, request: Request<Body>) -> TestResponse {
        let response = self.app.clone().call(request).await.unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec();

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> TestResponse {
        self.send(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> TestResponse {
        self.send(Method::PUT, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> TestResponse {
        self.send(Method::DELETE, uri, None).await
    }

    /// Creates a folder through the API and returns its JSON
    pub async fn create_folder(&self, name: &str) -> Value {
        let response = self.post("/api/folders", json!({ "name": name })).await;
        response.assert_status(StatusCode::CREATED);
        response.json()
    }

    /// Creates a tag through the API and returns its JSON
    pub async fn create_tag(&self, name: &str, color: &str) -> Value {
        let response = self
            .post("/api/tags", json!({ "name": name, "color": color }))
            .await;
        response.assert_status(StatusCode::CREATED);
        response.json()
    }

    /// Creates a note through the API and returns its JSON
    pub async fn create_note(&self, body: Value) -> Value {
        let response = self.post("/api/notes", body).await;
        response.assert_status(StatusCode::CREATED);
        response.json()
    }
}

/// String id out of an entity's JSON
pub fn id_of(entity: &Value) -> String {
    entity["id"]
        .as_str()
        .unwrap_or_else(|| panic!("entity has no id: {entity}"))
        .to_string()
}

/// Ids of a JSON array of entities, in order
pub fn ids_of(list: &Value) -> Vec<String> {
    list.as_array()
        .unwrap_or_else(|| panic!("expected an array: {list}"))
        .iter()
        .map(id_of)
        .collect()
}
