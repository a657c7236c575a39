//! Shared harness for HTTP-level integration tests.
//!
//! Builds the real application router (same middleware stack as `main.rs`)
//! on top of a per-test database, with the generation backend replaced by
//! an in-process stub so no network calls happen.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, Response, StatusCode};
use axum::Router;
use sqlx::PgPool;
use tower::ServiceExt;

use taskly_ai::{
    GeneratedTask, GeneratedTaskBatch, OpenAiConfig, ProviderError, TaskGenerator,
};
use taskly_core::generation::GenerationContext;
use taskly_core::types::DbId;
use taskly_db::models::task::{TaskPriority, TaskStatus};
use taskly_db::models::user::CreateUser;
use taskly_db::repositories::UserRepo;

use taskly_api::auth::jwt::{generate_access_token, JwtConfig};
use taskly_api::config::ServerConfig;
use taskly_api::router::build_app_router;
use taskly_api::state::AppState;

/// Secret used to sign test tokens.
const TEST_JWT_SECRET: &str = "integration-test-secret";

// ---------------------------------------------------------------------------
// Stub generation backend
// ---------------------------------------------------------------------------

/// What the stub should do on the next `generate_tasks` call.
pub enum StubBehavior {
    /// Return this batch.
    Batch(GeneratedTaskBatch),
    /// Fail with an upstream API error (simulates auth failure, rate limit).
    Fail,
}

/// In-process [`TaskGenerator`] with scriptable behavior and call recording.
pub struct StubGenerator {
    behavior: Mutex<StubBehavior>,
    /// Prompts seen by the stub, for asserting what reached the backend.
    pub prompts: Mutex<Vec<String>>,
}

impl StubGenerator {
    pub fn returning(batch: GeneratedTaskBatch) -> Arc<Self> {
        Arc::new(Self {
            behavior: Mutex::new(StubBehavior::Batch(batch)),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            behavior: Mutex::new(StubBehavior::Fail),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn set_behavior(&self, behavior: StubBehavior) {
        *self.behavior.lock().unwrap() = behavior;
    }
}

#[async_trait]
impl TaskGenerator for StubGenerator {
    async fn generate_tasks(
        &self,
        context: &GenerationContext,
    ) -> Result<GeneratedTaskBatch, ProviderError> {
        self.prompts.lock().unwrap().push(context.prompt.clone());
        match &*self.behavior.lock().unwrap() {
            StubBehavior::Batch(batch) => Ok(batch.clone()),
            StubBehavior::Fail => Err(ProviderError::Api {
                status: 429,
                body: "rate limited".to_string(),
            }),
        }
    }
}

/// A small plausible batch for tests that only need a success path.
pub fn sample_batch() -> GeneratedTaskBatch {
    GeneratedTaskBatch {
        batch_title: "Login Flow".to_string(),
        tasks: vec![
            GeneratedTask {
                title: "Build login form".to_string(),
                description: "Email and password fields with validation".to_string(),
                priority: TaskPriority::High,
                status: TaskStatus::Todo,
            },
            GeneratedTask {
                title: "Wire up session backend".to_string(),
                description: "Issue a session cookie on successful login".to_string(),
                priority: TaskPriority::Medium,
                status: TaskStatus::Todo,
            },
        ],
    }
}

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Build a test `ServerConfig` with safe defaults. The OpenAI section is
/// never used because tests inject a stub generator.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3001".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            access_token_expiry_mins: 15,
        },
        openai: OpenAiConfig {
            api_key: "unused".to_string(),
            model: "gpt-4o-mini".to_string(),
            base_url: "http://127.0.0.1:0".to_string(),
            timeout_secs: 5,
        },
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool and generation stub.
pub fn build_test_app(pool: PgPool, generator: Arc<dyn TaskGenerator>) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        generator,
    };
    build_app_router(state, &config)
}

/// Create a user row and mint a valid access token for it.
pub async fn seed_user(pool: &PgPool, email: &str) -> (DbId, String) {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            email: email.to_string(),
            display_name: "Test User".to_string(),
        },
    )
    .await
    .unwrap();
    let token = generate_access_token(user.id, &test_config().jwt).unwrap();
    (user.id, token)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn get_unauthenticated(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn post_json(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn post_empty(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), None).await
}

pub async fn patch_json(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::PATCH, uri, Some(token), Some(body)).await
}

pub async fn delete(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// Collect a response body into JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = http_body_util::BodyExt::collect(response.into_body())
        .await
        .unwrap()
        .to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Assert an error response shape: expected status plus a stable error code.
pub async fn assert_error(response: Response<Body>, status: StatusCode, code: &str) {
    assert_eq!(response.status(), status);
    let json = body_json(response).await;
    assert_eq!(json["code"], code, "unexpected error body: {json}");
}
