/// Common test utilities for integration tests
///
/// This module provides shared infrastructure for integration tests:
/// - A scratch database per test context, dropped on cleanup
/// - A fully wired router with a known session secret
/// - Request and response helpers
///
/// Tests are skipped when DATABASE_URL is not set.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tasknest_api::app::{build_router, AppState};
use tasknest_api::config::{ApiConfig, Config, DatabaseConfig, SessionConfig};
use tasknest_shared::db::migrations::{drop_database, ensure_database_exists, run_migrations};
use tasknest_shared::db::pool::{close_pool, create_pool, DatabaseConfig as PoolConfig};
use sqlx::PgPool;
use tower::Service as _;
use uuid::Uuid;

/// Session secret used by every test context
pub const TEST_SESSION_SECRET: &str = "integration-test-secret-0123456789abcdef";

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: PgPool,
    pub app: axum::Router,
    database_url: String,
}

impl TestContext {
    /// Creates a new test context backed by a fresh scratch database
    ///
    /// Returns `None` when DATABASE_URL is not set, so callers can skip.
    pub async fn new() -> Option<Self> {
        let base_url = std::env::var("DATABASE_URL").ok()?;
        let database_url = scratch_url(&base_url);

        ensure_database_exists(&database_url)
            .await
            .expect("Failed to create scratch database");

        let db = create_pool(PoolConfig {
            url: database_url.clone(),
            max_connections: 5,
            ..Default::default()
        })
        .await
        .expect("Failed to connect to scratch database");

        run_migrations(&db).await.expect("Migrations failed");

        let config = Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors_origins: vec!["*".to_string()],
                production: false,
            },
            database: DatabaseConfig {
                url: database_url.clone(),
                max_connections: 5,
            },
            session: SessionConfig {
                secret: TEST_SESSION_SECRET.to_string(),
            },
        };

        let state = AppState::new(db.clone(), config);
        let app = build_router(state);

        Some(TestContext {
            db,
            app,
            database_url,
        })
    }

    /// Closes the pool and drops the scratch database
    pub async fn cleanup(self) {
        close_pool(self.db).await;
        drop_database(&self.database_url)
            .await
            .expect("Failed to drop scratch database");
    }
}

/// Swaps the database name in a connection URL for a unique scratch name
fn scratch_url(base_url: &str) -> String {
    let (without_query, query) = match base_url.split_once('?') {
        Some((head, tail)) => (head, Some(tail)),
        None => (base_url, None),
    };

    let root = match without_query.rfind('/') {
        Some(idx) => &without_query[..idx],
        None => without_query,
    };

    let name = format!("tasknest_api_test_{}", Uuid::new_v4().simple());

    match query {
        Some(q) => format!("{}/{}?{}", root, name, q),
        None => format!("{}/{}", root, name),
    }
}

/// Sends a JSON request to the app
pub async fn send_json(
    ctx: &TestContext,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> axum::response::Response {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");

    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }

    let request = builder.body(Body::from(body.to_string())).unwrap();
    ctx.app.clone().call(request).await.unwrap()
}

/// Sends a bodyless GET request to the app
pub async fn get(ctx: &TestContext, uri: &str, token: Option<&str>) -> axum::response::Response {
    let mut builder = Request::builder().method("GET").uri(uri);

    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }

    let request = builder.body(Body::empty()).unwrap();
    ctx.app.clone().call(request).await.unwrap()
}

/// Reads a response body as JSON
pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

/// Signs up a user and returns their session token
pub async fn signup_user(ctx: &TestContext, name: &str, email: &str, password: &str) -> String {
    let response = send_json(
        ctx,
        "POST",
        "/v1/auth/signup",
        None,
        serde_json::json!({
            "name": name,
            "email": email,
            "password": password,
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED, "Signup should succeed");

    let body = body_json(response).await;
    body["token"].as_str().expect("Signup should return a token").to_string()
}
