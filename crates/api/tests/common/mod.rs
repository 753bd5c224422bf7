//! Shared fixtures for handler-level integration tests.
//!
//! Tests go through [`build_test_app`] so requests pass the same
//! middleware stack as production traffic. A reachable PostgreSQL
//! instance via `DATABASE_URL` is required; tests skip silently when it
//! is not configured.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use balcao_api::auth::jwt::JwtConfig;
use balcao_api::auth::password::hash_password;
use balcao_api::cep::CepClient;
use balcao_api::config::ServerConfig;
use balcao_api::router::build_app_router;
use balcao_api::state::AppState;
use balcao_db::models::user::CreateUser;
use balcao_db::repositories::{RoleRepo, UserRepo};
use balcao_db::DbPool;
use tower::ServiceExt;

/// Connect and migrate, or `None` when `DATABASE_URL` is not set.
pub async fn test_pool() -> Option<DbPool> {
    let url = std::env::var("DATABASE_URL").ok()?;
    let pool = balcao_db::create_pool(&url).await.ok()?;
    balcao_db::run_migrations(&pool).await.ok()?;
    Some(pool)
}

/// Configuration with a fixed signing key; nothing is read from the
/// environment.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".into(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".into()],
        request_timeout_secs: 30,
        cep_base_url: "https://viacep.com.br".into(),
        cep_timeout_secs: 5,
        max_attachment_bytes: 5 * 1024 * 1024,
        jwt: JwtConfig {
            secret: "integration-test-signing-key-0123456789".into(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        },
    }
}

/// Assemble the full application router over the given pool.
pub fn build_test_app(pool: DbPool) -> Router {
    let config = test_config();
    let cep = CepClient::new(
        config.cep_base_url.clone(),
        Duration::from_secs(config.cep_timeout_secs),
    );
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        cep: Arc::new(cep),
    };
    build_app_router(state, &config)
}

/// Issue one request, returning the status and the parsed JSON body
/// (`Null` for empty bodies).
pub async fn request(
    app: &Router,
    method: &str,
    path: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(path);
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

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };
    (status, json)
}

/// GET returning the raw body text and content type, for non-JSON
/// responses like the CSV export.
pub async fn get_raw(app: &Router, path: &str, token: &str) -> (StatusCode, String, String) {
    let request = Request::builder()
        .method("GET")
        .uri(path)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, content_type, String::from_utf8_lossy(&bytes).into_owned())
}

/// Create a user with a known password, returning its username. The
/// username carries a nanosecond suffix so runs never collide.
pub async fn seed_user(pool: &DbPool, role: &str, password: &str) -> String {
    let role_row = RoleRepo::find_by_name(pool, role)
        .await
        .unwrap()
        .expect("seeded role must exist");
    let suffix = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
    let username = format!("it-{role}-{suffix}");
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.clone(),
            email: format!("{username}@example.com"),
            password_hash: hash_password(password).unwrap(),
            role_id: role_row.id,
        },
    )
    .await
    .unwrap();
    username
}

/// Log in and return the access token.
pub async fn login(app: &Router, username: &str, password: &str) -> String {
    let (status, body) = request(
        app,
        "POST",
        "/api/v1/auth/login",
        None,
        Some(serde_json::json!({"username": username, "password": password})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    body["data"]["access_token"].as_str().unwrap().to_string()
}
