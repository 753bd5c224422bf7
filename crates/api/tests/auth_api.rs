//! Integration tests for login, refresh, lockout, and logout.

mod common;

use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_login_returns_session_tokens() {
    let Some(pool) = common::test_pool().await else {
        eprintln!("skipping: DATABASE_URL not set");
        return;
    };
    let app = common::build_test_app(pool.clone());
    let username = common::seed_user(&pool, "tecnico", "bancada-segura-1").await;

    let (status, body) = common::request(
        &app,
        "POST",
        "/api/v1/auth/login",
        None,
        Some(json!({"username": username, "password": "bancada-segura-1"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert!(!data["access_token"].as_str().unwrap().is_empty());
    assert!(!data["refresh_token"].as_str().unwrap().is_empty());
    assert!(data["access_expires_at"].is_string());
    assert_eq!(data["user"]["username"], username.as_str());
    assert_eq!(data["user"]["role"], "tecnico");
}

#[tokio::test]
async fn test_wrong_password_and_unknown_user_answer_alike() {
    let Some(pool) = common::test_pool().await else {
        eprintln!("skipping: DATABASE_URL not set");
        return;
    };
    let app = common::build_test_app(pool.clone());
    let username = common::seed_user(&pool, "comercial", "senha-correta-9").await;

    let (wrong_status, wrong_body) = common::request(
        &app,
        "POST",
        "/api/v1/auth/login",
        None,
        Some(json!({"username": username, "password": "senha-errada"})),
    )
    .await;
    let (unknown_status, unknown_body) = common::request(
        &app,
        "POST",
        "/api/v1/auth/login",
        None,
        Some(json!({"username": "conta-que-nao-existe", "password": "senha-errada"})),
    )
    .await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    // Uniform answer: the response must not reveal whether the account exists.
    assert_eq!(wrong_body["error"], unknown_body["error"]);
}

#[tokio::test]
async fn test_account_goes_on_hold_after_repeated_failures() {
    let Some(pool) = common::test_pool().await else {
        eprintln!("skipping: DATABASE_URL not set");
        return;
    };
    let app = common::build_test_app(pool.clone());
    let username = common::seed_user(&pool, "tecnico", "senha-valida-7").await;

    for _ in 0..5 {
        let (status, _) = common::request(
            &app,
            "POST",
            "/api/v1/auth/login",
            None,
            Some(json!({"username": username, "password": "chute-errado"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    // The right password no longer helps while the account is on hold.
    let (status, body) = common::request(
        &app,
        "POST",
        "/api/v1/auth/login",
        None,
        Some(json!({"username": username, "password": "senha-valida-7"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN, "expected hold, got: {body}");
}

#[tokio::test]
async fn test_refresh_rotates_the_token() {
    let Some(pool) = common::test_pool().await else {
        eprintln!("skipping: DATABASE_URL not set");
        return;
    };
    let app = common::build_test_app(pool.clone());
    let username = common::seed_user(&pool, "comercial", "senha-correta-3").await;

    let (_, body) = common::request(
        &app,
        "POST",
        "/api/v1/auth/login",
        None,
        Some(json!({"username": username, "password": "senha-correta-3"})),
    )
    .await;
    let first_refresh = body["data"]["refresh_token"].as_str().unwrap().to_string();

    let (status, body) = common::request(
        &app,
        "POST",
        "/api/v1/auth/refresh",
        None,
        Some(json!({"refresh_token": first_refresh})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let second_refresh = body["data"]["refresh_token"].as_str().unwrap();
    assert_ne!(second_refresh, first_refresh);

    // The spent token must not work a second time.
    let (status, _) = common::request(
        &app,
        "POST",
        "/api/v1/auth/refresh",
        None,
        Some(json!({"refresh_token": first_refresh})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_without_token_is_401() {
    let Some(pool) = common::test_pool().await else {
        eprintln!("skipping: DATABASE_URL not set");
        return;
    };
    let app = common::build_test_app(pool);

    let (status, _) = common::request(&app, "POST", "/api/v1/auth/logout", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
