//! Integration tests for notification publishing and read tracking.

mod common;

use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_publishing_requires_the_admin_role() {
    let Some(pool) = common::test_pool().await else {
        eprintln!("skipping: DATABASE_URL not set");
        return;
    };
    let app = common::build_test_app(pool.clone());
    let username = common::seed_user(&pool, "tecnico", "senha-de-teste-6").await;
    let token = common::login(&app, &username, "senha-de-teste-6").await;

    let (status, _) = common::request(
        &app,
        "POST",
        "/api/v1/admin/notifications",
        Some(&token),
        Some(json!({"title": "Inventário anual", "message": "Balcão fechado sexta."})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_mark_read_on_unknown_notification_is_404() {
    let Some(pool) = common::test_pool().await else {
        eprintln!("skipping: DATABASE_URL not set");
        return;
    };
    let app = common::build_test_app(pool.clone());
    let username = common::seed_user(&pool, "tecnico", "senha-de-teste-7").await;
    let token = common::login(&app, &username, "senha-de-teste-7").await;

    let (status, _) = common::request(
        &app,
        "POST",
        "/api/v1/notifications/999999999/read",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_mark_read_lifecycle() {
    let Some(pool) = common::test_pool().await else {
        eprintln!("skipping: DATABASE_URL not set");
        return;
    };
    let app = common::build_test_app(pool.clone());
    let admin = common::seed_user(&pool, "admin", "senha-de-admin-1").await;
    let admin_token = common::login(&app, &admin, "senha-de-admin-1").await;
    let reader = common::seed_user(&pool, "comercial", "senha-de-teste-8").await;
    let reader_token = common::login(&app, &reader, "senha-de-teste-8").await;

    let (status, body) = common::request(
        &app,
        "POST",
        "/api/v1/admin/notifications",
        Some(&admin_token),
        Some(json!({"title": "Manutenção programada", "message": "Sistema fora do ar domingo.", "kind": "maintenance"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["data"]["id"].as_i64().unwrap();

    // Marking an active notification read is idempotent.
    for _ in 0..2 {
        let (status, _) = common::request(
            &app,
            "POST",
            &format!("/api/v1/notifications/{id}/read"),
            Some(&reader_token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    // A deactivated notification stops being markable.
    let (status, _) = common::request(
        &app,
        "DELETE",
        &format!("/api/v1/admin/notifications/{id}"),
        Some(&admin_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = common::request(
        &app,
        "POST",
        &format!("/api/v1/notifications/{id}/read"),
        Some(&reader_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
