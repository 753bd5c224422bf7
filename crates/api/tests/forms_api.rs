//! Integration tests for form submission, listing, and export.

mod common;

use axum::http::StatusCode;
use balcao_core::mail::MAX_DISPATCH_URL_LEN;
use balcao_db::models::email_config::UpsertEmailConfig;
use balcao_db::repositories::EmailConfigRepo;
use serde_json::json;

fn service_submission(razao_social: &str) -> serde_json::Value {
    json!({
        "client": {
            "razao_social": razao_social,
            "documento": "11.222.333/0001-81",
            "contato": "Maria Souza",
            "email": "maria@santaclara.com.br",
            "telefone": "(11) 98765-4321"
        },
        "address": {
            "cep": "01310-100",
            "logradouro": "Av. Paulista",
            "numero": "1578",
            "bairro": "Bela Vista",
            "cidade": "São Paulo",
            "uf": "SP"
        },
        "details": {
            "form_type": "SERVICE",
            "modelo": "UX-500",
            "numero_serie": "SN-0042",
            "defeito": "display apagado"
        }
    })
}

#[tokio::test]
async fn test_submit_returns_entry_attachments_and_mail_link() {
    let Some(pool) = common::test_pool().await else {
        eprintln!("skipping: DATABASE_URL not set");
        return;
    };
    let app = common::build_test_app(pool.clone());
    let username = common::seed_user(&pool, "tecnico", "senha-de-teste-1").await;
    let token = common::login(&app, &username, "senha-de-teste-1").await;

    EmailConfigRepo::upsert(
        &pool,
        "SERVICE",
        &UpsertEmailConfig {
            recipients: vec!["assistencia@empresa.com.br".into()],
            cc: vec![],
            subject_prefix: "[Balcão]".into(),
            scheme: "mailto".into(),
        },
    )
    .await
    .unwrap();

    let mut body = service_submission("Hospital Santa Clara Ltda");
    body["attachments"] = json!([{
        "file_name": "laudo.pdf",
        "mime_type": "application/pdf",
        "data_base64": "dGVzdA=="
    }]);

    let (status, body) =
        common::request(&app, "POST", "/api/v1/forms", Some(&token), Some(body)).await;

    assert_eq!(status, StatusCode::CREATED, "submit failed: {body}");
    let data = &body["data"];
    assert!(data["entry"]["id"].as_i64().unwrap() > 0);
    assert_eq!(data["entry"]["form_type"], "SERVICE");
    assert_eq!(data["attachments"].as_array().unwrap().len(), 1);
    assert_eq!(data["attachments"][0]["file_name"], "laudo.pdf");

    let url = data["mail"]["url"].as_str().expect("mail link composed");
    assert!(url.starts_with("mailto:"));
    assert!(url.len() <= MAX_DISPATCH_URL_LEN);
}

#[tokio::test]
async fn test_submit_with_bad_document_is_rejected_and_not_stored() {
    let Some(pool) = common::test_pool().await else {
        eprintln!("skipping: DATABASE_URL not set");
        return;
    };
    let app = common::build_test_app(pool.clone());
    let username = common::seed_user(&pool, "tecnico", "senha-de-teste-2").await;
    let token = common::login(&app, &username, "senha-de-teste-2").await;

    let marker = format!(
        "Marcador Rejeitado {}",
        chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default()
    );
    let mut body = service_submission(&marker);
    // Check digits do not match.
    body["client"]["documento"] = json!("11.222.333/0001-99");

    let (status, _) =
        common::request(&app, "POST", "/api/v1/forms", Some(&token), Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // A rejected submission must leave no row behind.
    let path = format!("/api/v1/forms?search={}", marker.replace(' ', "%20"));
    let (status, body) = common::request(&app, "GET", &path, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_export_csv_has_flat_columns() {
    let Some(pool) = common::test_pool().await else {
        eprintln!("skipping: DATABASE_URL not set");
        return;
    };
    let app = common::build_test_app(pool.clone());
    let username = common::seed_user(&pool, "comercial", "senha-de-teste-4").await;
    let token = common::login(&app, &username, "senha-de-teste-4").await;

    let submission = service_submission("Clínica Exporta Ltda");
    let (status, _) =
        common::request(&app, "POST", "/api/v1/forms", Some(&token), Some(submission)).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, content_type, csv) =
        common::get_raw(&app, "/api/v1/forms/export?form_type=SERVICE", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type, "text/csv; charset=utf-8");

    let header = csv.lines().next().unwrap();
    assert!(header.starts_with("id,form_type,created_at"));
    assert!(csv.lines().count() >= 2, "exported entry must appear");
}

#[tokio::test]
async fn test_unknown_export_format_is_400() {
    let Some(pool) = common::test_pool().await else {
        eprintln!("skipping: DATABASE_URL not set");
        return;
    };
    let app = common::build_test_app(pool.clone());
    let username = common::seed_user(&pool, "tecnico", "senha-de-teste-5").await;
    let token = common::login(&app, &username, "senha-de-teste-5").await;

    let (status, _) =
        common::request(&app, "GET", "/api/v1/forms/export?format=xml", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
