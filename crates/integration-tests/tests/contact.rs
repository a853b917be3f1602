//! Contact form submissions.

#![allow(clippy::unwrap_used)]

use reqwest::StatusCode;
use serde_json::json;

use fitova_integration_tests::{TestApp, envelope};

#[tokio::test]
async fn valid_message_is_stored() {
    let app = TestApp::spawn().await;

    let response = app
        .post(
            "/api/contact",
            &json!({
                "name": "Salma",
                "email": "Salma@Example.com",
                "subject": "Sizing",
                "message": "Does the linen shirt run small?"
            }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = envelope(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["is_read"], false);

    let stored = app.store.contact_messages().await;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].name, "Salma");
}

#[tokio::test]
async fn invalid_email_is_rejected_without_a_write() {
    let app = TestApp::spawn().await;

    let response = app
        .post(
            "/api/contact",
            &json!({ "name": "Salma", "email": "not-an-email", "message": "Hi" }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(envelope(response).await["success"], false);
    assert!(app.store.contact_messages().await.is_empty());
}

#[tokio::test]
async fn malformed_json_uses_error_envelope() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .post(app.url("/api/contact"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(envelope(response).await["success"], false);
}
