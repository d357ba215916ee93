// SPDX-FileCopyrightText: 2026 Raad Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Router tests driven through `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use raad_config::EngineConfig;
use raad_core::DatasetName;
use raad_gateway::{AuthConfig, GatewayState, HealthState, PreviewDefaults, router};
use raad_query::EngineStatus;
use raad_test_utils::TestHarness;
use serde_json::{Value, json};
use tower::ServiceExt;

fn app_with(harness: &TestHarness, bearer_token: Option<&str>) -> Router {
    router(GatewayState {
        registry: Arc::new(harness.registry(4)),
        engine_status: EngineStatus::from_config(&EngineConfig::default(), None),
        preview: PreviewDefaults { rows: 2, cols: 3 },
        auth: AuthConfig {
            bearer_token: bearer_token.map(str::to_string),
        },
        health: HealthState::default(),
    })
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn create_session(app: &Router) -> String {
    let (status, body) = send(app, json_request("POST", "/v1/sessions", json!({}))).await;
    assert_eq!(status, StatusCode::CREATED);
    body["session_id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_is_public() {
    let harness = TestHarness::builder().build().unwrap();
    let app = app_with(&harness, Some("secret"));
    let (status, body) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn api_requires_matching_bearer_token() {
    let harness = TestHarness::builder().build().unwrap();
    let app = app_with(&harness, Some("secret"));

    let (status, _) = send(&app, get("/v1/datasets")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let request = Request::builder()
        .uri("/v1/datasets")
        .header(header::AUTHORIZATION, "Bearer wrong")
        .body(Body::empty())
        .unwrap();
    assert_eq!(send(&app, request).await.0, StatusCode::UNAUTHORIZED);

    let request = Request::builder()
        .uri("/v1/datasets")
        .header(header::AUTHORIZATION, "Bearer secret")
        .body(Body::empty())
        .unwrap();
    assert_eq!(send(&app, request).await.0, StatusCode::OK);
}

#[tokio::test]
async fn dataset_listing_and_preview() {
    let harness = TestHarness::builder().build().unwrap();
    let app = app_with(&harness, None);

    let (status, body) = send(&app, get("/v1/datasets")).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body["datasets"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["filings", "facts", "ratios", "analytics"]);

    let (status, body) = send(&app, get("/v1/datasets/analytics/preview")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["table"]["rows"].as_array().unwrap().len(), 2);
    assert_eq!(body["table"]["columns"].as_array().unwrap().len(), 3);
    assert_eq!(body["stats"]["rows"], 4);
    assert_eq!(body["stats"]["companies"], 3);

    let (status, body) = send(&app, get("/v1/datasets/facts/columns")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["kind"], "metrics");
    assert!(body["metrics"].as_array().unwrap().contains(&json!("revenue")));

    let (status, _) = send(&app, get("/v1/datasets/unknown/columns")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn info_and_examples() {
    let harness = TestHarness::builder().build().unwrap();
    let app = app_with(&harness, None);

    let (status, body) = send(&app, get("/v1/info")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["store"]["companies"], 3);
    assert_eq!(body["engine"]["model_display"], "Gemini 2.0 Flash");
    assert_eq!(body["engine"]["configured"], false);

    let (status, body) = send(&app, get("/v1/examples")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["examples"].as_array().unwrap().len(), 8);
}

#[tokio::test]
async fn chat_turn_round_trip() {
    let harness = TestHarness::builder()
        .with_answers(vec![json!({"value": 1234567890, "code": "df['revenue'].sum()"})])
        .build()
        .unwrap();
    let app = app_with(&harness, None);
    let id = create_session(&app).await;

    let (status, body) = send(
        &app,
        json_request("PUT", &format!("/v1/sessions/{id}/dataset"), json!({"dataset": "facts"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["dataset"], "facts");

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            &format!("/v1/sessions/{id}/messages"),
            json!({"question": "Total revenue?"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["display"], json!({"type": "text", "value": "1234567890"}));
    assert_eq!(body["code"], "df['revenue'].sum()");
    assert_eq!(harness.engine.calls().await[0].dataset, DatasetName::Facts);

    let (status, body) = send(&app, get(&format!("/v1/sessions/{id}/history?limit=1"))).await;
    assert_eq!(status, StatusCode::OK);
    let messages = body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["role"], "assistant");

    let response = app
        .clone()
        .oneshot(get(&format!("/v1/sessions/{id}/export")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let disposition = response.headers()[header::CONTENT_DISPOSITION]
        .to_str()
        .unwrap()
        .to_string();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let markdown = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(markdown.contains("> Total revenue?"));

    // The file name is stamped with the same UTC instant as the transcript header.
    let exported = markdown
        .lines()
        .find_map(|l| l.strip_prefix("Exported: "))
        .unwrap();
    let stamp: String = exported.chars().filter(char::is_ascii_digit).collect();
    let expected = format!("chat_history_{}_{}.md", &stamp[..8], &stamp[8..]);
    assert!(disposition.contains(&expected), "{disposition} vs {expected}");

    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/v1/sessions/{id}/history"))
        .body(Body::empty())
        .unwrap();
    assert_eq!(send(&app, request).await.0, StatusCode::NO_CONTENT);
    let (_, body) = send(&app, get(&format!("/v1/sessions/{id}/history"))).await;
    assert!(body["messages"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn error_mapping() {
    let harness = TestHarness::builder().build().unwrap();
    let app = app_with(&harness, None);

    let (status, body) = send(
        &app,
        json_request("POST", "/v1/sessions/missing/messages", json!({"question": "q"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("missing"));

    let id = create_session(&app).await;
    let (status, _) = send(
        &app,
        json_request("POST", &format!("/v1/sessions/{id}/messages"), json!({"question": "  "})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        json_request("POST", "/v1/sessions", json!({"dataset": "unknown"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn missing_data_is_service_unavailable() {
    let harness = TestHarness::builder()
        .without_dataset(DatasetName::Ratios)
        .build()
        .unwrap();
    let app = app_with(&harness, None);
    let (status, body) = send(&app, get("/v1/datasets")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["error"].as_str().unwrap().contains("ratios"));
}

#[tokio::test]
async fn session_limit_is_too_many_requests() {
    let harness = TestHarness::builder().build().unwrap();
    let app = app_with(&harness, None);
    for _ in 0..4 {
        create_session(&app).await;
    }
    let (status, _) = send(&app, json_request("POST", "/v1/sessions", json!({}))).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn failed_turn_reports_error_type() {
    let harness = TestHarness::builder()
        .with_error("429 Too Many Requests")
        .build()
        .unwrap();
    let app = app_with(&harness, None);
    let id = create_session(&app).await;

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            &format!("/v1/sessions/{id}/messages"),
            json!({"question": "Top 5 by revenue"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["display"],
        json!({"type": "text", "value": "Error: 429 Too Many Requests"})
    );
    assert_eq!(body["error_type"], "rate_limit");

    let (_, body) = send(&app, get(&format!("/v1/sessions/{id}/history?limit=1"))).await;
    assert_eq!(body["messages"][0]["metadata"]["error_type"], "rate_limit");
}

#[tokio::test]
async fn successful_turn_omits_error_type() {
    let harness = TestHarness::builder()
        .with_answers(vec![json!("fine")])
        .build()
        .unwrap();
    let app = app_with(&harness, None);
    let id = create_session(&app).await;
    let (_, body) = send(
        &app,
        json_request(
            "POST",
            &format!("/v1/sessions/{id}/messages"),
            json!({"question": "How many sectors?"}),
        ),
    )
    .await;
    assert!(body.get("error_type").is_none());
}

#[tokio::test]
async fn favorites_and_recent_queries() {
    let harness = TestHarness::builder()
        .with_answers(vec![json!("ok")])
        .build()
        .unwrap();
    let app = app_with(&harness, None);
    let id = create_session(&app).await;
    let favorites = format!("/v1/sessions/{id}/favorites");

    let (status, body) = send(
        &app,
        json_request("POST", &favorites, json!({"query": "Top 10  by revenue"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["favorites"], json!(["Top 10 by revenue"]));

    let (status, _) = send(
        &app,
        json_request("POST", &favorites, json!({"query": "Top 10 by revenue"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, json_request("POST", &favorites, json!({"query": "ab"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, get(&favorites)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["favorites"].as_array().unwrap().len(), 1);

    let delete = |query: &str| {
        Request::builder()
            .method("DELETE")
            .uri(format!("{favorites}?query={}", query.replace(' ', "%20")))
            .body(Body::empty())
            .unwrap()
    };
    assert_eq!(send(&app, delete("Top 10 by revenue")).await.0, StatusCode::NO_CONTENT);
    assert_eq!(send(&app, delete("Top 10 by revenue")).await.0, StatusCode::NOT_FOUND);

    send(
        &app,
        json_request(
            "POST",
            &format!("/v1/sessions/{id}/messages"),
            json!({"question": "Net profit 2024"}),
        ),
    )
    .await;
    let (status, body) = send(&app, get(&format!("/v1/sessions/{id}/recent"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["queries"][0]["query"], "Net profit 2024");
    assert_eq!(body["queries"][0]["dataset"], "analytics");
    assert!(body["queries"][0]["at"].is_string());

    let (status, _) = send(&app, get("/v1/sessions/missing/favorites")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
