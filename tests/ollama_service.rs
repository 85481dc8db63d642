//! HTTP-level tests for the backend client against a mock server.

use std::time::Duration;

use httpmock::prelude::*;
use serde_json::json;
use tokio_util::sync::CancellationToken;

use ai_code_assist::{AssistConfig, AssistError, OllamaService};

fn config_for(server: &MockServer) -> AssistConfig {
    AssistConfig {
        base_url: server.base_url(),
        model: "test-model".into(),
        ..AssistConfig::default()
    }
}

#[tokio::test]
async fn generate_returns_response_text() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/generate")
                .body_contains("\"stream\":false")
                .body_contains("test-model");
            then.status(200).json_body(json!({ "response": "a + b;" }));
        })
        .await;

    let svc = OllamaService::new(config_for(&server)).unwrap();
    let out = svc
        .generate("complete this", &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(out, "a + b;");
    mock.assert_async().await;
}

#[tokio::test]
async fn missing_response_field_is_empty_success() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/generate");
            then.status(200).json_body(json!({ "done": true }));
        })
        .await;

    let svc = OllamaService::new(config_for(&server)).unwrap();
    let out = svc.generate("p", &CancellationToken::new()).await.unwrap();
    assert_eq!(out, "");
}

#[tokio::test]
async fn http_500_surfaces_status_and_snippet() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/generate");
            then.status(500).body("model exploded");
        })
        .await;

    let svc = OllamaService::new(config_for(&server)).unwrap();
    let err = svc
        .generate("p", &CancellationToken::new())
        .await
        .unwrap_err();

    match err {
        AssistError::HttpStatus { status, snippet, .. } => {
            assert_eq!(status.as_u16(), 500);
            assert!(snippet.contains("model exploded"));
        }
        other => panic!("expected HttpStatus, got {other:?}"),
    }
}

#[tokio::test]
async fn external_cancellation_maps_to_cancelled() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/generate");
            then.status(200)
                .delay(Duration::from_secs(5))
                .json_body(json!({ "response": "too late" }));
        })
        .await;

    let svc = OllamaService::new(config_for(&server)).unwrap();
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        trigger.cancel();
    });

    let err = svc.generate("p", &cancel).await.unwrap_err();
    assert!(matches!(err, AssistError::Cancelled));
}

#[tokio::test]
async fn timeout_floor_kicks_in_for_tiny_configs() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/generate");
            then.status(200)
                .delay(Duration::from_secs(5))
                .json_body(json!({ "response": "too late" }));
        })
        .await;

    // 1 ms requested, floored to 1000 ms; the request must still get that
    // full second before timing out.
    let cfg = AssistConfig {
        request_timeout_ms: 1,
        ..config_for(&server)
    };
    let svc = OllamaService::new(cfg).unwrap();

    let started = std::time::Instant::now();
    let err = svc
        .generate("p", &CancellationToken::new())
        .await
        .unwrap_err();
    let elapsed = started.elapsed();

    assert!(matches!(err, AssistError::Timeout(_)), "got {err:?}");
    assert!(elapsed >= Duration::from_millis(900), "timed out too early: {elapsed:?}");
}

#[tokio::test]
async fn list_models_maps_tag_details() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/tags");
            then.status(200).json_body(json!({
                "models": [
                    { "name": "m1", "details": { "family": "qwen2", "parameter_size": "7B" } },
                    { "name": "m2" }
                ]
            }));
        })
        .await;

    let svc = OllamaService::new(config_for(&server)).unwrap();
    let models = svc.list_models().await.unwrap();

    assert_eq!(models.len(), 2);
    assert_eq!(models[0].name, "m1");
    assert_eq!(models[0].family.as_deref(), Some("qwen2"));
    assert_eq!(models[0].parameter_size.as_deref(), Some("7B"));
    assert_eq!(models[1].name, "m2");
    assert!(models[1].family.is_none());
}

#[tokio::test]
async fn empty_model_list_is_a_distinct_failure() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/tags");
            then.status(200).json_body(json!({ "models": [] }));
        })
        .await;

    let svc = OllamaService::new(config_for(&server)).unwrap();
    let err = svc.list_models().await.unwrap_err();
    assert!(matches!(err, AssistError::EmptyModelList { .. }), "got {err:?}");
}

#[tokio::test]
async fn fetch_version_returns_backend_version() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/version");
            then.status(200).json_body(json!({ "version": "0.11.4" }));
        })
        .await;

    let svc = OllamaService::new(config_for(&server)).unwrap();
    assert_eq!(svc.fetch_version().await.unwrap(), "0.11.4");
}

#[tokio::test]
async fn fetch_version_without_field_is_a_decode_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/version");
            then.status(200).json_body(json!({}));
        })
        .await;

    let svc = OllamaService::new(config_for(&server)).unwrap();
    let err = svc.fetch_version().await.unwrap_err();
    assert!(matches!(err, AssistError::Decode(_)), "got {err:?}");
}
