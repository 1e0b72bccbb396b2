//! Integration tests for the Gemini chat nodes
//!
//! Each test drives a node through the host contract (`supply_data` on a
//! `StaticHost`) against a wiremock server standing in for the API.

use gemini_nodes_rs::genai::logger::{LogSink, NodeLogger};
use gemini_nodes_rs::genai::model::rest::RestChatModel;
use gemini_nodes_rs::genai::model::{ChatModel, ChatModelConfig, GenerationConfig};
use gemini_nodes_rs::genai::{Message, NodeError};
use gemini_nodes_rs::nodes::{
    LmChatGoogleGeminiPlus, LmChatGoogleGeminiProxy, LmChatGoogleGeminiRest, NodeType, StaticHost,
    GOOGLE_PALM_API,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Helpers
// ============================================================================

const API_KEY: &str = "test-key";

fn host_for(server_uri: &str, parameters: Value) -> StaticHost {
    StaticHost::new(parameters).with_credentials(
        GOOGLE_PALM_API,
        json!({ "apiKey": API_KEY, "host": server_uri }),
    )
}

fn text_response(text: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    }))
}

fn rest_generation_config() -> Value {
    json!({
        "maxOutputTokens": 2048,
        "temperature": 0.4,
        "topK": 32,
        "topP": 1.0
    })
}

/// Sink that keeps every line written through it
#[derive(Default)]
struct CapturingSink {
    lines: Mutex<Vec<String>>,
}

impl LogSink for CapturingSink {
    fn write(&self, _level: log::Level, line: &str) {
        self.lines.lock().unwrap().push(line.to_string());
    }
}

// ============================================================================
// REST node
// ============================================================================

#[tokio::test]
async fn rest_node_posts_normalized_prompt_with_retrieval_tool() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-1.5-pro:generateContent"))
        .and(query_param("key", API_KEY))
        .and(body_json(json!({
            "contents": [{ "parts": [{ "text": "first turn\nsecond turn" }] }],
            "generationConfig": rest_generation_config(),
            "tools": [{ "google_search_retrieval": {} }]
        })))
        .respond_with(text_response("Hello from Gemini"))
        .expect(1)
        .mount(&server)
        .await;

    let host = host_for(
        &server.uri(),
        json!({ "modelName": "models/gemini-1.5-pro", "enableSearch": true }),
    );
    let supplied = LmChatGoogleGeminiRest::new()
        .supply_data(&host, 0)
        .await
        .unwrap();

    let input = Message::from(json!([
        { "content": "first turn" },
        { "text": "second turn" }
    ]));
    let text = supplied.response.call(&input).await.unwrap();
    assert_eq!(text, "Hello from Gemini");
}

#[tokio::test]
async fn rest_node_forwards_stored_options_unchanged() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-1.5-pro:generateContent"))
        .and(body_json(json!({
            "contents": [{ "parts": [{ "text": "Hi" }] }],
            "generationConfig": { "topK": 32.5, "maxOutputTokens": 1024.5, "temperature": "0.4" }
        })))
        .respond_with(text_response("ok"))
        .expect(1)
        .mount(&server)
        .await;

    let host = host_for(
        &server.uri(),
        json!({
            "modelName": "models/gemini-1.5-pro",
            "options": { "topK": 32.5, "maxOutputTokens": 1024.5, "temperature": "0.4" }
        }),
    );
    let supplied = LmChatGoogleGeminiRest::new()
        .supply_data(&host, 0)
        .await
        .unwrap();

    let text = supplied.response.call(&Message::from("Hi")).await.unwrap();
    assert_eq!(text, "ok");
}

#[tokio::test]
async fn rest_node_omits_tools_and_safety_when_not_configured() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.0-pro:generateContent"))
        .and(body_json(json!({
            "contents": [{ "parts": [{ "text": "Hi" }] }],
            "generationConfig": rest_generation_config()
        })))
        .respond_with(text_response("ok"))
        .expect(1)
        .mount(&server)
        .await;

    let host = host_for(
        &server.uri(),
        json!({
            "modelName": "models/gemini-2.0-pro",
            "enableSearch": false,
            "options": { "maxOutputTokens": 2048, "temperature": 0.4, "topK": 32, "topP": 1 }
        }),
    );
    let supplied = LmChatGoogleGeminiRest::new()
        .supply_data(&host, 0)
        .await
        .unwrap();

    assert_eq!(supplied.response.call(&Message::from("Hi")).await.unwrap(), "ok");
}

#[tokio::test]
async fn rest_node_sends_safety_settings_and_google_search() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.0-flash:generateContent"))
        .and(body_json(json!({
            "contents": [{ "parts": [{ "text": "from value" }] }],
            "generationConfig": { "temperature": 0.1 },
            "safetySettings": [
                { "category": "HARM_CATEGORY_HARASSMENT", "threshold": "BLOCK_NONE" }
            ],
            "tools": [{ "google_search": {} }]
        })))
        .respond_with(text_response("safe"))
        .expect(1)
        .mount(&server)
        .await;

    let host = host_for(
        &server.uri(),
        json!({
            "modelName": "models/gemini-2.0-flash",
            "enableSearch": true,
            "options": {
                "temperature": 0.1,
                "safetySettings": { "values": [
                    { "category": "HARM_CATEGORY_HARASSMENT", "threshold": "BLOCK_NONE" }
                ] }
            }
        }),
    );
    let supplied = LmChatGoogleGeminiRest::new()
        .supply_data(&host, 0)
        .await
        .unwrap();

    let input = Message::from(json!({ "value": "from value" }));
    assert_eq!(supplied.response.call(&input).await.unwrap(), "safe");
}

#[tokio::test]
async fn rest_node_sends_empty_tool_for_unrecognized_version() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-1.0-pro:generateContent"))
        .and(body_json(json!({
            "contents": [{ "parts": [{ "text": "q" }] }],
            "generationConfig": rest_generation_config(),
            "tools": [{}]
        })))
        .respond_with(text_response("no search"))
        .expect(1)
        .mount(&server)
        .await;

    let host = host_for(&server.uri(), json!({ "enableSearch": true }));
    let supplied = LmChatGoogleGeminiRest::new()
        .supply_data(&host, 0)
        .await
        .unwrap();

    assert_eq!(
        supplied.response.call(&Message::from("q")).await.unwrap(),
        "no search"
    );
}

#[tokio::test]
async fn adapter_reuses_frozen_configuration() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-1.5-pro:generateContent"))
        .and(body_json(json!({
            "contents": [{ "parts": [{ "text": "same" }] }],
            "generationConfig": { "maxOutputTokens": 100 }
        })))
        .respond_with(text_response("again"))
        .expect(2)
        .mount(&server)
        .await;

    let mut host = host_for(
        &server.uri(),
        json!({ "modelName": "models/gemini-1.5-pro", "options": { "maxOutputTokens": 100 } }),
    );
    let supplied = LmChatGoogleGeminiRest::new()
        .supply_data(&host, 0)
        .await
        .unwrap();

    // Later parameter changes do not reach an existing adapter
    host.set_parameter("options", json!({ "maxOutputTokens": 5 }));

    for _ in 0..2 {
        let text = supplied.response.call(&Message::from("same")).await.unwrap();
        assert_eq!(text, "again");
    }
}

// ============================================================================
// Error propagation
// ============================================================================

#[tokio::test]
async fn api_error_is_returned_without_retry() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-1.5-pro:generateContent"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .expect(1)
        .mount(&server)
        .await;

    let host = host_for(&server.uri(), json!({ "modelName": "models/gemini-1.5-pro" }));
    let supplied = LmChatGoogleGeminiRest::new()
        .supply_data(&host, 0)
        .await
        .unwrap();

    let err = supplied
        .response
        .call(&Message::from("hello"))
        .await
        .unwrap_err();
    match err {
        NodeError::Api { status, message } => {
            assert_eq!(status, 503);
            assert_eq!(message, "overloaded");
        }
        other => panic!("Expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn transport_error_propagates_original_error() {
    let uri = {
        let server = MockServer::start().await;
        server.uri()
    };

    let host = host_for(&uri, json!({ "modelName": "models/gemini-1.5-pro" }));
    let supplied = LmChatGoogleGeminiRest::new()
        .supply_data(&host, 0)
        .await
        .unwrap();

    let err = supplied
        .response
        .call(&Message::from("hello"))
        .await
        .unwrap_err();
    assert!(err.is_transport());
    match err {
        NodeError::Http(inner) => assert!(inner.is_connect() || inner.is_request()),
        other => panic!("Expected Http error, got {:?}", other),
    }
}

#[tokio::test]
async fn transport_timeout_hits_endpoint_once() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-1.5-pro:generateContent"))
        .respond_with(text_response("too late").set_delay(Duration::from_secs(5)))
        .expect(1)
        .mount(&server)
        .await;

    let client = reqwest::Client::builder()
        .timeout(Duration::from_millis(200))
        .build()
        .unwrap();
    let config = ChatModelConfig {
        model: "models/gemini-1.5-pro".to_string(),
        generation: GenerationConfig::new(2048, 0.4, 32, 1.0),
        safety_settings: None,
        enable_search: false,
    };
    let model = RestChatModel::new(
        client,
        API_KEY,
        server.uri(),
        config,
        NodeLogger::disabled("timeout"),
    );

    let err = model.call(&Message::from("hello")).await.unwrap_err();
    match &err {
        NodeError::Http(inner) => assert!(inner.is_timeout()),
        other => panic!("Expected Http timeout, got {:?}", other),
    }

    server.verify().await;
}

#[tokio::test]
async fn response_without_text_is_invalid() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "candidates": [{ "finishReason": "SAFETY" }] })),
        )
        .mount(&server)
        .await;

    let host = host_for(&server.uri(), json!({}));
    let supplied = LmChatGoogleGeminiRest::new()
        .supply_data(&host, 0)
        .await
        .unwrap();

    let err = supplied
        .response
        .call(&Message::from("hello"))
        .await
        .unwrap_err();
    assert!(matches!(err, NodeError::InvalidResponse(ref m) if m.contains("SAFETY")));
}

// ============================================================================
// SDK-style node
// ============================================================================

#[tokio::test]
async fn plus_node_uses_typed_request_and_joins_text() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.0-flash:generateContent"))
        .and(header("x-goog-api-key", API_KEY))
        .and(body_json(json!({
            "contents": [{ "role": "user", "parts": [{ "text": "Tell me a joke" }] }],
            "generationConfig": {
                "maxOutputTokens": 1024,
                "temperature": 0.7,
                "topK": 40,
                "topP": 0.9
            },
            "tools": [{ "googleSearch": {} }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": "Why " }, { "text": "not?" }] }
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let host = host_for(
        &server.uri(),
        json!({ "modelName": "models/gemini-2.0-flash", "enableSearch": true }),
    );
    let supplied = LmChatGoogleGeminiPlus::new()
        .supply_data(&host, 0)
        .await
        .unwrap();

    let text = supplied
        .response
        .call(&Message::from("Tell me a joke"))
        .await
        .unwrap();
    assert_eq!(text, "Why not?");
}

#[tokio::test]
async fn plus_node_returns_empty_string_without_text() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
        .mount(&server)
        .await;

    let host = host_for(&server.uri(), json!({}));
    let supplied = LmChatGoogleGeminiPlus::new()
        .supply_data(&host, 0)
        .await
        .unwrap();

    assert_eq!(supplied.response.call(&Message::from("hi")).await.unwrap(), "");
}

// ============================================================================
// Proxy node logging
// ============================================================================

#[tokio::test]
async fn proxy_node_debug_logging_tags_every_line() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-1.5-pro:generateContent"))
        .respond_with(text_response("logged"))
        .mount(&server)
        .await;

    let sink = Arc::new(CapturingSink::default());
    let node = LmChatGoogleGeminiProxy::new()
        .with_proxy(None)
        .with_log_sink(sink.clone());
    let host = host_for(
        &server.uri(),
        json!({ "modelName": "models/gemini-1.5-pro", "debug": true }),
    );

    let supplied = node.supply_data(&host, 0).await.unwrap();
    let text = supplied.response.call(&Message::from("hi")).await.unwrap();
    assert_eq!(text, "logged");

    let lines = sink.lines.lock().unwrap();
    // supply, request body, response
    assert_eq!(lines.len(), 3);
    for line in lines.iter() {
        assert!(line.starts_with('['));
        assert!(line.contains("Z] [lmChatGoogleGeminiProxy]\n"));
    }
    assert!(lines[1].contains("\"generationConfig\""));
}

#[tokio::test]
async fn proxy_node_without_debug_writes_nothing() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let sink = Arc::new(CapturingSink::default());
    let node = LmChatGoogleGeminiProxy::new()
        .with_proxy(None)
        .with_log_sink(sink.clone());
    let host = host_for(&server.uri(), json!({}));

    let supplied = node.supply_data(&host, 0).await.unwrap();
    assert!(supplied.response.call(&Message::from("hi")).await.is_err());
    assert!(sink.lines.lock().unwrap().is_empty());
}

#[tokio::test]
async fn proxy_node_logs_errors_before_returning_them() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_string("bad request"))
        .expect(1)
        .mount(&server)
        .await;

    let sink = Arc::new(CapturingSink::default());
    let node = LmChatGoogleGeminiProxy::new()
        .with_proxy(None)
        .with_log_sink(sink.clone());
    let host = host_for(&server.uri(), json!({ "debug": true }));

    let supplied = node.supply_data(&host, 0).await.unwrap();
    let err = supplied
        .response
        .call(&Message::from("hi"))
        .await
        .unwrap_err();
    assert!(matches!(err, NodeError::Api { status: 400, .. }));

    let lines = sink.lines.lock().unwrap();
    let last = lines.last().unwrap();
    assert!(last.contains("Gemini request failed:"));
    assert!(last.contains("bad request"));
}

// ============================================================================
// Model listing
// ============================================================================

#[tokio::test]
async fn load_options_lists_sorted_chat_models() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1beta/models"))
        .and(query_param("key", API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "models": [
                { "name": "models/gemini-2.0-flash", "description": "Fast" },
                { "name": "models/text-embedding-004", "description": "Embeddings" },
                { "name": "models/gemini-1.5-pro", "description": "Pro" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let host = host_for(&server.uri(), json!({}));
    let options = LmChatGoogleGeminiPlus::new()
        .load_options("modelName", &host)
        .await
        .unwrap();

    let names: Vec<&str> = options.iter().map(|o| o.name.as_str()).collect();
    assert_eq!(names, vec!["models/gemini-1.5-pro", "models/gemini-2.0-flash"]);
    assert_eq!(options[0].description.as_deref(), Some("Pro"));
}
