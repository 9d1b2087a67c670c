#![cfg(feature = "openai")]

use axum::{extract::State, http::HeaderMap, http::StatusCode, routing::get, routing::post, Json, Router};
use base64::Engine;
use friday_agent::backend::openai::{OpenAiRealtime, REPLY_AUDIO_MODEL};
use friday_agent::backend::{BackendError, ModelBackend};
use friday_agent::tools::{ToolSet, ToolSettings};
use friday_types::{ApiKey, ProviderId, RealtimeVoiceConfig};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        == Some("Bearer sk-test")
}

type Requests = Arc<Mutex<Vec<Value>>>;

async fn realtime_session(headers: HeaderMap, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({"error": "bad key"})));
    }
    assert_eq!(body["model"], "gpt-4o-realtime-preview");
    assert_eq!(body["voice"], "alloy");
    assert!((body["temperature"].as_f64().unwrap() - 0.8).abs() < 1e-6);
    assert_eq!(body["tools"].as_array().unwrap().len(), 3);
    (StatusCode::OK, Json(json!({"id": "sess_123", "object": "realtime.session"})))
}

/// First completion asks for the weather; the second one answers with audio.
async fn chat_completion(
    State(requests): State<Requests>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({"error": "bad key"})));
    }
    let round = {
        let mut requests = requests.lock().unwrap();
        requests.push(body.clone());
        requests.len()
    };

    if round == 1 {
        return (
            StatusCode::OK,
            Json(json!({
                "choices": [{"message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_1",
                        "type": "function",
                        "function": {"name": "get_weather", "arguments": "{\"city\":\"Paris\"}"}
                    }]
                }}]
            })),
        );
    }

    let mut wav = b"RIFF".to_vec();
    wav.resize(44, 0);
    wav.extend_from_slice(&[9, 9, 9, 9]);
    let audio = base64::engine::general_purpose::STANDARD.encode(wav);
    (
        StatusCode::OK,
        Json(json!({
            "choices": [{"message": {
                "role": "assistant",
                "content": null,
                "audio": {"id": "audio_1", "data": audio, "transcript": "It is sunny in Paris, sir."}
            }}]
        })),
    )
}

async fn setup() -> (String, Requests) {
    let requests = Requests::default();
    let app = Router::new()
        .route("/v1/realtime/sessions", post(realtime_session))
        .route("/v1/chat/completions", post(chat_completion))
        .route("/Paris", get(|| async { "Paris: ☀️ +21°C\n" }))
        .with_state(requests.clone());
    (spawn(app).await, requests)
}

fn tools(base_url: &str) -> ToolSet {
    ToolSet::standard(
        reqwest::Client::new(),
        ToolSettings {
            weather_url: base_url.to_string(),
            search_url: base_url.to_string(),
            mail: None,
        },
    )
}

#[tokio::test]
async fn test_open_then_respond_runs_tool_round() {
    let (base_url, requests) = setup().await;
    let tools = tools(&base_url);

    let mut backend = OpenAiRealtime::new(
        reqwest::Client::new(),
        &base_url,
        ApiKey::new("sk-test").unwrap(),
        RealtimeVoiceConfig::openai(),
    );
    backend.open("You are Friday.", &tools).await.unwrap();
    assert_eq!(backend.session_id(), Some("sess_123"));

    let reply = backend.respond("Greet the user.", &tools).await.unwrap();
    assert_eq!(reply.text, "It is sunny in Paris, sir.");
    assert_eq!(reply.audio, Some(vec![9, 9, 9, 9]));

    let requests = requests.lock().unwrap();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0]["model"], REPLY_AUDIO_MODEL);
    assert_eq!(requests[0]["audio"]["voice"], "alloy");

    let messages = requests[1]["messages"].as_array().unwrap();
    let tool_message = messages.last().unwrap();
    assert_eq!(tool_message["role"], "tool");
    assert_eq!(tool_message["tool_call_id"], "call_1");
    assert_eq!(tool_message["content"], "Paris: ☀️ +21°C");
}

#[tokio::test]
async fn test_open_rejected_key_surfaces_status() {
    let (base_url, _) = setup().await;

    let mut backend = OpenAiRealtime::new(
        reqwest::Client::new(),
        &base_url,
        ApiKey::new("sk-wrong").unwrap(),
        RealtimeVoiceConfig::openai(),
    );
    match backend.open("You are Friday.", &tools(&base_url)).await {
        Err(BackendError::Status {
            provider, status, ..
        }) => {
            assert_eq!(provider, ProviderId::OpenAi);
            assert_eq!(status, reqwest::StatusCode::UNAUTHORIZED);
        }
        other => panic!("expected status error, got {:?}", other),
    }
    assert_eq!(backend.session_id(), None);
}
