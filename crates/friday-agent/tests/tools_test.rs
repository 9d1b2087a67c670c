use axum::{
    extract::{Path, Query},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use friday_agent::tools::{GetWeather, SearchWeb, Tool, ToolError, ToolSet, ToolSettings};
use serde_json::json;
use std::collections::HashMap;

async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn weather(
    Path(city): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> (StatusCode, String) {
    if query.get("format").map(String::as_str) != Some("3") {
        return (StatusCode::BAD_REQUEST, "unexpected format".to_string());
    }
    match city.as_str() {
        "Berlin" => (StatusCode::OK, "Berlin: ⛅️ +12°C\n".to_string()),
        "Kansas City/MO" => (StatusCode::OK, "Kansas City/MO: ☀️ +25°C\n".to_string()),
        _ => (StatusCode::NOT_FOUND, "Unknown location".to_string()),
    }
}

async fn instant_answer(Query(query): Query<HashMap<String, String>>) -> Json<serde_json::Value> {
    assert_eq!(query.get("format").map(String::as_str), Some("json"));
    match query.get("q").map(String::as_str) {
        Some("tokio") => Json(json!({
            "Heading": "Tokio",
            "AbstractText": "Tokio is an asynchronous runtime for Rust.",
            "AbstractURL": "https://tokio.rs",
            "RelatedTopics": [
                {"Text": "Rust programming language", "FirstURL": "https://www.rust-lang.org"},
                {"Name": "See also", "Topics": [
                    {"Text": "async-std", "FirstURL": "https://async.rs"}
                ]}
            ]
        })),
        _ => Json(json!({"Heading": "", "AbstractText": "", "RelatedTopics": []})),
    }
}

async fn setup() -> String {
    let app = Router::new()
        .route("/{city}", get(weather))
        .route("/", get(instant_answer));
    spawn(app).await
}

#[tokio::test]
async fn test_weather_returns_summary_line() {
    let base_url = setup().await;
    let tool = GetWeather::new(reqwest::Client::new(), base_url);

    let output = tool.call(json!({"city": "Berlin"})).await.unwrap();
    assert_eq!(output, "Berlin: ⛅️ +12°C");
}

#[tokio::test]
async fn test_weather_city_reaches_server_as_one_segment() {
    let base_url = setup().await;
    let tool = GetWeather::new(reqwest::Client::new(), base_url);

    let output = tool.call(json!({"city": "Kansas City/MO"})).await.unwrap();
    assert_eq!(output, "Kansas City/MO: ☀️ +25°C");
}

#[tokio::test]
async fn test_weather_unknown_city_is_status_error() {
    let base_url = setup().await;
    let tool = GetWeather::new(reqwest::Client::new(), base_url);

    match tool.call(json!({"city": "Atlantis"})).await {
        Err(ToolError::Status(status)) => assert_eq!(status, reqwest::StatusCode::NOT_FOUND),
        other => panic!("expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_search_renders_abstract_and_related() {
    let base_url = setup().await;
    let tool = SearchWeb::new(reqwest::Client::new(), base_url);

    let output = tool.call(json!({"query": "tokio"})).await.unwrap();
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(
        lines,
        vec![
            "Tokio: Tokio is an asynchronous runtime for Rust. (https://tokio.rs)",
            "- Rust programming language (https://www.rust-lang.org)",
            "- async-std (https://async.rs)",
        ]
    );
}

#[tokio::test]
async fn test_search_without_results_says_so() {
    let base_url = setup().await;
    let tool = SearchWeb::new(reqwest::Client::new(), base_url);

    let output = tool.call(json!({"query": "zzqx"})).await.unwrap();
    assert_eq!(output, "No results found for 'zzqx'.");
}

#[tokio::test]
async fn test_toolset_invoke_reports_failures_as_text() {
    let base_url = setup().await;
    let tools = ToolSet::standard(
        reqwest::Client::new(),
        ToolSettings {
            weather_url: base_url.clone(),
            search_url: base_url,
            mail: None,
        },
    );

    let ok = tools.invoke("get_weather", json!({"city": "Berlin"})).await;
    assert_eq!(ok, "Berlin: ⛅️ +12°C");

    let failed = tools.invoke("get_weather", json!({})).await;
    assert!(failed.starts_with("An error occurred while running get_weather"));

    let no_mail = tools
        .invoke(
            "send_email",
            json!({"to_email": "a@example.com", "subject": "Hi", "message": "Hello"}),
        )
        .await;
    assert!(no_mail.starts_with("An error occurred while running send_email"));
}
