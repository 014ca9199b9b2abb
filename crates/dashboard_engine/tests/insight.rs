use std::time::Duration;

use dashboard_engine::{
    HttpInsightProvider, InsightProvider, ProviderSettings, FALLBACK_EMPTY, FALLBACK_ERROR,
};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn settings(server: &MockServer) -> ProviderSettings {
    ProviderSettings {
        endpoint: format!("{}/v1/generate", server.uri()),
        api_key: Some("test-key".to_string()),
        app_id: "test-app".to_string(),
        connect_timeout: Duration::from_secs(2),
        request_timeout: Duration::from_secs(2),
    }
}

fn canned_body(text: &str) -> serde_json::Value {
    json!({
        "candidates": [
            { "content": { "parts": [ { "text": text } ] } }
        ]
    })
}

#[tokio::test]
async fn parses_the_insight_array_and_sends_namespacing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/generate"))
        .and(header("x-app-id", "test-app"))
        .and(query_param("key", "test-key"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(canned_body(r#"["A","B","C"]"#)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let provider = HttpInsightProvider::new(settings(&server)).expect("provider");
    let insights = provider.generate("Sentiment Breakdown", "counts").await;

    assert_eq!(insights, vec!["A", "B", "C"]);
}

#[tokio::test]
async fn caps_and_cleans_the_returned_list() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(canned_body(
            r#"["  first  ", "", "second", "third", "fourth"]"#,
        )))
        .mount(&server)
        .await;

    let provider = HttpInsightProvider::new(settings(&server)).expect("provider");
    let insights = provider.generate("Media Type Mix", "counts").await;

    assert_eq!(insights, vec!["first", "second", "third"]);
}

#[tokio::test]
async fn empty_array_falls_back() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(canned_body("[]")))
        .mount(&server)
        .await;

    let provider = HttpInsightProvider::new(settings(&server)).expect("provider");
    let insights = provider.generate("Media Type Mix", "counts").await;

    assert_eq!(insights, vec![FALLBACK_EMPTY]);
}

#[tokio::test]
async fn missing_candidates_fall_back() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let provider = HttpInsightProvider::new(settings(&server)).expect("provider");
    let insights = provider.generate("Engagements by Platform", "sums").await;

    assert_eq!(insights, vec![FALLBACK_EMPTY]);
}

#[tokio::test]
async fn malformed_payload_is_an_error_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(canned_body("not a json array")),
        )
        .mount(&server)
        .await;

    let provider = HttpInsightProvider::new(settings(&server)).expect("provider");
    let insights = provider.generate("Top Locations by Mentions", "counts").await;

    assert_eq!(insights, vec![FALLBACK_ERROR]);
}

#[tokio::test]
async fn http_error_is_an_error_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let provider = HttpInsightProvider::new(settings(&server)).expect("provider");
    let insights = provider.generate("Sentiment Breakdown", "counts").await;

    assert_eq!(insights, vec![FALLBACK_ERROR]);
}

#[tokio::test]
async fn slow_endpoint_times_out_to_an_error_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(500))
                .set_body_json(canned_body(r#"["late"]"#)),
        )
        .mount(&server)
        .await;

    let mut settings = settings(&server);
    settings.request_timeout = Duration::from_millis(50);
    let provider = HttpInsightProvider::new(settings).expect("provider");
    let insights = provider.generate("Engagement Trend Over Time", "sums").await;

    assert_eq!(insights, vec![FALLBACK_ERROR]);
}
