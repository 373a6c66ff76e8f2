//! Integration tests for `SentimentEngine` against a mock
//! classification service.
//!
//! Uses `wiremock` so no real inference service is needed. Covers the
//! scored path, the degraded lexicon fallback, the empty-text
//! short-circuit, and input truncation.

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use marketpulse_core::{AppConfig, Environment, SentimentLabel};
use marketpulse_sentiment::{ContentOutcome, SentimentEngine};

fn test_config(classifier_url: String) -> AppConfig {
    AppConfig {
        env: Environment::Test,
        bind_addr: "127.0.0.1:0".parse().expect("valid addr"),
        log_level: "debug".to_string(),
        classifier_url,
        user_agent: "marketpulse-test/0.1".to_string(),
        request_timeout_secs: 5,
        resolve_timeout_secs: 5,
        articles_per_query: 5,
        max_workers: 2,
        min_content_length: 100,
        max_text_length: 512,
        analysis_timeout_secs: 30,
        cache_ttl_secs: 60,
    }
}

fn predictions_body(positive: f64, negative: f64, neutral: f64) -> serde_json::Value {
    json!([
        {"label": "Positive", "score": positive},
        {"label": "Negative", "score": negative},
        {"label": "Neutral", "score": neutral},
    ])
}

#[tokio::test]
async fn content_is_scored_by_the_service() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(200).set_body_json(predictions_body(0.81, 0.07, 0.12)))
        .mount(&server)
        .await;

    let engine = SentimentEngine::new(&test_config(server.uri()));
    let outcome = engine
        .analyze_content("Gold extended gains after the inflation report.")
        .await;

    match outcome {
        ContentOutcome::Scored(sentiment) => {
            assert_eq!(sentiment.label, SentimentLabel::Positive);
            assert!((sentiment.confidence - 0.81).abs() < 1e-9);
            let sum: f64 = sentiment.probabilities.values().sum();
            assert!((sum - 1.0).abs() < 1e-6);
        }
        other => panic!("expected Scored, got {other:?}"),
    }
}

#[tokio::test]
async fn service_failure_degrades_to_lexicon() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let engine = SentimentEngine::new(&test_config(server.uri()));
    let outcome = engine
        .analyze_content("Markets plunge as recession fears deepen across the board.")
        .await;

    match outcome {
        ContentOutcome::Degraded { sentiment, reason } => {
            assert_eq!(sentiment.label, SentimentLabel::Negative);
            assert!(!reason.is_empty());
            let sum: f64 = sentiment.probabilities.values().sum();
            assert!((sum - 1.0).abs() < 1e-6);
        }
        other => panic!("expected Degraded, got {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_service_degrades_instead_of_failing() {
    // Point at a port nothing listens on; connection is refused.
    let engine = SentimentEngine::new(&test_config("http://127.0.0.1:1".to_string()));
    let outcome = engine
        .analyze_content("Profits surge to a record on strong demand.")
        .await;

    match outcome {
        ContentOutcome::Degraded { sentiment, .. } => {
            assert_eq!(sentiment.label, SentimentLabel::Positive);
        }
        other => panic!("expected Degraded, got {other:?}"),
    }
}

#[tokio::test]
async fn empty_text_never_calls_the_service() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(200).set_body_json(predictions_body(1.0, 0.0, 0.0)))
        .expect(0)
        .mount(&server)
        .await;

    let engine = SentimentEngine::new(&test_config(server.uri()));
    for text in ["", "   ", "\n\t"] {
        let outcome = engine.analyze_content(text).await;
        match outcome {
            ContentOutcome::Scored(sentiment) => {
                assert_eq!(sentiment.label, SentimentLabel::Neutral);
                assert_eq!(sentiment.confidence, 0.0);
            }
            other => panic!("expected Scored neutral for empty text, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn long_input_is_truncated_to_the_model_budget() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(200).set_body_json(predictions_body(0.2, 0.2, 0.6)))
        .mount(&server)
        .await;

    let engine = SentimentEngine::new(&test_config(server.uri()));
    let long_text = "Gold held steady in quiet trading. ".repeat(100);
    let outcome = engine.analyze_content(&long_text).await;
    assert!(matches!(outcome, ContentOutcome::Scored(_)));

    let requests = server.received_requests().await.expect("requests recorded");
    assert_eq!(requests.len(), 1);
    let body: serde_json::Value =
        serde_json::from_slice(&requests[0].body).expect("request body is JSON");
    let inputs = body["inputs"].as_str().expect("inputs is a string");
    assert!(
        inputs.chars().count() <= 512,
        "classifier input not truncated: {} chars",
        inputs.chars().count()
    );
    assert!(inputs.starts_with("Gold held steady"), "leading portion must be kept");
}

#[tokio::test]
async fn analyze_article_flags_degraded_runs() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let engine = SentimentEngine::new(&test_config(server.uri()));
    let article = marketpulse_core::Article::new(
        "Gold rallies to record high".to_string(),
        "https://news.example.com/gold".to_string(),
        None,
        "Gold rallied strongly on safe-haven demand, with record inflows into bullion funds."
            .to_string(),
        10,
    );

    let analyzed = engine.analyze_article(article).await;
    assert!(analyzed.degraded, "classifier outage must set the degraded flag");
    assert_eq!(analyzed.headline_sentiment.label, SentimentLabel::Positive);
}
