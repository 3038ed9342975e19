//! Tests for the Gemini setlist source.
//!
//! These use a mock server so no real API key or network is needed.

use std::time::Duration;

use serde_json::json;
use vibera::pipeline::setlist::{Intensity, SetlistParams, TransitionType};
use vibera::source::{
    self, FALLBACK_CAPTION, GeminiClient, GeminiConfig, SetlistSource, SourceError,
};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ENDPOINT: &str = "/v1beta/models/test-model:generateContent";

fn client_for(server: &MockServer, api_key: Option<&str>) -> GeminiClient {
    let config = GeminiConfig::new(api_key.map(String::from))
        .with_api_base(server.uri())
        .with_model("test-model")
        .with_timeout(Duration::from_secs(5));
    GeminiClient::new(config).unwrap()
}

fn reply_with_text(text: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] }
        }]
    }))
}

fn params() -> SetlistParams {
    SetlistParams::new("Rooftop", "Afro House", 45, Intensity::High).unwrap()
}

fn tracks_json() -> String {
    json!([
        {
            "id": "1", "title": "Jerusalema", "artist": "Master KG",
            "bpm": 124, "durationSeconds": 240, "energyLevel": 7,
            "transitionType": "crossfade", "genre": "Afro House"
        },
        {
            "id": "2", "title": "Calm Down", "artist": "Rema",
            "bpm": 107.5, "durationSeconds": 239.6, "energyLevel": 6.4,
            "transitionType": "Echo Out", "genre": "Afrobeats"
        }
    ])
    .to_string()
}

// =============================================================================
// Setlist generation
// =============================================================================

mod generate {
    use super::*;

    #[tokio::test]
    async fn parses_generated_tracks() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ENDPOINT))
            .and(header("x-goog-api-key", "secret"))
            .respond_with(reply_with_text(&tracks_json()))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, Some("secret"));
        let setlist = source::generate_setlist(&client, &params()).await;

        assert_eq!(setlist.len(), 2);
        let second = setlist.get(1).unwrap();
        assert_eq!(second.title, "Calm Down");
        assert_eq!(second.duration_seconds, 240);
        assert_eq!(second.energy_level, 6);
        assert_eq!(second.transition_type, TransitionType::EchoOut);
    }

    #[tokio::test]
    async fn request_carries_prompt_and_schema() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ENDPOINT))
            .respond_with(reply_with_text("[]"))
            .mount(&server)
            .await;

        let client = client_for(&server, Some("secret"));
        client.generate_setlist(&params()).await.unwrap();

        let requests = server.received_requests().await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
        let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
        assert!(prompt.contains("Rooftop"));
        assert!(prompt.contains("Afro House"));
        assert!(prompt.contains("45 minutes"));
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(body["generationConfig"]["responseSchema"]["type"], "ARRAY");
    }

    #[tokio::test]
    async fn server_error_becomes_empty_setlist() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let client = client_for(&server, Some("secret"));
        match client.generate_setlist(&params()).await {
            Err(SourceError::Api { status, message }) => {
                assert_eq!(status, 503);
                assert_eq!(message, "overloaded");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
        assert!(source::generate_setlist(&client, &params()).await.is_empty());
    }

    #[tokio::test]
    async fn malformed_payload_becomes_empty_setlist() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(reply_with_text("{\"not\": \"an array\"}"))
            .mount(&server)
            .await;

        let client = client_for(&server, Some("secret"));
        assert!(matches!(
            client.generate_setlist(&params()).await,
            Err(SourceError::Parse(_))
        ));
        assert!(source::generate_setlist(&client, &params()).await.is_empty());
    }

    #[tokio::test]
    async fn no_candidates_means_no_tracks() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
            .mount(&server)
            .await;

        let client = client_for(&server, Some("secret"));
        assert!(client.generate_setlist(&params()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_key_never_hits_the_network() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(reply_with_text("[]"))
            .expect(0)
            .mount(&server)
            .await;

        let client = client_for(&server, None);
        assert!(matches!(
            client.generate_setlist(&params()).await,
            Err(SourceError::MissingApiKey)
        ));
    }

    #[tokio::test]
    async fn unreachable_server_recovers() {
        // nothing listens on this port once the server is dropped
        let uri = {
            let server = MockServer::start().await;
            server.uri()
        };
        let config = GeminiConfig::new(Some("secret".into()))
            .with_api_base(uri)
            .with_model("test-model")
            .with_timeout(Duration::from_secs(2));
        let client = GeminiClient::new(config).unwrap();

        let (setlist, caption) = source::load_session(&client, &params()).await;
        assert!(setlist.is_empty());
        assert_eq!(caption, FALLBACK_CAPTION);
    }
}

// =============================================================================
// Vibe caption
// =============================================================================

mod describe {
    use super::*;

    #[tokio::test]
    async fn full_session_loads_setlist_then_caption() {
        let server = MockServer::start().await;
        // the caption request is the one without a response schema
        Mock::given(method("POST"))
            .and(path(ENDPOINT))
            .and(wiremock::matchers::body_string_contains("hype description"))
            .respond_with(reply_with_text("  Pure fire tonight. Don't miss it.  "))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(ENDPOINT))
            .respond_with(reply_with_text(&tracks_json()))
            .mount(&server)
            .await;

        let client = client_for(&server, Some("secret"));
        let (setlist, caption) = source::load_session(&client, &params()).await;
        assert_eq!(setlist.len(), 2);
        assert_eq!(caption, "Pure fire tonight. Don't miss it.");

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 2);
        let second: serde_json::Value = serde_json::from_slice(&requests[1].body).unwrap();
        let prompt = second["contents"][0]["parts"][0]["text"].as_str().unwrap();
        assert!(prompt.contains("Jerusalema, Calm Down"));
        assert!(second.get("generationConfig").is_none());
    }

    #[tokio::test]
    async fn caption_failure_uses_fallback() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = client_for(&server, Some("secret"));
        let setlist = vibera::pipeline::setlist::Setlist::new(
            serde_json::from_str(&tracks_json()).unwrap(),
        );
        assert_eq!(source::describe_vibe(&client, &setlist).await, FALLBACK_CAPTION);
    }
}
