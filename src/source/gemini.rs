//! Gemini `generateContent` client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::SetlistSource;
use super::error::{Result, SourceError};
use super::prompt;
use crate::pipeline::setlist::{Setlist, SetlistParams, Track};

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Clone, Debug)]
pub struct GeminiConfig {
    pub api_base: String,
    pub api_key: Option<String>,
    pub model: String,
    pub timeout: Duration,
}

impl GeminiConfig {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            api_key,
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(60),
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

// -- wire types --

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    fn user(text: String) -> Self {
        Self {
            role: Some(String::from("user")),
            parts: vec![Part { text: Some(text) }],
        }
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_mime_type: String,
    pub response_schema: serde_json::Value,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<Content>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate, if it has any.
    pub fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        (!text.is_empty()).then_some(text)
    }
}

/// Talks to a Gemini model over HTTP.
pub struct GeminiClient {
    http: Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        if config.api_base.is_empty() {
            return Err(SourceError::InvalidUrl("URL cannot be empty".into()));
        }

        let api_base = config.api_base.trim_end_matches('/').to_string();
        if !api_base.starts_with("http://") && !api_base.starts_with("https://") {
            return Err(SourceError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }

        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("vibera/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            config: GeminiConfig { api_base, ..config },
        })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.api_base, self.config.model
        )
    }

    /// Sends one `generateContent` request and returns the reply text.
    pub async fn generate_text(&self, request: &GenerateContentRequest) -> Result<String> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(SourceError::MissingApiKey)?;

        let url = self.endpoint();
        debug!(url = %url, model = %self.config.model, "Sending generateContent request");

        let response = self
            .http
            .post(&url)
            .header(API_KEY_HEADER, api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() || e.is_timeout() {
                    SourceError::Unreachable(e.to_string())
                } else {
                    SourceError::Request(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SourceError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| {
                SourceError::Parse(format!("Failed to parse generateContent reply: {e}"))
            })?;

        body.text().ok_or(SourceError::EmptyResponse)
    }
}

#[async_trait]
impl SetlistSource for GeminiClient {
    async fn generate_setlist(&self, params: &SetlistParams) -> Result<Vec<Track>> {
        let request = GenerateContentRequest {
            contents: vec![Content::user(prompt::setlist_prompt(params))],
            generation_config: Some(GenerationConfig {
                response_mime_type: String::from("application/json"),
                response_schema: prompt::setlist_schema(),
            }),
        };

        // a blank reply counts as an empty set, same as "[]"
        let text = match self.generate_text(&request).await {
            Ok(text) => text,
            Err(SourceError::EmptyResponse) => String::from("[]"),
            Err(e) => return Err(e),
        };
        let tracks = parse_tracks(&text)?;
        info!(tracks = tracks.len(), scene = %params.scene, "Setlist generated");
        Ok(tracks)
    }

    async fn describe_vibe(&self, setlist: &Setlist) -> Result<String> {
        let request = GenerateContentRequest {
            contents: vec![Content::user(prompt::vibe_prompt(setlist))],
            generation_config: None,
        };
        let text = self.generate_text(&request).await?;
        Ok(text.trim().to_string())
    }
}

/// Parses the JSON array the model returns for a setlist request.
pub fn parse_tracks(text: &str) -> Result<Vec<Track>> {
    let trimmed = text.trim();
    let json = if trimmed.is_empty() { "[]" } else { trimmed };
    serde_json::from_str(json).map_err(|e| SourceError::Parse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_base_urls() {
        let empty = GeminiConfig::new(None).with_api_base("");
        assert!(matches!(GeminiClient::new(empty), Err(SourceError::InvalidUrl(_))));

        let no_scheme = GeminiConfig::new(None).with_api_base("example.com");
        assert!(matches!(
            GeminiClient::new(no_scheme),
            Err(SourceError::InvalidUrl(_))
        ));
    }

    #[test]
    fn endpoint_trims_trailing_slash() {
        let config = GeminiConfig::new(Some("k".into()))
            .with_api_base("http://localhost:9000/")
            .with_model("test-model");
        let client = GeminiClient::new(config).unwrap();
        assert_eq!(
            client.endpoint(),
            "http://localhost:9000/v1beta/models/test-model:generateContent"
        );
    }

    #[test]
    fn request_serializes_in_camel_case() {
        let request = GenerateContentRequest {
            contents: vec![Content::user("hi".into())],
            generation_config: Some(GenerationConfig {
                response_mime_type: "application/json".into(),
                response_schema: prompt::setlist_schema(),
            }),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["contents"][0]["role"], "user");
        assert_eq!(value["contents"][0]["parts"][0]["text"], "hi");
        assert_eq!(value["generationConfig"]["responseMimeType"], "application/json");

        let plain = GenerateContentRequest {
            contents: vec![Content::user("hi".into())],
            generation_config: None,
        };
        let value = serde_json::to_value(&plain).unwrap();
        assert!(value.get("generationConfig").is_none());
    }

    #[test]
    fn response_text_joins_parts() {
        let body: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": "Hello " }, { "text": "world" }] }
            }]
        }))
        .unwrap();
        assert_eq!(body.text().as_deref(), Some("Hello world"));

        let empty: GenerateContentResponse = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert_eq!(empty.text(), None);
    }

    #[test]
    fn blank_text_parses_as_no_tracks() {
        assert!(parse_tracks("  \n").unwrap().is_empty());
        assert!(parse_tracks("not json").is_err());
    }
}
