use std::time::Duration;

use async_trait::async_trait;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::prompt::insight_request;

/// Upper bound on insights per panel.
pub const MAX_INSIGHTS: usize = 3;
/// Substituted when the provider answers but has nothing usable.
pub const FALLBACK_EMPTY: &str = "No insights available.";
/// Substituted when the call itself fails (transport, status, parse).
pub const FALLBACK_ERROR: &str = "Error generating insights.";

#[derive(Debug, Clone)]
pub struct ProviderSettings {
    pub endpoint: String,
    pub api_key: Option<String>,
    /// Application/tenant identifier, sent for namespacing only.
    pub app_id: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent".to_string(),
            api_key: None,
            app_id: "media-mentions-dashboard".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl ProviderSettings {
    /// Environment overrides: `INSIGHT_ENDPOINT`, `INSIGHT_API_KEY`,
    /// `DASHBOARD_APP_ID`.
    pub fn from_env() -> Self {
        let mut settings = Self::default();
        if let Ok(endpoint) = std::env::var("INSIGHT_ENDPOINT") {
            settings.endpoint = endpoint;
        }
        if let Ok(key) = std::env::var("INSIGHT_API_KEY") {
            settings.api_key = Some(key);
        }
        if let Ok(app_id) = std::env::var("DASHBOARD_APP_ID") {
            settings.app_id = app_id;
        }
        settings
    }
}

/// External generative-text collaborator.
///
/// Implementations absorb their own failures: the returned list is never
/// empty and never longer than [`MAX_INSIGHTS`].
#[async_trait]
pub trait InsightProvider: Send + Sync {
    async fn generate(&self, title: &str, summary: &str) -> Vec<String>;
}

#[derive(Debug, thiserror::Error)]
#[error("failed to initialize insight provider: {0}")]
pub struct ProviderInitError(#[from] reqwest::Error);

#[derive(Debug, Clone)]
pub struct HttpInsightProvider {
    client: reqwest::Client,
    settings: ProviderSettings,
}

impl HttpInsightProvider {
    pub fn new(settings: ProviderSettings) -> Result<Self, ProviderInitError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()?;
        Ok(Self { client, settings })
    }

    async fn request(&self, prompt: &str) -> Result<GenerateResponse, reqwest::Error> {
        let body = GenerateRequest::for_prompt(prompt);
        let mut request = self
            .client
            .post(&self.settings.endpoint)
            .header("x-app-id", &self.settings.app_id)
            .json(&body);
        if let Some(key) = &self.settings.api_key {
            request = request.query(&[("key", key.as_str())]);
        }
        let response = request.send().await?.error_for_status()?;
        response.json::<GenerateResponse>().await
    }
}

#[async_trait]
impl InsightProvider for HttpInsightProvider {
    async fn generate(&self, title: &str, summary: &str) -> Vec<String> {
        let prompt = insight_request(title, summary);
        let response = match self.request(&prompt).await {
            Ok(response) => response,
            Err(err) => {
                warn!("insight call failed for {title:?}: {err}");
                return vec![FALLBACK_ERROR.to_string()];
            }
        };
        let Some(text) = response.insight_text() else {
            warn!("insight response for {title:?} carried no content");
            return vec![FALLBACK_EMPTY.to_string()];
        };
        let parsed: Vec<String> = match serde_json::from_str(&text) {
            Ok(parsed) => parsed,
            Err(err) => {
                warn!("insight payload for {title:?} is not a string array: {err}");
                return vec![FALLBACK_ERROR.to_string()];
            }
        };
        let insights: Vec<String> = parsed
            .into_iter()
            .map(|insight| insight.trim().to_string())
            .filter(|insight| !insight.is_empty())
            .take(MAX_INSIGHTS)
            .collect();
        if insights.is_empty() {
            vec![FALLBACK_EMPTY.to_string()]
        } else {
            insights
        }
    }
}

// Wire shape of the generative-text endpoint: a prompt plus a typed
// STRING-array response schema; the insight payload comes back as JSON text
// inside the first candidate part.

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<RequestContent>,
    generation_config: GenerationConfig,
}

impl GenerateRequest {
    fn for_prompt(prompt: &str) -> Self {
        Self {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: ResponseSchema {
                    schema_type: "ARRAY",
                    items: SchemaItems {
                        schema_type: "STRING",
                    },
                },
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct RequestContent {
    role: &'static str,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: ResponseSchema,
}

#[derive(Debug, Serialize)]
struct ResponseSchema {
    #[serde(rename = "type")]
    schema_type: &'static str,
    items: SchemaItems,
}

#[derive(Debug, Serialize)]
struct SchemaItems {
    #[serde(rename = "type")]
    schema_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateResponse {
    fn insight_text(&self) -> Option<String> {
        let part = self.candidates.first()?.content.as_ref()?.parts.first()?;
        let text = part.text.trim();
        if text.is_empty() {
            None
        } else {
            Some(text.to_string())
        }
    }
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<Part>,
}
