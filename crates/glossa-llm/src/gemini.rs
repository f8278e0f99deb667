//! Gemini-style provider implementation
//!
//! Talks to a hosted `generateContent` endpoint. Structured calls attach a
//! response schema and request a JSON MIME type; the schema constrains the
//! model's output shape but callers still parse defensively.

use crate::LlmError;
use async_trait::async_trait;
use glossa_domain::traits::LlmProvider;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model identifier
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// HTTP-level timeout for a single request (seconds)
///
/// This is a transport safety net; the per-attempt extraction timeout lives
/// in the extraction client and is usually tighter.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 60;

/// Hosted generateContent provider
pub struct GeminiProvider {
    endpoint: String,
    model: String,
    api_key: String,
    temperature: f64,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f64,
    #[serde(rename = "responseMimeType", skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
    #[serde(rename = "responseSchema", skip_serializing_if = "Option::is_none")]
    response_schema: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

impl GeminiProvider {
    /// Create a provider against the default endpoint
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self::with_endpoint(DEFAULT_ENDPOINT, api_key, model)
    }

    /// Create a provider against a custom endpoint
    pub fn with_endpoint(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS))
            .build()
            .expect("default reqwest client");

        Self {
            endpoint: endpoint.into(),
            model: model.into(),
            api_key: api_key.into(),
            temperature: 0.2,
            client,
        }
    }

    /// Set the sampling temperature
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    /// The configured model identifier
    pub fn model(&self) -> &str {
        &self.model
    }

    async fn call(
        &self,
        prompt: &str,
        response_schema: Option<serde_json::Value>,
    ) -> Result<String, LlmError> {
        let url = format!("{}/models/{}:generateContent", self.endpoint, self.model);

        let request_body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: self.temperature,
                response_mime_type: response_schema
                    .is_some()
                    .then(|| "application/json".to_string()),
                response_schema,
            },
        };

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| LlmError::Communication(format!("Request failed: {}", e)))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(LlmError::ModelNotAvailable(self.model.clone()));
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(LlmError::RateLimitExceeded);
        }
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(LlmError::Communication(format!("HTTP {}: {}", status, body)));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        let text: String = parsed
            .candidates
            .first()
            .map(|candidate| {
                candidate
                    .content
                    .parts
                    .iter()
                    .map(|part| part.text.as_str())
                    .collect()
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(LlmError::InvalidResponse(
                "response carried no candidate text".to_string(),
            ));
        }

        Ok(text)
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    type Error = LlmError;

    async fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        self.call(prompt, None).await
    }

    async fn generate_structured(
        &self,
        prompt: &str,
        schema_json: &str,
    ) -> Result<String, Self::Error> {
        let schema: serde_json::Value = serde_json::from_str(schema_json)
            .map_err(|e| LlmError::Other(format!("invalid response schema: {}", e)))?;
        self.call(prompt, Some(schema)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_creation() {
        let provider = GeminiProvider::new("key", "gemini-2.0-flash");
        assert_eq!(provider.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(provider.model(), "gemini-2.0-flash");
        assert_eq!(provider.temperature, 0.2);
    }

    #[test]
    fn test_custom_endpoint_and_temperature() {
        let provider = GeminiProvider::with_endpoint("http://localhost:8000", "key", "m")
            .with_temperature(0.7);
        assert_eq!(provider.endpoint, "http://localhost:8000");
        assert_eq!(provider.temperature, 0.7);
    }

    #[test]
    fn test_structured_request_serialization() {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: "hello".to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.2,
                response_mime_type: Some("application/json".to_string()),
                response_schema: Some(serde_json::json!({"type": "object"})),
            },
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert_eq!(json["generationConfig"]["responseSchema"]["type"], "object");
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hello");
    }

    #[test]
    fn test_plain_request_omits_schema_fields() {
        let request = GenerateRequest {
            contents: vec![],
            generation_config: GenerationConfig {
                temperature: 0.2,
                response_mime_type: None,
                response_schema: None,
            },
        };

        let json = serde_json::to_value(&request).unwrap();
        let config = json["generationConfig"].as_object().unwrap();
        assert!(!config.contains_key("responseMimeType"));
        assert!(!config.contains_key("responseSchema"));
    }

    #[test]
    fn test_response_parsing() {
        let body = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "part one "}, {"text": "part two"}]}}
            ]
        }"#;
        let parsed: GenerateResponse = serde_json::from_str(body).unwrap();
        let text: String = parsed.candidates[0]
            .content
            .parts
            .iter()
            .map(|p| p.text.as_str())
            .collect();
        assert_eq!(text, "part one part two");
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_communication_error() {
        let provider = GeminiProvider::with_endpoint("http://127.0.0.1:1", "key", "m");
        let result = provider.generate("test").await;

        match result {
            Err(LlmError::Communication(_)) => {}
            other => panic!("Expected Communication error, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_structured_rejects_invalid_schema() {
        let provider = GeminiProvider::with_endpoint("http://127.0.0.1:1", "key", "m");
        let result = provider.generate_structured("p", "{not json").await;
        assert!(matches!(result, Err(LlmError::Other(_))));
    }
}
