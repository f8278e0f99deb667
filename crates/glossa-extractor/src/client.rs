//! Extraction client - retry, timeout, and schema policy around a provider
//!
//! Owns everything the providers deliberately do not: per-attempt timeouts,
//! exponential backoff between attempts, and defensive parsing of each
//! response. A malformed response consumes an attempt just like a transport
//! failure does.

use crate::config::ExtractorConfig;
use crate::error::ExtractError;
use crate::parser;
use glossa_domain::{traits::LlmProvider, GlossaryTerm, PolicyRule};
use serde_json::{json, Value};
use std::fmt::Display;
use std::sync::Arc;
use tracing::{debug, warn};

/// Parsed output of one term-extraction call
#[derive(Debug, Clone)]
pub struct TermExtraction {
    /// Terms that survived parsing and validation
    pub terms: Vec<GlossaryTerm>,

    /// Free-form metadata object returned alongside the terms
    pub metadata: Option<Value>,
}

/// Retrying extraction client over any `LlmProvider`
pub struct ExtractionClient<P> {
    provider: Arc<P>,
    config: ExtractorConfig,
}

impl<P> Clone for ExtractionClient<P> {
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
            config: self.config.clone(),
        }
    }
}

impl<P> ExtractionClient<P>
where
    P: LlmProvider + Send + Sync,
    P::Error: Display,
{
    /// Create a client over the given provider
    pub fn new(provider: Arc<P>, config: ExtractorConfig) -> Self {
        Self { provider, config }
    }

    /// The configuration this client runs with
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Run a term-extraction prompt to completion
    pub async fn extract_terms(&self, prompt: &str) -> Result<TermExtraction, ExtractError> {
        let schema = term_response_schema().to_string();
        let (terms, metadata) = self
            .run_with_retry(prompt, &schema, parser::parse_term_response)
            .await?;
        Ok(TermExtraction { terms, metadata })
    }

    /// Run a rule-extraction prompt to completion
    pub async fn extract_rules(&self, prompt: &str) -> Result<Vec<PolicyRule>, ExtractError> {
        let schema = rule_response_schema().to_string();
        self.run_with_retry(prompt, &schema, parser::parse_rule_response)
            .await
    }

    /// Attempt loop shared by both extraction paths
    ///
    /// Each attempt is bounded by the configured timeout. Backoff doubles per
    /// attempt and is skipped after the final one.
    async fn run_with_retry<T, F>(
        &self,
        prompt: &str,
        schema: &str,
        parse: F,
    ) -> Result<T, ExtractError>
    where
        F: Fn(&str) -> Result<T, ExtractError>,
    {
        let attempts = self.config.max_attempts;
        let mut last_error = String::new();

        for attempt in 1..=attempts {
            let call = self.provider.generate_structured(prompt, schema);
            match tokio::time::timeout(self.config.attempt_timeout(), call).await {
                Ok(Ok(response)) => match parse(&response) {
                    Ok(parsed) => {
                        debug!("Extraction succeeded on attempt {}/{}", attempt, attempts);
                        return Ok(parsed);
                    }
                    Err(e) => {
                        last_error = e.to_string();
                        warn!(
                            "Attempt {}/{} returned an unusable response: {}",
                            attempt, attempts, last_error
                        );
                    }
                },
                Ok(Err(e)) => {
                    last_error = e.to_string();
                    warn!("Attempt {}/{} failed: {}", attempt, attempts, last_error);
                }
                Err(_) => {
                    last_error = format!(
                        "attempt timed out after {}ms",
                        self.config.attempt_timeout_ms
                    );
                    warn!("Attempt {}/{}: {}", attempt, attempts, last_error);
                }
            }

            if attempt < attempts {
                tokio::time::sleep(self.config.backoff_delay(attempt)).await;
            }
        }

        Err(ExtractError::AllAttemptsFailed {
            attempts,
            last: last_error,
        })
    }
}

/// Response schema for term extraction, in the provider's schema dialect
fn term_response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "terms": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "term": {"type": "STRING"},
                        "definition": {"type": "STRING"},
                        "source_columns": {"type": "ARRAY", "items": {"type": "STRING"}},
                        "data_types": {"type": "ARRAY", "items": {"type": "STRING"}},
                        "sample_values": {"type": "ARRAY", "items": {"type": "STRING"}},
                        "synonyms": {"type": "ARRAY", "items": {"type": "STRING"}},
                        "category": {"type": "STRING"},
                        "confidence": {"type": "NUMBER"}
                    },
                    "required": ["term", "definition"]
                }
            },
            "metadata": {
                "type": "OBJECT",
                "properties": {
                    "summary": {"type": "STRING"}
                }
            }
        },
        "required": ["terms"]
    })
}

/// Response schema for rule extraction
fn rule_response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "rules": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "code": {"type": "STRING"},
                        "text": {"type": "STRING"},
                        "citations": {"type": "ARRAY", "items": {"type": "STRING"}},
                        "tags": {"type": "ARRAY", "items": {"type": "STRING"}},
                        "severity": {"type": "STRING"},
                        "effective_date": {"type": "STRING"},
                        "confidence": {"type": "NUMBER"}
                    },
                    "required": ["text"]
                }
            }
        },
        "required": ["rules"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use glossa_llm::MockProvider;

    fn fast_config() -> ExtractorConfig {
        ExtractorConfig {
            base_delay_ms: 1,
            attempt_timeout_ms: 1000,
            ..ExtractorConfig::default()
        }
    }

    fn client(provider: &MockProvider) -> ExtractionClient<MockProvider> {
        ExtractionClient::new(Arc::new(provider.clone()), fast_config())
    }

    const VALID_TERMS: &str =
        r#"{"terms": [{"term": "Revenue", "definition": "Total income"}], "metadata": {"summary": "s"}}"#;

    #[tokio::test]
    async fn test_first_attempt_success() {
        let provider = MockProvider::new(VALID_TERMS);
        let extraction = client(&provider).extract_terms("p").await.unwrap();

        assert_eq!(extraction.terms.len(), 1);
        assert_eq!(extraction.terms[0].name, "Revenue");
        assert!(extraction.metadata.is_some());
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_recovers_after_transient_failure() {
        let provider = MockProvider::new(VALID_TERMS);
        provider.push_error("connection reset");

        let extraction = client(&provider).extract_terms("p").await.unwrap();
        assert_eq!(extraction.terms.len(), 1);
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn test_malformed_response_consumes_an_attempt() {
        let provider = MockProvider::new(VALID_TERMS);
        provider.push_response("this is not JSON");

        let extraction = client(&provider).extract_terms("p").await.unwrap();
        assert_eq!(extraction.terms.len(), 1);
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn test_all_attempts_failed_reports_count_and_last_error() {
        let provider = MockProvider::failing("model overloaded");
        let result = client(&provider).extract_terms("p").await;

        match result {
            Err(ExtractError::AllAttemptsFailed { attempts, last }) => {
                assert_eq!(attempts, 3);
                assert!(last.contains("model overloaded"));
            }
            other => panic!("expected AllAttemptsFailed, got {:?}", other.map(|_| ())),
        }
        assert_eq!(provider.call_count(), 3);
    }

    #[tokio::test]
    async fn test_failure_message_format() {
        let provider = MockProvider::failing("boom");
        let err = client(&provider).extract_terms("p").await.unwrap_err();
        assert!(err
            .to_string()
            .starts_with("extraction failed after 3 attempts:"));
    }

    #[tokio::test]
    async fn test_extract_rules() {
        let provider =
            MockProvider::new(r#"{"rules": [{"code": "R1", "text": "Retain for 7 years"}]}"#);
        let rules = client(&provider).extract_rules("p").await.unwrap();

        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].code.as_deref(), Some("R1"));
    }

    #[tokio::test]
    async fn test_single_attempt_config_does_not_retry() {
        let provider = MockProvider::failing("down");
        let config = ExtractorConfig {
            max_attempts: 1,
            base_delay_ms: 1,
            ..ExtractorConfig::default()
        };
        let client = ExtractionClient::new(Arc::new(provider.clone()), config);

        let err = client.extract_terms("p").await.unwrap_err();
        assert!(matches!(
            err,
            ExtractError::AllAttemptsFailed { attempts: 1, .. }
        ));
        assert_eq!(provider.call_count(), 1);
    }
}
