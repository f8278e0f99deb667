//! Defensive parsing of model output into terms and rules
//!
//! The response schema passed to the provider is an aid, not a guarantee:
//! responses may arrive fenced in markdown, carry malformed items, or use an
//! unexpected top-level shape. Invalid items are skipped with a warning;
//! an unusable top-level shape is an error, which the client treats as a
//! failed attempt.

use crate::error::ExtractError;
use glossa_domain::{term::DEFAULT_CATEGORY, GlossaryTerm, PolicyRule};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

fn default_confidence() -> f64 {
    0.5
}

#[derive(Debug, Deserialize)]
struct TermCandidate {
    term: String,
    #[serde(default)]
    definition: String,
    #[serde(default)]
    source_columns: Vec<String>,
    #[serde(default)]
    data_types: Vec<String>,
    #[serde(default)]
    sample_values: Vec<String>,
    #[serde(default)]
    synonyms: Vec<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default = "default_confidence")]
    confidence: f64,
}

impl TermCandidate {
    fn into_term(self) -> GlossaryTerm {
        let category = self
            .category
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());

        let mut term =
            GlossaryTerm::new(self.term, self.definition).with_confidence(self.confidence);
        term.source_columns = self.source_columns;
        term.data_types = self.data_types;
        term.sample_values = self.sample_values;
        term.synonyms = self.synonyms;
        term.category = category;
        term
    }
}

#[derive(Debug, Deserialize)]
struct RuleCandidate {
    #[serde(default)]
    code: Option<String>,
    text: String,
    #[serde(default)]
    citations: Vec<String>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    severity: Option<String>,
    #[serde(default)]
    effective_date: Option<String>,
    #[serde(default)]
    confidence: Option<f64>,
}

impl RuleCandidate {
    fn into_rule(self) -> PolicyRule {
        let mut rule = PolicyRule::new(self.text.trim());
        rule.code = self.code;
        rule.citations = self.citations;
        rule.tags = self.tags;
        rule.severity = self.severity;
        rule.effective_date = self.effective_date;
        rule.confidence = self.confidence.map(|c| c.clamp(0.0, 1.0));
        rule
    }
}

/// Parse a term-extraction response
///
/// Accepts the expected `{"terms": [...], "metadata": {...}}` object, or a
/// bare top-level array of terms. Returns the parsed terms plus the metadata
/// value when present.
pub fn parse_term_response(
    response: &str,
) -> Result<(Vec<GlossaryTerm>, Option<Value>), ExtractError> {
    let json: Value = serde_json::from_str(&strip_fences(response))
        .map_err(|e| ExtractError::InvalidFormat(format!("JSON parse error: {}", e)))?;

    let (items, metadata) = match &json {
        Value::Array(items) => (items.as_slice(), None),
        Value::Object(map) => {
            let items = map
                .get("terms")
                .and_then(Value::as_array)
                .ok_or_else(|| {
                    ExtractError::InvalidFormat("missing 'terms' array".to_string())
                })?;
            (items.as_slice(), map.get("metadata").cloned())
        }
        _ => {
            return Err(ExtractError::InvalidFormat(
                "expected a JSON object with a 'terms' array".to_string(),
            ))
        }
    };

    let mut terms = Vec::new();
    for (index, item) in items.iter().enumerate() {
        match serde_json::from_value::<TermCandidate>(item.clone()) {
            Ok(candidate) => {
                let term = candidate.into_term();
                if let Err(e) = term.validate() {
                    warn!("Skipping term {}: {}", index, e);
                    continue;
                }
                terms.push(term);
            }
            Err(e) => {
                warn!("Failed to parse term {}: {}", index, e);
            }
        }
    }

    Ok((terms, metadata))
}

/// Parse a rule-extraction response
///
/// Accepts `{"rules": [...]}` or a bare top-level array of rules.
pub fn parse_rule_response(response: &str) -> Result<Vec<PolicyRule>, ExtractError> {
    let json: Value = serde_json::from_str(&strip_fences(response))
        .map_err(|e| ExtractError::InvalidFormat(format!("JSON parse error: {}", e)))?;

    let items = match &json {
        Value::Array(items) => items.as_slice(),
        Value::Object(map) => map
            .get("rules")
            .and_then(Value::as_array)
            .ok_or_else(|| ExtractError::InvalidFormat("missing 'rules' array".to_string()))?
            .as_slice(),
        _ => {
            return Err(ExtractError::InvalidFormat(
                "expected a JSON object with a 'rules' array".to_string(),
            ))
        }
    };

    let mut rules = Vec::new();
    for (index, item) in items.iter().enumerate() {
        match serde_json::from_value::<RuleCandidate>(item.clone()) {
            Ok(candidate) => {
                let rule = candidate.into_rule();
                if let Err(e) = rule.validate() {
                    warn!("Skipping rule {}: {}", index, e);
                    continue;
                }
                rules.push(rule);
            }
            Err(e) => {
                warn!("Failed to parse rule {}: {}", index, e);
            }
        }
    }

    Ok(rules)
}

/// Strip a markdown code fence wrapper, if present
fn strip_fences(response: &str) -> String {
    let trimmed = response.trim();
    if trimmed.starts_with("```") {
        let lines: Vec<&str> = trimmed.lines().collect();
        if lines.len() < 2 {
            return String::new();
        }
        // Skip the opening fence line and the closing fence
        lines[1..lines.len().saturating_sub(1)].join("\n")
    } else {
        trimmed.to_string()
    }
}
