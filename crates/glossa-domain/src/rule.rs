//! Policy rule module - governance rules extracted from documents

use crate::DatasetId;
use serde::{Deserialize, Serialize};

/// A policy rule extracted from document text
///
/// Rules come out of the document/PDF path only. Unlike glossary terms they
/// are never deduplicated; each extracted rule is persisted as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyRule {
    /// Short rule code, when the document assigns one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    /// Rule text (required, non-empty after trim)
    pub text: String,

    /// Citation strings pointing back into the document
    #[serde(default)]
    pub citations: Vec<String>,

    /// Tag strings
    #[serde(default)]
    pub tags: Vec<String>,

    /// Severity label, when stated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,

    /// ISO calendar date the rule takes effect, when stated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_date: Option<String>,

    /// Model confidence, when provided
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,

    /// Dataset this rule was extracted from, once linked
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset_id: Option<DatasetId>,
}

impl PolicyRule {
    /// Create a rule with only its text set
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            code: None,
            text: text.into(),
            citations: Vec::new(),
            tags: Vec::new(),
            severity: None,
            effective_date: None,
            confidence: None,
            dataset_id: None,
        }
    }

    /// Check that the rule is well-formed enough to keep
    pub fn validate(&self) -> Result<(), String> {
        if self.text.trim().is_empty() {
            return Err("rule text is empty".to_string());
        }
        if let Some(c) = self.confidence {
            if !(0.0..=1.0).contains(&c) {
                return Err(format!("rule confidence {} out of range [0.0, 1.0]", c));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_requires_text() {
        assert!(PolicyRule::new("   ").validate().is_err());
        assert!(PolicyRule::new("Retain records for 7 years").validate().is_ok());
    }

    #[test]
    fn test_validate_checks_confidence_range() {
        let mut rule = PolicyRule::new("text");
        rule.confidence = Some(1.5);
        assert!(rule.validate().is_err());

        rule.confidence = Some(0.8);
        assert!(rule.validate().is_ok());
    }
}
