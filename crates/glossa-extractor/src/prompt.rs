//! Prompt construction for term and rule extraction
//!
//! Pure string rendering: no I/O, no side effects. The dataset name, the
//! business context (when present), and the extraction mode always appear
//! verbatim in the rendered prompt.

use glossa_domain::{ColumnProfile, ExtractionMode};
use std::fmt::Write;

/// Samples shown per column in the tabular prompt
const SAMPLES_IN_PROMPT: usize = 5;

/// Extraction ground rules included in every term prompt
const GROUND_RULES: &str = r#"Extraction rules:
- Extract only business-relevant concepts, not technical plumbing
- Never define a term using the term itself
- Expand acronyms into their full form and keep the acronym as a synonym
- Merge duplicate concepts into a single term before responding
- Report realistic confidence: reserve values above 0.9 for terms the data
  clearly evidences
- Assign each term a category (for example: finance, customer, operations,
  compliance); use "general" only when nothing fits"#;

/// Output contract for term extraction
const TERM_OUTPUT_FORMAT: &str = r#"Respond with a single JSON object, no markdown fences:
{
  "terms": [
    {
      "term": "Canonical Name",
      "definition": "What this concept means in the business",
      "source_columns": ["column_a"],
      "data_types": ["number"],
      "sample_values": ["100"],
      "synonyms": ["Alt Name"],
      "category": "finance",
      "confidence": 0.85
    }
  ],
  "metadata": {"summary": "one-line description of the dataset"}
}"#;

/// Output contract for rule extraction
const RULE_OUTPUT_FORMAT: &str = r#"Respond with a single JSON object, no markdown fences:
{
  "rules": [
    {
      "code": "POL-1.2",
      "text": "The rule statement, verbatim or lightly normalized",
      "citations": ["Section 1.2"],
      "tags": ["retention"],
      "severity": "mandatory",
      "effective_date": "2024-01-01",
      "confidence": 0.9
    }
  ]
}"#;

/// Builds prompts for the extraction service
pub struct PromptBuilder {
    dataset_name: String,
    business_context: Option<String>,
    mode: ExtractionMode,
}

impl PromptBuilder {
    /// Create a builder for the given dataset
    pub fn new(dataset_name: impl Into<String>) -> Self {
        Self {
            dataset_name: dataset_name.into(),
            business_context: None,
            mode: ExtractionMode::default(),
        }
    }

    /// Attach a business-context string
    pub fn with_business_context(mut self, context: Option<String>) -> Self {
        self.business_context = context;
        self
    }

    /// Set the extraction mode
    pub fn with_mode(mut self, mode: ExtractionMode) -> Self {
        self.mode = mode;
        self
    }

    /// Build the term-extraction prompt
    ///
    /// Branches on whether column profiles are present: tabular input renders
    /// the column details, unstructured input embeds the document text.
    pub fn build_term_prompt(&self, profiles: &[ColumnProfile], text: &str) -> String {
        if profiles.is_empty() {
            self.document_term_prompt(text)
        } else {
            self.tabular_term_prompt(profiles)
        }
    }

    fn header(&self) -> String {
        let mut header = String::new();
        header.push_str(
            "You are a data governance analyst building a business glossary.\n\n",
        );
        let _ = writeln!(header, "Dataset: {}", self.dataset_name);
        if let Some(context) = &self.business_context {
            let _ = writeln!(header, "Business context: {}", context);
        }
        let _ = writeln!(header, "Extraction mode: {}", self.mode);
        header.push('\n');
        header
    }

    fn tabular_term_prompt(&self, profiles: &[ColumnProfile]) -> String {
        let mut prompt = self.header();
        prompt.push_str(GROUND_RULES);
        prompt.push_str("\n\n## Column Details\n");

        for profile in profiles {
            let _ = write!(
                prompt,
                "- {} (type: {}, unique: {}, null: {})",
                profile.name, profile.semantic_type, profile.unique_count, profile.null_count
            );
            if let Some(stats) = &profile.stats {
                let _ = write!(
                    prompt,
                    " [min {}, max {}, mean {:.2}]",
                    stats.min, stats.max, stats.mean
                );
            }
            if !profile.samples.is_empty() {
                let samples: Vec<&str> = profile
                    .samples
                    .iter()
                    .take(SAMPLES_IN_PROMPT)
                    .map(String::as_str)
                    .collect();
                let _ = write!(prompt, " samples: {}", samples.join(", "));
            }
            prompt.push('\n');
        }

        prompt.push('\n');
        match self.mode {
            ExtractionMode::Comprehensive => prompt.push_str(
                "Extract every business concept the columns evidence, including \
                 derived concepts and relationships between entities.\n\n",
            ),
            ExtractionMode::Basic => prompt.push_str(
                "Extract the primary business entities these columns describe; \
                 skip derived or speculative concepts.\n\n",
            ),
        }
        prompt.push_str(TERM_OUTPUT_FORMAT);
        prompt
    }

    fn document_term_prompt(&self, text: &str) -> String {
        let mut prompt = self.header();
        prompt.push_str(GROUND_RULES);
        prompt.push_str(
            "\n\nIdentify explicit definitions, business processes, metrics, \
             acronyms, and code lists in the document below.\n\n",
        );
        prompt.push_str("## Document Text\n---\n");
        prompt.push_str(text);
        prompt.push_str("\n---\n\n");
        prompt.push_str(TERM_OUTPUT_FORMAT);
        prompt
    }

    /// Build the policy-rule prompt for the document path
    pub fn build_rule_prompt(&self, text: &str) -> String {
        let mut prompt = self.header();
        prompt.push_str(
            "Extract the policy rules stated in the document below. A rule is a \
             normative statement: an obligation, prohibition, threshold, or \
             deadline. Keep the rule text faithful to the source and cite where \
             it appears.\n\n",
        );
        prompt.push_str("## Document Text\n---\n");
        prompt.push_str(text);
        prompt.push_str("\n---\n\n");
        prompt.push_str(RULE_OUTPUT_FORMAT);
        prompt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glossa_domain::{ColumnStats, SemanticType};

    fn profile(name: &str) -> ColumnProfile {
        ColumnProfile {
            name: name.to_string(),
            semantic_type: SemanticType::Number,
            samples: vec!["100".to_string(), "250".to_string()],
            null_count: 1,
            unique_count: 2,
            stats: Some(ColumnStats {
                min: 100.0,
                max: 250.0,
                mean: 175.0,
            }),
        }
    }

    fn column_details_section(prompt: &str) -> &str {
        let start = prompt.find("## Column Details").unwrap();
        let rest = &prompt[start..];
        let end = rest[1..].find("\n\n").map(|i| i + 1).unwrap_or(rest.len());
        &rest[..end]
    }

    #[test]
    fn test_prompt_includes_dataset_name_context_and_mode() {
        let prompt = PromptBuilder::new("Orders Q3")
            .with_business_context(Some("retail order book".to_string()))
            .with_mode(ExtractionMode::Comprehensive)
            .build_term_prompt(&[profile("amount")], "");

        assert!(prompt.contains("Dataset: Orders Q3"));
        assert!(prompt.contains("Business context: retail order book"));
        assert!(prompt.contains("Extraction mode: comprehensive"));
    }

    #[test]
    fn test_missing_context_line_is_omitted() {
        let prompt = PromptBuilder::new("Orders").build_term_prompt(&[profile("amount")], "");
        assert!(!prompt.contains("Business context:"));
    }

    #[test]
    fn test_column_details_lists_each_column_once() {
        let profiles: Vec<ColumnProfile> =
            (0..4).map(|i| profile(&format!("col_{}", i))).collect();
        let prompt = PromptBuilder::new("d").build_term_prompt(&profiles, "");

        let section = column_details_section(&prompt);
        let column_lines = section.lines().filter(|l| l.starts_with("- ")).count();
        assert_eq!(column_lines, 4);
        for p in &profiles {
            assert_eq!(section.matches(p.name.as_str()).count(), 1);
        }
    }

    #[test]
    fn test_column_line_carries_type_stats_and_samples() {
        let prompt = PromptBuilder::new("d").build_term_prompt(&[profile("amount")], "");
        assert!(prompt.contains("- amount (type: number, unique: 2, null: 1)"));
        assert!(prompt.contains("[min 100, max 250, mean 175.00]"));
        assert!(prompt.contains("samples: 100, 250"));
    }

    #[test]
    fn test_samples_capped_at_five() {
        let mut p = profile("c");
        p.samples = (0..8).map(|i| format!("sample_value_{}", i)).collect();
        let prompt = PromptBuilder::new("d").build_term_prompt(&[p], "");

        assert!(prompt.contains("sample_value_4"));
        assert!(!prompt.contains("sample_value_5"));
    }

    #[test]
    fn test_mode_changes_depth_instructions() {
        let basic = PromptBuilder::new("d").build_term_prompt(&[profile("c")], "");
        let comprehensive = PromptBuilder::new("d")
            .with_mode(ExtractionMode::Comprehensive)
            .build_term_prompt(&[profile("c")], "");

        assert!(basic.contains("primary business entities"));
        assert!(comprehensive.contains("derived concepts and relationships"));
    }

    #[test]
    fn test_document_branch_embeds_text_verbatim() {
        let prompt =
            PromptBuilder::new("Policy Manual").build_term_prompt(&[], "Retention is 7 years.");

        assert!(prompt.contains("## Document Text"));
        assert!(prompt.contains("Retention is 7 years."));
        assert!(prompt.contains("acronyms"));
        assert!(!prompt.contains("## Column Details"));
    }

    #[test]
    fn test_ground_rules_always_present() {
        let tabular = PromptBuilder::new("d").build_term_prompt(&[profile("c")], "");
        let document = PromptBuilder::new("d").build_term_prompt(&[], "text");

        for prompt in [tabular, document] {
            assert!(prompt.contains("Never define a term using the term itself"));
            assert!(prompt.contains("Expand acronyms"));
        }
    }

    #[test]
    fn test_rule_prompt_embeds_text_and_format() {
        let prompt = PromptBuilder::new("Policy Manual").build_rule_prompt("Section 1: rules.");
        assert!(prompt.contains("Section 1: rules."));
        assert!(prompt.contains("\"rules\""));
        assert!(prompt.contains("Dataset: Policy Manual"));
    }
}
