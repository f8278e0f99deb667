//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use glossa_domain::{ColumnProfile, Dataset, GlossaryTerm, PolicyRule, ProcessingStatus};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Width at which long text cells are cut in table output.
const CELL_WIDTH: usize = 60;

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format glossary terms.
    pub fn format_terms(&self, terms: &[GlossaryTerm]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(terms)?),
            OutputFormat::Quiet => Ok(terms
                .iter()
                .map(|t| t.name.clone())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => self.format_terms_table(terms),
        }
    }

    fn format_terms_table(&self, terms: &[GlossaryTerm]) -> Result<String> {
        if terms.is_empty() {
            return Ok(self.colorize("No terms found.", "yellow"));
        }

        let mut builder = Builder::default();
        builder.push_record(["Term", "Category", "Confidence", "Synonyms", "Definition"]);

        for term in terms {
            builder.push_record([
                &term.name,
                &term.category,
                &format!("{:.2}", term.confidence),
                &term.synonyms.join(", "),
                &truncate_cell(&term.definition),
            ]);
        }

        Ok(finish_table(builder))
    }

    /// Format policy rules.
    pub fn format_rules(&self, rules: &[PolicyRule]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(rules)?),
            OutputFormat::Quiet => Ok(rules
                .iter()
                .map(|r| r.code.clone().unwrap_or_else(|| "-".to_string()))
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => self.format_rules_table(rules),
        }
    }

    fn format_rules_table(&self, rules: &[PolicyRule]) -> Result<String> {
        if rules.is_empty() {
            return Ok(self.colorize("No rules found.", "yellow"));
        }

        let mut builder = Builder::default();
        builder.push_record(["Code", "Severity", "Tags", "Rule"]);

        for rule in rules {
            builder.push_record([
                rule.code.as_deref().unwrap_or("-"),
                rule.severity.as_deref().unwrap_or("-"),
                &rule.tags.join(", "),
                &truncate_cell(&rule.text),
            ]);
        }

        Ok(finish_table(builder))
    }

    /// Format the dataset listing.
    pub fn format_datasets(&self, datasets: &[Dataset]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(datasets)?),
            OutputFormat::Quiet => Ok(datasets
                .iter()
                .map(|d| d.id.to_string())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => self.format_datasets_table(datasets),
        }
    }

    fn format_datasets_table(&self, datasets: &[Dataset]) -> Result<String> {
        if datasets.is_empty() {
            return Ok(self.colorize("No datasets registered.", "yellow"));
        }

        let mut builder = Builder::default();
        builder.push_record(["ID", "Name", "File", "Status", "Created"]);

        for dataset in datasets {
            builder.push_record([
                // Truncated for readability; commands accept unique prefixes
                &dataset.id.to_string()[..8],
                &dataset.name,
                &dataset.filename,
                &self.status_label(dataset.status),
                &format_timestamp(dataset.created_at),
            ]);
        }

        Ok(finish_table(builder))
    }

    /// Format column profiles.
    pub fn format_profiles(&self, profiles: &[ColumnProfile]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(profiles)?),
            OutputFormat::Quiet => Ok(profiles
                .iter()
                .map(|p| p.name.clone())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => self.format_profiles_table(profiles),
        }
    }

    fn format_profiles_table(&self, profiles: &[ColumnProfile]) -> Result<String> {
        if profiles.is_empty() {
            return Ok(self.colorize("No columns profiled.", "yellow"));
        }

        let mut builder = Builder::default();
        builder.push_record(["Column", "Type", "Unique", "Nulls", "Stats", "Samples"]);

        for profile in profiles {
            let stats = profile
                .stats
                .map(|s| format!("min {} / max {} / mean {:.2}", s.min, s.max, s.mean))
                .unwrap_or_else(|| "-".to_string());
            builder.push_record([
                &profile.name,
                profile.semantic_type.as_str(),
                &profile.unique_count.to_string(),
                &profile.null_count.to_string(),
                &stats,
                &truncate_cell(&profile.samples.join(", ")),
            ]);
        }

        Ok(finish_table(builder))
    }

    /// Format a status line for one dataset.
    pub fn format_status(
        &self,
        status: ProcessingStatus,
        message: Option<&str>,
    ) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&serde_json::json!({
                "status": status,
                "message": message,
            }))?),
            OutputFormat::Quiet => Ok(status.as_str().to_string()),
            OutputFormat::Table => {
                let mut line = self.status_label(status);
                if let Some(message) = message {
                    line.push_str(&format!(" - {}", message));
                }
                Ok(line)
            }
        }
    }

    fn status_label(&self, status: ProcessingStatus) -> String {
        let color = match status {
            ProcessingStatus::Pending => "yellow",
            ProcessingStatus::Processing => "cyan",
            ProcessingStatus::Completed => "green",
            ProcessingStatus::Failed => "red",
        };
        self.colorize(status.as_str(), color)
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}

fn finish_table(builder: Builder) -> String {
    let mut table = builder.build();
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));
    table.to_string()
}

fn truncate_cell(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= CELL_WIDTH {
        text.to_string()
    } else {
        let mut cell: String = chars[..CELL_WIDTH].iter().collect();
        cell.push('…');
        cell
    }
}

/// Render a Unix-seconds timestamp as a local-independent date string.
fn format_timestamp(secs: u64) -> String {
    chrono::DateTime::from_timestamp(secs as i64, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| secs.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glossa_domain::{DatasetId, SemanticType};

    fn test_term() -> GlossaryTerm {
        let mut term =
            GlossaryTerm::new("Customer ID", "Unique key for a customer").with_confidence(0.9);
        term.synonyms = vec!["Client ID".to_string()];
        term.category = "customer".to_string();
        term
    }

    #[test]
    fn test_terms_table() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_terms(&[test_term()]).unwrap();
        assert!(output.contains("Customer ID"));
        assert!(output.contains("0.90"));
        assert!(output.contains("Client ID"));
    }

    #[test]
    fn test_terms_json() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.format_terms(&[test_term()]).unwrap();
        assert!(output.contains("\"definition\""));
    }

    #[test]
    fn test_terms_quiet() {
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let output = formatter.format_terms(&[test_term()]).unwrap();
        assert_eq!(output, "Customer ID");
    }

    #[test]
    fn test_empty_terms() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_terms(&[]).unwrap();
        assert!(output.contains("No terms found"));
    }

    #[test]
    fn test_profiles_table() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let mut profile = ColumnProfile::new("amount", SemanticType::Number);
        profile.samples = vec!["100".to_string()];
        profile.unique_count = 1;

        let output = formatter.format_profiles(&[profile]).unwrap();
        assert!(output.contains("amount"));
        assert!(output.contains("number"));
    }

    #[test]
    fn test_datasets_table_truncates_id() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let dataset = glossa_domain::Dataset::new(
            DatasetId::new(),
            "Orders".to_string(),
            "orders.csv".to_string(),
            "text/csv".to_string(),
            10,
            "uploads/orders.csv".to_string(),
            1_700_000_000,
        );
        let full_id = dataset.id.to_string();

        let output = formatter.format_datasets(&[dataset]).unwrap();
        assert!(output.contains(&full_id[..8]));
        assert!(!output.contains(&full_id));
    }

    #[test]
    fn test_status_line_with_message() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter
            .format_status(ProcessingStatus::Failed, Some("model overloaded"))
            .unwrap();
        assert_eq!(output, "failed - model overloaded");
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert_eq!(formatter.success("test"), "✓ test");
    }

    #[test]
    fn test_truncate_cell() {
        let long = "x".repeat(100);
        let cell = truncate_cell(&long);
        assert_eq!(cell.chars().count(), CELL_WIDTH + 1);
        assert!(cell.ends_with('…'));
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0), "1970-01-01 00:00");
    }
}
