//! Column profiler - per-column summaries of a parsed row set

use crate::detect::detect_type;
use crate::rows::RowSet;
use glossa_domain::{ColumnProfile, ColumnStats};
use std::collections::HashSet;
use tracing::debug;

/// Inspection ceilings for one profiling call
#[derive(Debug, Clone, Copy)]
pub struct ProfileLimits {
    /// Rows inspected per call, regardless of total row count
    pub max_rows: usize,

    /// Distinct sample values retained per column
    pub sample_values: usize,

    /// Non-empty values handed to the type detector per column
    pub detection_sample: usize,
}

impl Default for ProfileLimits {
    fn default() -> Self {
        Self {
            max_rows: 1000,
            sample_values: 8,
            detection_sample: 100,
        }
    }
}

/// Result of profiling one table
#[derive(Debug, Clone)]
pub struct TableProfile {
    /// One profile per column, in header order
    pub columns: Vec<ColumnProfile>,

    /// Total rows in the input (including uninspected ones)
    pub total_rows: usize,

    /// Warnings produced during profiling
    pub warnings: Vec<String>,
}

/// Profile every column of a row set
///
/// Only the first `limits.max_rows` rows are inspected; exceeding that emits
/// a warning stating how many of how many rows were analyzed. An empty row
/// set yields an empty profile list, not an error.
pub fn profile_rows(rows: &RowSet, limits: &ProfileLimits) -> TableProfile {
    let total = rows.len();
    if total == 0 {
        return TableProfile {
            columns: Vec::new(),
            total_rows: 0,
            warnings: Vec::new(),
        };
    }

    let analyzed = total.min(limits.max_rows);
    let inspected = &rows.rows[..analyzed];

    let mut warnings = Vec::new();
    if total > limits.max_rows {
        warnings.push(format!("Analyzed first {} rows of {}", analyzed, total));
    }

    let columns = rows
        .columns
        .iter()
        .map(|name| profile_column(name, inspected, limits))
        .collect();

    debug!(
        "Profiled {} columns over {} of {} rows",
        rows.columns.len(),
        analyzed,
        total
    );

    TableProfile {
        columns,
        total_rows: total,
        warnings,
    }
}

fn profile_column(
    name: &str,
    inspected: &[std::collections::HashMap<String, String>],
    limits: &ProfileLimits,
) -> ColumnProfile {
    let mut null_count = 0usize;
    let mut seen: HashSet<String> = HashSet::new();
    let mut samples: Vec<String> = Vec::new();
    let mut detection_values: Vec<String> = Vec::new();
    let mut numeric_values: Vec<f64> = Vec::new();

    for row in inspected {
        let cell = row.get(name).map(|v| v.trim()).unwrap_or("");
        if cell.is_empty() {
            null_count += 1;
            continue;
        }

        if seen.insert(cell.to_string()) && samples.len() < limits.sample_values {
            samples.push(cell.to_string());
        }
        if detection_values.len() < limits.detection_sample {
            detection_values.push(cell.to_string());
        }
        if let Ok(parsed) = cell.parse::<f64>() {
            numeric_values.push(parsed);
        }
    }

    let semantic_type = detect_type(&detection_values);

    let stats = if semantic_type.is_numeric() && !numeric_values.is_empty() {
        let min = numeric_values.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = numeric_values
            .iter()
            .cloned()
            .fold(f64::NEG_INFINITY, f64::max);
        let mean = numeric_values.iter().sum::<f64>() / numeric_values.len() as f64;
        Some(ColumnStats { min, max, mean })
    } else {
        None
    };

    ColumnProfile {
        name: name.to_string(),
        semantic_type,
        samples,
        null_count,
        unique_count: seen.len(),
        stats,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glossa_domain::SemanticType;
    use std::collections::HashMap;

    fn row_set(columns: &[&str], rows: &[&[&str]]) -> RowSet {
        let columns: Vec<String> = columns.iter().map(|c| c.to_string()).collect();
        let rows = rows
            .iter()
            .map(|cells| {
                columns
                    .iter()
                    .cloned()
                    .zip(cells.iter().map(|c| c.to_string()))
                    .collect::<HashMap<_, _>>()
            })
            .collect();
        RowSet {
            columns: columns.clone(),
            rows,
        }
    }

    #[test]
    fn test_empty_row_set_yields_no_profiles() {
        let profile = profile_rows(&RowSet::default(), &ProfileLimits::default());
        assert!(profile.columns.is_empty());
        assert!(profile.warnings.is_empty());
    }

    #[test]
    fn test_numeric_column_stats() {
        // Scenario: 2 of 3 samples match the numeric pattern (67% ≥ 60%)
        let rows = row_set(&["amount"], &[&["100"], &["250"], &["abc"]]);
        let profile = profile_rows(&rows, &ProfileLimits::default());

        let amount = &profile.columns[0];
        assert_eq!(amount.semantic_type, SemanticType::Number);
        let stats = amount.stats.unwrap();
        assert_eq!(stats.min, 100.0);
        assert_eq!(stats.max, 250.0);
        assert_eq!(stats.mean, 175.0);
    }

    #[test]
    fn test_stats_bound_every_parsed_value() {
        let rows = row_set(&["n"], &[&["5"], &["17"], &["9"], &["3"]]);
        let profile = profile_rows(&rows, &ProfileLimits::default());
        let stats = profile.columns[0].stats.unwrap();

        for value in [5.0, 17.0, 9.0, 3.0] {
            assert!(stats.min <= value && value <= stats.max);
        }
    }

    #[test]
    fn test_non_numeric_column_has_no_stats() {
        let rows = row_set(&["name"], &[&["alpha"], &["beta"]]);
        let profile = profile_rows(&rows, &ProfileLimits::default());
        assert!(profile.columns[0].stats.is_none());
    }

    #[test]
    fn test_row_cap_warning_mentions_both_counts() {
        let cells: Vec<Vec<&str>> = (0..1500).map(|_| vec!["1"]).collect();
        let refs: Vec<&[&str]> = cells.iter().map(|r| r.as_slice()).collect();
        let rows = row_set(&["n"], &refs);

        let profile = profile_rows(&rows, &ProfileLimits::default());
        assert_eq!(profile.warnings.len(), 1);
        assert!(profile.warnings[0].contains("1000 rows of 1500"));
    }

    #[test]
    fn test_no_warning_under_the_cap() {
        let rows = row_set(&["n"], &[&["1"], &["2"]]);
        let profile = profile_rows(&rows, &ProfileLimits::default());
        assert!(profile.warnings.is_empty());
    }

    #[test]
    fn test_null_and_unique_counts() {
        let rows = row_set(
            &["c"],
            &[&["a"], &[""], &["a"], &["  "], &["b"]],
        );
        let profile = profile_rows(&rows, &ProfileLimits::default());
        let column = &profile.columns[0];

        assert_eq!(column.null_count, 2);
        assert_eq!(column.unique_count, 2);
        assert_eq!(column.samples, vec!["a", "b"]);
    }

    #[test]
    fn test_samples_keep_first_seen_order_up_to_cap() {
        let cells: Vec<Vec<String>> = (0..20).map(|i| vec![format!("v{}", i)]).collect();
        let rows = RowSet {
            columns: vec!["c".to_string()],
            rows: cells
                .iter()
                .map(|r| {
                    let mut m = HashMap::new();
                    m.insert("c".to_string(), r[0].clone());
                    m
                })
                .collect(),
        };

        let profile = profile_rows(&rows, &ProfileLimits::default());
        let samples = &profile.columns[0].samples;
        assert_eq!(samples.len(), 8);
        assert_eq!(samples[0], "v0");
        assert_eq!(samples[7], "v7");
    }

    #[test]
    fn test_absent_cells_count_as_null() {
        let mut rows = row_set(&["a", "b"], &[&["1", "2"]]);
        // Second row is missing column b entirely
        let mut partial = HashMap::new();
        partial.insert("a".to_string(), "3".to_string());
        rows.rows.push(partial);

        let profile = profile_rows(&rows, &ProfileLimits::default());
        let b = profile.columns.iter().find(|c| c.name == "b").unwrap();
        assert_eq!(b.null_count, 1);
    }
}
