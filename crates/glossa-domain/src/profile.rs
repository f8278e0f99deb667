//! Column profile module - per-column summaries of tabular files

use crate::SemanticType;
use serde::{Deserialize, Serialize};

/// Numeric statistics over a column's parseable values
///
/// Present only when the detected semantic type is numeric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColumnStats {
    /// Smallest parsed value
    pub min: f64,

    /// Largest parsed value
    pub max: f64,

    /// Arithmetic mean of parsed values
    pub mean: f64,
}

/// Statistical/type summary of one column
///
/// Created once per column per processing call and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnProfile {
    /// Column name from the header row
    pub name: String,

    /// Detected semantic type
    pub semantic_type: SemanticType,

    /// First-seen distinct non-empty stringified values, capped at a fixed
    /// sample count
    pub samples: Vec<String>,

    /// Count of null/empty cells among inspected rows
    pub null_count: usize,

    /// Count of distinct non-empty stringified values among inspected rows
    pub unique_count: usize,

    /// Numeric statistics, present only for numeric columns
    pub stats: Option<ColumnStats>,
}

impl ColumnProfile {
    /// Create a profile with no samples and no statistics
    pub fn new(name: impl Into<String>, semantic_type: SemanticType) -> Self {
        Self {
            name: name.into(),
            semantic_type,
            samples: Vec::new(),
            null_count: 0,
            unique_count: 0,
            stats: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_profile_is_empty() {
        let profile = ColumnProfile::new("amount", SemanticType::Number);
        assert_eq!(profile.name, "amount");
        assert!(profile.samples.is_empty());
        assert_eq!(profile.null_count, 0);
        assert!(profile.stats.is_none());
    }

    #[test]
    fn test_profile_serde_round_trip() {
        let profile = ColumnProfile {
            name: "amount".to_string(),
            semantic_type: SemanticType::Number,
            samples: vec!["100".to_string(), "250".to_string()],
            null_count: 1,
            unique_count: 2,
            stats: Some(ColumnStats {
                min: 100.0,
                max: 250.0,
                mean: 175.0,
            }),
        };

        let json = serde_json::to_string(&profile).unwrap();
        let back: ColumnProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(profile, back);
    }
}
