//! Semantic type module - the fixed enumeration of detected column types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Semantic type of a column, assigned by the type detector
///
/// The declaration order of the variants matters: it is the tie-break order
/// used when two types reach the same detection score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SemanticType {
    /// Email addresses
    Email,

    /// HTTP/HTTPS URLs
    Url,

    /// Phone numbers
    Phone,

    /// Opaque identifiers (uppercase alphanumeric codes)
    Id,

    /// Numeric values
    Number,

    /// Calendar dates
    Date,

    /// Boolean flags
    Boolean,

    /// Free-form text, or no single type won the vote
    String,

    /// No sample values were available to classify
    Unknown,
}

impl SemanticType {
    /// All variants in tie-break order
    pub const ALL: [SemanticType; 9] = [
        SemanticType::Email,
        SemanticType::Url,
        SemanticType::Phone,
        SemanticType::Id,
        SemanticType::Number,
        SemanticType::Date,
        SemanticType::Boolean,
        SemanticType::String,
        SemanticType::Unknown,
    ];

    /// Get the type name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            SemanticType::Email => "email",
            SemanticType::Url => "url",
            SemanticType::Phone => "phone",
            SemanticType::Id => "id",
            SemanticType::Number => "number",
            SemanticType::Date => "date",
            SemanticType::Boolean => "boolean",
            SemanticType::String => "string",
            SemanticType::Unknown => "unknown",
        }
    }

    /// Parse a type from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "email" => Some(SemanticType::Email),
            "url" => Some(SemanticType::Url),
            "phone" => Some(SemanticType::Phone),
            "id" => Some(SemanticType::Id),
            "number" => Some(SemanticType::Number),
            "date" => Some(SemanticType::Date),
            "boolean" => Some(SemanticType::Boolean),
            "string" => Some(SemanticType::String),
            "unknown" => Some(SemanticType::Unknown),
            _ => None,
        }
    }

    /// Whether columns of this type carry numeric statistics
    pub fn is_numeric(&self) -> bool {
        matches!(self, SemanticType::Number)
    }
}

impl std::str::FromStr for SemanticType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid semantic type: {}", s))
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        for t in SemanticType::ALL {
            assert_eq!(SemanticType::parse(t.as_str()), Some(t));
        }
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(SemanticType::parse("EMAIL"), Some(SemanticType::Email));
        assert_eq!(SemanticType::parse("Number"), Some(SemanticType::Number));
    }

    #[test]
    fn test_only_number_is_numeric() {
        for t in SemanticType::ALL {
            assert_eq!(t.is_numeric(), t == SemanticType::Number);
        }
    }

    #[test]
    fn test_parse_rejects_unknown_names() {
        assert_eq!(SemanticType::parse("integer"), None);
    }
}
