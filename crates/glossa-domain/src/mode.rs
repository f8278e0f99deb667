//! Extraction mode module - prompt depth selection

use serde::{Deserialize, Serialize};
use std::fmt;

/// Depth of the requested extraction
///
/// The mode changes prompt verbosity and target depth only; it never changes
/// the pipeline's control flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionMode {
    /// Primary entities only
    #[default]
    Basic,

    /// Also include derived and relationship concepts
    Comprehensive,
}

impl ExtractionMode {
    /// Get the mode name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionMode::Basic => "basic",
            ExtractionMode::Comprehensive => "comprehensive",
        }
    }

    /// Parse a mode from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "basic" => Some(ExtractionMode::Basic),
            "comprehensive" => Some(ExtractionMode::Comprehensive),
            _ => None,
        }
    }
}

impl std::str::FromStr for ExtractionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid extraction mode: {}", s))
    }
}

impl fmt::Display for ExtractionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_basic() {
        assert_eq!(ExtractionMode::default(), ExtractionMode::Basic);
    }

    #[test]
    fn test_round_trip() {
        for mode in [ExtractionMode::Basic, ExtractionMode::Comprehensive] {
            assert_eq!(ExtractionMode::parse(mode.as_str()), Some(mode));
        }
    }
}
