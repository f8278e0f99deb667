//! Semantic type detection over sampled column values
//!
//! The detector scores a bounded sample of non-empty strings against an
//! ordered list of regular-expression recognizers and picks one winning type.
//! Both the recognizer priority order and the 60% win threshold are part of
//! the contract: a value that matches the phone pattern and the numeric
//! pattern is recorded as phone because phone is tested first, and a column
//! whose best score stays below the threshold is plain `string`.

use glossa_domain::SemanticType;
use once_cell::sync::Lazy;
use regex::Regex;

/// Detection inspects at most this many sample values
pub const DETECTOR_SAMPLE_CAP: usize = 50;

/// A type must win at least this share of the capped sample to be assigned
pub const MATCH_THRESHOLD: f64 = 0.6;

/// Recognizers in priority order; the first match wins for each value
///
/// Note that a purely numeric string of 6+ digits matches the id pattern
/// before the number pattern because id is tested earlier, and 7+ digit
/// strings match phone before either. Hyphenated ISO dates (`2024-01-15`)
/// also land in the id bucket, since the id character class admits digits and
/// hyphens and the date fallback only sees values no recognizer claimed.
/// Consumers depend on these tie-breaks, so the order must not be rearranged.
static RECOGNIZERS: Lazy<Vec<(SemanticType, Regex)>> = Lazy::new(|| {
    vec![
        (
            SemanticType::Email,
            Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap(),
        ),
        (SemanticType::Url, Regex::new(r"^https?://\S+$").unwrap()),
        (
            SemanticType::Phone,
            Regex::new(r"^\+?\(?\d{3}\)?[-\s]?\d{3}[-\s]?\d{4,6}$|^\+?\d{7,15}$").unwrap(),
        ),
        (SemanticType::Id, Regex::new(r"^[A-Z0-9_-]{6,}$").unwrap()),
        (
            SemanticType::Number,
            Regex::new(r"^-?\d+(\.\d+)?$").unwrap(),
        ),
        (
            SemanticType::Boolean,
            Regex::new(r"(?i)^(true|false|yes|no|y|n)$").unwrap(),
        ),
    ]
});

/// Scoring slots in tie-break order
const TIE_BREAK_ORDER: [SemanticType; 7] = [
    SemanticType::Email,
    SemanticType::Url,
    SemanticType::Phone,
    SemanticType::Id,
    SemanticType::Number,
    SemanticType::Date,
    SemanticType::Boolean,
];

/// Run a single value through the recognizer list
///
/// Returns the first recognizer that matches the trimmed value, or `None`.
/// The date fallback is not part of this list; it applies only inside
/// [`detect_type`] to values no recognizer claimed.
pub fn recognize(value: &str) -> Option<SemanticType> {
    let trimmed = value.trim();
    RECOGNIZERS
        .iter()
        .find(|(_, pattern)| pattern.is_match(trimmed))
        .map(|(semantic_type, _)| *semantic_type)
}

/// Whether a value parses as a calendar date in any accepted format
pub fn looks_like_date(value: &str) -> bool {
    const DATE_FORMATS: [&str; 6] = [
        "%Y-%m-%d",
        "%Y/%m/%d",
        "%m/%d/%Y",
        "%d.%m.%Y",
        "%B %d, %Y",
        "%d %b %Y",
    ];

    if chrono::DateTime::parse_from_rfc3339(value).is_ok() {
        return true;
    }
    DATE_FORMATS
        .iter()
        .any(|format| chrono::NaiveDate::parse_from_str(value, format).is_ok())
}

/// Classify a sample of non-empty strings into one semantic type
///
/// Deterministic and order-independent apart from the documented sample cap:
/// only the first [`DETECTOR_SAMPLE_CAP`] values are scored.
pub fn detect_type(samples: &[String]) -> SemanticType {
    if samples.is_empty() {
        return SemanticType::Unknown;
    }

    let capped = &samples[..samples.len().min(DETECTOR_SAMPLE_CAP)];
    let mut scores = [0usize; TIE_BREAK_ORDER.len()];

    for value in capped {
        let trimmed = value.trim();
        if let Some(matched) = recognize(trimmed) {
            scores[score_slot(matched)] += 1;
        } else if trimmed.chars().count() > 6 && looks_like_date(trimmed) {
            scores[score_slot(SemanticType::Date)] += 1;
        }
        // Values matching nothing increment no score
    }

    let max_score = *scores.iter().max().unwrap_or(&0);
    if (max_score as f64) < MATCH_THRESHOLD * capped.len() as f64 {
        return SemanticType::String;
    }

    let winner = scores
        .iter()
        .position(|&score| score == max_score)
        .unwrap_or(0);
    TIE_BREAK_ORDER[winner]
}

fn score_slot(semantic_type: SemanticType) -> usize {
    TIE_BREAK_ORDER
        .iter()
        .position(|&t| t == semantic_type)
        .unwrap_or(0)
}
