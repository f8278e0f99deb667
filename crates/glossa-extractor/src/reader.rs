//! Unstructured reader - plain text extraction from document formats

use crate::error::ExtractError;
use tracing::debug;

/// Share of the length cap after which a sentence boundary is an acceptable
/// truncation point
const SENTENCE_CUT_THRESHOLD: f64 = 0.8;

/// Extract plain text from raw bytes, truncated to `max_len` characters
///
/// PDFs (recognized by filename suffix or a media type containing "pdf") go
/// through the PDF text extractor; a failure there is fatal for the run, no
/// fallback is attempted. Everything else is decoded as UTF-8 text, lossily.
pub fn extract_text(
    bytes: &[u8],
    filename: &str,
    media_type: &str,
    max_len: usize,
) -> Result<String, ExtractError> {
    let text = if is_pdf(filename, media_type) {
        extract_pdf_text(bytes)?
    } else {
        String::from_utf8_lossy(bytes).into_owned()
    };

    debug!("Extracted {} chars from '{}'", text.chars().count(), filename);
    Ok(truncate_text(&text, max_len))
}

/// Whether the file should be treated as a PDF
pub fn is_pdf(filename: &str, media_type: &str) -> bool {
    filename.to_lowercase().ends_with(".pdf") || media_type.to_lowercase().contains("pdf")
}

#[cfg(feature = "pdf")]
fn extract_pdf_text(bytes: &[u8]) -> Result<String, ExtractError> {
    pdf_extract::extract_text_from_mem(bytes).map_err(|e| ExtractError::Pdf(e.to_string()))
}

#[cfg(not(feature = "pdf"))]
fn extract_pdf_text(_bytes: &[u8]) -> Result<String, ExtractError> {
    Err(ExtractError::PdfSupportDisabled)
}

/// Truncate text to `max_len` characters
///
/// Prefers cutting at the last sentence boundary (`.`) found after 80% of
/// the cap; otherwise hard-truncates and appends an ellipsis marker. Cuts
/// always land on character boundaries.
pub fn truncate_text(text: &str, max_len: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_len {
        return text.to_string();
    }

    let window = &chars[..max_len];
    let threshold = (max_len as f64 * SENTENCE_CUT_THRESHOLD) as usize;

    let sentence_cut = window
        .iter()
        .rposition(|&c| c == '.')
        .filter(|&position| position >= threshold);

    match sentence_cut {
        Some(position) => window[..=position].iter().collect(),
        None => {
            let mut truncated: String = window.iter().collect();
            truncated.push_str("...");
            truncated
        }
    }
}
