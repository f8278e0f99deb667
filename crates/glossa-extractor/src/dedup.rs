//! Term deduplication and merging
//!
//! Terms are keyed by trimmed, lowercased name. The first occurrence of a key
//! anchors the merged term; later duplicates fold into it. Merging keeps the
//! longer definition, unions the set-valued fields, and takes the maximum
//! confidence, with the first-seen value winning every tie.

use glossa_domain::GlossaryTerm;
use std::collections::HashMap;
use tracing::debug;

/// Deduplicate terms by normalized name, then sort by descending confidence
///
/// The sort is stable, so equal-confidence terms keep their first-seen
/// relative order.
pub fn dedup_terms(terms: Vec<GlossaryTerm>) -> Vec<GlossaryTerm> {
    let input_len = terms.len();
    let mut order: Vec<String> = Vec::new();
    let mut merged: HashMap<String, GlossaryTerm> = HashMap::new();

    for term in terms {
        let key = term.normalized_name();
        match merged.get_mut(&key) {
            Some(existing) => merge_into(existing, term),
            None => {
                order.push(key.clone());
                merged.insert(key, term);
            }
        }
    }

    let mut result: Vec<GlossaryTerm> = order
        .into_iter()
        .map(|key| merged.remove(&key).unwrap())
        .collect();
    result.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    if result.len() < input_len {
        debug!("Merged {} terms into {}", input_len, result.len());
    }
    result
}

/// Fold `incoming` into `existing` (the first-seen term for this key)
fn merge_into(existing: &mut GlossaryTerm, incoming: GlossaryTerm) {
    // Strictly longer wins; ties keep the first-seen definition
    if incoming.definition.len() > existing.definition.len() {
        existing.definition = incoming.definition;
    }

    union_into(&mut existing.source_columns, incoming.source_columns);
    union_into(&mut existing.data_types, incoming.data_types);
    union_into(&mut existing.sample_values, incoming.sample_values);
    union_into(&mut existing.synonyms, incoming.synonyms);

    if incoming.confidence > existing.confidence {
        existing.confidence = incoming.confidence;
    }

    // Linkage keeps the first-seen side when set; otherwise the duplicate's
    // linkage fills the gap rather than being dropped
    if existing.dataset_id.is_none() {
        existing.dataset_id = incoming.dataset_id;
    }
    if existing.source_file.is_none() {
        existing.source_file = incoming.source_file;
    }
}

/// Append values not already present, preserving first-seen order
fn union_into(target: &mut Vec<String>, incoming: Vec<String>) {
    for value in incoming {
        if !target.contains(&value) {
            target.push(value);
        }
    }
}
