//! Weighted field matching for keyword search.
//!
//! Matching is case-insensitive substring containment — not tokenized, not
//! fuzzy. Each field contributes its points at most once per document no
//! matter how many times the query occurs in it.

use crate::models::EvidenceDoc;

/// Points awarded when the filename contains the query.
const FILENAME_POINTS: u32 = 50;
/// Points awarded when the summary contains the query.
const SUMMARY_POINTS: u32 = 30;
/// Points awarded when any tag contains the query.
const TAG_POINTS: u32 = 20;
/// Points awarded when the extracted text contains the query.
const TEXT_POINTS: u32 = 10;
/// Raw total with all four fields matching.
const MAX_POINTS: u32 = FILENAME_POINTS + SUMMARY_POINTS + TAG_POINTS + TEXT_POINTS;

/// Raw match score for one document.
///
/// An empty query is contained in every string, so it matches every present
/// field — callers treat an empty query as "no filtering".
pub fn raw_score(query: &str, doc: &EvidenceDoc) -> u32 {
    let needle = query.to_lowercase();
    let mut points = 0;

    if doc.filename.to_lowercase().contains(&needle) {
        points += FILENAME_POINTS;
    }
    if let Some(summary) = &doc.summary {
        if summary.to_lowercase().contains(&needle) {
            points += SUMMARY_POINTS;
        }
    }
    if doc.tags.iter().any(|t| t.to_lowercase().contains(&needle)) {
        points += TAG_POINTS;
    }
    if let Some(text) = &doc.extracted_text {
        if text.to_lowercase().contains(&needle) {
            points += TEXT_POINTS;
        }
    }

    points
}

/// Normalize a raw point total onto the 0–100 display scale.
pub fn normalize(points: u32) -> u8 {
    ((f64::from(points) / f64::from(MAX_POINTS)) * 100.0).round() as u8
}

/// Score every document in the corpus against the query.
///
/// Documents with no matching field are omitted entirely rather than
/// returned with score 0. The output is unordered; sorting happens in the
/// combiners.
pub fn keyword_matches<'a>(
    query: &str,
    corpus: &'a [EvidenceDoc],
) -> Vec<(&'a EvidenceDoc, u8)> {
    corpus
        .iter()
        .filter_map(|doc| {
            let points = raw_score(query, doc);
            if points == 0 {
                None
            } else {
                Some((doc, normalize(points)))
            }
        })
        .collect()
}
