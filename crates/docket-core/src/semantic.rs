//! Embedding-similarity scoring over stored vectors.

use crate::models::{unit_to_display, EvidenceDoc};
use crate::similarity::cosine_similarity;

/// Default inclusion threshold on the raw 0–1 similarity.
pub const DEFAULT_MIN_SIMILARITY: f32 = 0.3;

/// Score documents by cosine similarity against a query embedding.
///
/// Documents without a stored embedding are silently skipped. The threshold
/// is inclusive and compared against the raw similarity, not the rounded
/// display score, so a document sitting exactly at the cutoff is kept.
/// The output is unordered; sorting happens in the combiners.
pub fn semantic_matches<'a>(
    query_vec: &[f32],
    corpus: &'a [EvidenceDoc],
    min_similarity: f32,
) -> Vec<(&'a EvidenceDoc, u8)> {
    corpus
        .iter()
        .filter_map(|doc| {
            let embedding = doc.embedding.as_deref()?;
            if embedding.is_empty() {
                return None;
            }
            let sim = cosine_similarity(query_vec, embedding);
            if sim >= min_similarity {
                Some((doc, unit_to_display(f64::from(sim))))
            } else {
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(id: &str, embedding: Option<Vec<f32>>) -> EvidenceDoc {
        EvidenceDoc {
            id: id.to_string(),
            vault_id: None,
            filename: format!("{id}.pdf"),
            category: "other".to_string(),
            summary: None,
            tags: Vec::new(),
            extracted_text: None,
            embedding,
            needs_sync: false,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_missing_embedding_is_skipped() {
        let corpus = vec![
            doc("a", None),
            doc("b", Some(vec![])),
            doc("c", Some(vec![1.0, 0.0])),
        ];
        let matches = semantic_matches(&[1.0, 0.0], &corpus, DEFAULT_MIN_SIMILARITY);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].0.id, "c");
        assert_eq!(matches[0].1, 100);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        // cos((1,0), (3,4)) = 3/5 = 0.6: exactly at the cutoff.
        let at = doc("at", Some(vec![3.0, 4.0]));
        // cos((1,0), (1,2)) = 1/√5 ≈ 0.447: below it.
        let below = doc("below", Some(vec![1.0, 2.0]));
        let corpus = vec![below, at];
        let matches = semantic_matches(&[1.0, 0.0], &corpus, 0.6);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].0.id, "at");
        assert_eq!(matches[0].1, 60);
    }

    #[test]
    fn test_dimension_mismatch_scores_zero_and_drops() {
        let corpus = vec![doc("bad", Some(vec![1.0, 0.0, 0.0]))];
        let matches = semantic_matches(&[1.0, 0.0], &corpus, 0.3);
        assert!(matches.is_empty());
    }

    #[test]
    fn test_zero_threshold_keeps_orthogonal() {
        let corpus = vec![doc("orth", Some(vec![0.0, 1.0]))];
        let matches = semantic_matches(&[1.0, 0.0], &corpus, 0.0);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].1, 0);
    }
}
