//! Local hybrid ranking: weighted fusion of keyword and semantic scores.
//!
//! Both scorers run over client-held data only. The combiner keys an
//! accumulator by document id, takes each signal's 0–100 score, and merges
//! them with configurable weights:
//!
//! ```text
//! combined = round(keyword × w_k  +  semantic × w_s)
//! ```
//!
//! Results are sorted by combined score descending with a stable sort, so
//! ties keep the corpus order.

use std::collections::HashMap;

use crate::keyword::keyword_matches;
use crate::models::{EvidenceDoc, ScoredMatch};
use crate::semantic::semantic_matches;

/// Relative weight of each signal in the combined score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankWeights {
    pub keyword: f64,
    pub semantic: f64,
}

impl Default for RankWeights {
    fn default() -> Self {
        Self {
            keyword: 0.3,
            semantic: 0.7,
        }
    }
}

/// Pure keyword ranking.
///
/// Thin wrapper over the keyword scorer that clones the matching documents
/// and sorts them for display. Unweighted: scores are the scorer's own
/// normalized 0–100 values.
pub fn rank_keyword(query: &str, corpus: &[EvidenceDoc]) -> Vec<ScoredMatch> {
    let mut ranked: Vec<ScoredMatch> = keyword_matches(query, corpus)
        .into_iter()
        .map(|(doc, score)| ScoredMatch {
            doc: doc.clone(),
            score,
        })
        .collect();
    sort_desc(&mut ranked);
    ranked
}

/// Hybrid ranking over locally held signals.
///
/// The keyword scorer always runs; the semantic scorer runs only when a
/// query embedding is supplied, so without embeddings the ranking degrades
/// to keyword ordering with the keyword weight still applied.
///
/// Any document that matched at least one signal is returned, including
/// when the weighted combination rounds to zero — display cutoffs belong
/// to the caller, not the ranker.
pub fn rank_hybrid(
    query: &str,
    query_vec: Option<&[f32]>,
    corpus: &[EvidenceDoc],
    weights: RankWeights,
    min_similarity: f32,
) -> Vec<ScoredMatch> {
    #[derive(Default)]
    struct Signals {
        keyword: u8,
        semantic: u8,
    }

    let mut signals: HashMap<&str, Signals> = HashMap::new();

    for (doc, score) in keyword_matches(query, corpus) {
        signals.entry(doc.id.as_str()).or_default().keyword = score;
    }
    if let Some(qv) = query_vec {
        for (doc, score) in semantic_matches(qv, corpus, min_similarity) {
            signals.entry(doc.id.as_str()).or_default().semantic = score;
        }
    }

    // Walk the corpus rather than the map so ties resolve in corpus order.
    let mut ranked: Vec<ScoredMatch> = corpus
        .iter()
        .filter_map(|doc| {
            let s = signals.get(doc.id.as_str())?;
            let combined =
                f64::from(s.keyword) * weights.keyword + f64::from(s.semantic) * weights.semantic;
            Some(ScoredMatch {
                doc: doc.clone(),
                score: combined.round().clamp(0.0, 100.0) as u8,
            })
        })
        .collect();
    sort_desc(&mut ranked);
    ranked
}

/// Stable descending sort on score.
pub(crate) fn sort_desc(matches: &mut [ScoredMatch]) {
    matches.sort_by(|a, b| b.score.cmp(&a.score));
}
