//! Vault-assisted ranking.
//!
//! The vault service performs its own keyword + vector fusion and returns
//! per-object relevance in `[0, 1]`. This module re-maps those scores onto
//! locally held metadata: hits that resolve to a local record are gated by
//! category/tag filters against the real metadata, and hits with no local
//! record are surfaced as placeholders flagged `needs_sync`.
//!
//! One vault call per search invocation; no fan-out, no retries here.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::hybrid::sort_desc;
use crate::models::{unit_to_display, EvidenceDoc, ScoredMatch, SearchFilters, VaultHit};
use crate::store::MetadataStore;

/// Fusion method requested from the vault.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VaultMethod {
    /// Vector + keyword fusion (the default).
    #[default]
    Hybrid,
    /// Keyword-only, lowest latency.
    Fast,
    /// Neighborhood-scoped vector search.
    Local,
    /// Corpus-wide vector search.
    Global,
}

impl VaultMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            VaultMethod::Hybrid => "hybrid",
            VaultMethod::Fast => "fast",
            VaultMethod::Local => "local",
            VaultMethod::Global => "global",
        }
    }

    /// Parse a configuration/CLI string.
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "hybrid" => Ok(VaultMethod::Hybrid),
            "fast" => Ok(VaultMethod::Fast),
            "local" => Ok(VaultMethod::Local),
            "global" => Ok(VaultMethod::Global),
            other => anyhow::bail!(
                "Unknown vault method: {}. Use hybrid, fast, local, or global.",
                other
            ),
        }
    }
}

/// Options forwarded to the vault on every search call.
#[derive(Debug, Clone)]
pub struct VaultSearchOptions {
    pub method: VaultMethod,
    /// Result-count cap requested from the vault.
    pub limit: usize,
    /// Recall floor passed to the vault. Kept very low so that local
    /// filtering, not the vault, is the relevance gate.
    pub min_score: f64,
}

impl Default for VaultSearchOptions {
    fn default() -> Self {
        Self {
            method: VaultMethod::Hybrid,
            limit: 30,
            min_score: 0.01,
        }
    }
}

/// A collaborator that executes fused search remotely.
///
/// Implementations own transport concerns (timeouts included); this crate
/// only sees `Ok(hits)` or an error to surface to the caller boundary.
#[async_trait]
pub trait VaultSearch: Send + Sync {
    async fn search(&self, query: &str, opts: &VaultSearchOptions) -> Result<Vec<VaultHit>>;
}

/// Rank vault hits against local metadata.
///
/// Convenience wrapper: one vault call, then [`rank_vault_hits`]. Zero hits
/// is a valid outcome; falling back to local ranking is the caller's
/// decision (made on the raw hit count, which is why [`rank_vault_hits`]
/// is also public). Vault transport errors propagate unchanged.
pub async fn rank_vault<V, S>(
    vault: &V,
    store: &S,
    query: &str,
    filters: &SearchFilters,
    opts: &VaultSearchOptions,
) -> Result<Vec<ScoredMatch>>
where
    V: VaultSearch + ?Sized,
    S: MetadataStore + ?Sized,
{
    let hits = vault.search(query, opts).await?;
    rank_vault_hits(hits, store, filters).await
}

/// Map already-fetched vault hits onto local metadata.
///
/// For each hit, the vault's `[0, 1]` relevance becomes a 0–100 display
/// score, and the hit's object id is resolved through the store:
///
/// - resolved → the local record is gated by `filters` against its real
///   category and tags;
/// - unresolved → a `needs_sync` placeholder (category `"other"`, no tags)
///   goes through the same gate, which means a category filter keeps the
///   orphan only when it includes `"other"`, and any active tag filter
///   drops it.
pub async fn rank_vault_hits<S>(
    hits: Vec<VaultHit>,
    store: &S,
    filters: &SearchFilters,
) -> Result<Vec<ScoredMatch>>
where
    S: MetadataStore + ?Sized,
{
    let mut ranked = Vec::with_capacity(hits.len());
    for hit in hits {
        let score = unit_to_display(hit.score);
        let doc = match store.find_by_vault_id(&hit.object_id).await? {
            Some(doc) => doc,
            None => EvidenceDoc::placeholder(&hit.object_id, hit.snippet),
        };
        if filters.allows(&doc) {
            ranked.push(ScoredMatch { doc, score });
        }
    }

    sort_desc(&mut ranked);
    Ok(ranked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::InMemoryStore;

    struct FixedVault {
        hits: Vec<VaultHit>,
    }

    #[async_trait]
    impl VaultSearch for FixedVault {
        async fn search(&self, _query: &str, _opts: &VaultSearchOptions) -> Result<Vec<VaultHit>> {
            Ok(self.hits.clone())
        }
    }

    struct BrokenVault;

    #[async_trait]
    impl VaultSearch for BrokenVault {
        async fn search(&self, _query: &str, _opts: &VaultSearchOptions) -> Result<Vec<VaultHit>> {
            anyhow::bail!("connection refused")
        }
    }

    fn hit(object_id: &str, score: f64) -> VaultHit {
        VaultHit {
            object_id: object_id.to_string(),
            score,
            snippet: None,
        }
    }

    fn local_doc(id: &str, vault_id: &str, category: &str, tags: &[&str]) -> EvidenceDoc {
        EvidenceDoc {
            id: id.to_string(),
            vault_id: Some(vault_id.to_string()),
            filename: format!("{id}.pdf"),
            category: category.to_string(),
            summary: None,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            extracted_text: None,
            embedding: None,
            needs_sync: false,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[tokio::test]
    async fn test_resolved_hit_uses_local_metadata() {
        let store =
            InMemoryStore::with_docs(vec![local_doc("1", "v1", "contract", &["lease"])]);
        let vault = FixedVault {
            hits: vec![hit("v1", 0.85)],
        };
        let ranked = rank_vault(
            &vault,
            &store,
            "lease",
            &SearchFilters::default(),
            &VaultSearchOptions::default(),
        )
        .await
        .unwrap();
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].doc.id, "1");
        assert_eq!(ranked[0].doc.category, "contract");
        assert_eq!(ranked[0].score, 85);
        assert!(!ranked[0].doc.needs_sync);
    }

    #[tokio::test]
    async fn test_orphan_becomes_placeholder() {
        let store = InMemoryStore::new();
        let vault = FixedVault {
            hits: vec![VaultHit {
                object_id: "r1".to_string(),
                score: 0.92,
                snippet: Some("…lease term…".to_string()),
            }],
        };
        let ranked = rank_vault(
            &vault,
            &store,
            "lease",
            &SearchFilters::default(),
            &VaultSearchOptions::default(),
        )
        .await
        .unwrap();
        assert_eq!(ranked.len(), 1);
        let m = &ranked[0];
        assert_eq!(m.score, 92);
        assert!(m.doc.needs_sync);
        assert_eq!(m.doc.category, "other");
        assert!(m.doc.tags.is_empty());
        assert_eq!(m.doc.summary.as_deref(), Some("…lease term…"));
    }

    #[tokio::test]
    async fn test_category_filter_on_orphans() {
        let store = InMemoryStore::new();
        let vault = FixedVault {
            hits: vec![hit("r1", 0.5)],
        };

        // filter=["other"] keeps the orphan
        let kept = rank_vault(
            &vault,
            &store,
            "q",
            &SearchFilters {
                categories: vec!["other".to_string()],
                tags: vec![],
            },
            &VaultSearchOptions::default(),
        )
        .await
        .unwrap();
        assert_eq!(kept.len(), 1);

        // filter=["contract"] drops it
        let dropped = rank_vault(
            &vault,
            &store,
            "q",
            &SearchFilters {
                categories: vec!["contract".to_string()],
                tags: vec![],
            },
            &VaultSearchOptions::default(),
        )
        .await
        .unwrap();
        assert!(dropped.is_empty());
    }

    #[tokio::test]
    async fn test_tag_filter_always_drops_orphans() {
        let store = InMemoryStore::new();
        let vault = FixedVault {
            hits: vec![hit("r1", 0.99)],
        };
        let ranked = rank_vault(
            &vault,
            &store,
            "q",
            &SearchFilters {
                categories: vec![],
                tags: vec!["lease".to_string()],
            },
            &VaultSearchOptions::default(),
        )
        .await
        .unwrap();
        assert!(ranked.is_empty());
    }

    #[tokio::test]
    async fn test_tag_filter_applies_to_resolved_hits() {
        let store = InMemoryStore::with_docs(vec![
            local_doc("1", "v1", "contract", &["lease"]),
            local_doc("2", "v2", "contract", &["invoice"]),
        ]);
        let vault = FixedVault {
            hits: vec![hit("v1", 0.4), hit("v2", 0.9)],
        };
        let ranked = rank_vault(
            &vault,
            &store,
            "q",
            &SearchFilters {
                categories: vec![],
                tags: vec!["lease".to_string()],
            },
            &VaultSearchOptions::default(),
        )
        .await
        .unwrap();
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].doc.id, "1");
    }

    #[tokio::test]
    async fn test_results_sorted_descending() {
        let store = InMemoryStore::new();
        let vault = FixedVault {
            hits: vec![hit("a", 0.2), hit("b", 0.9), hit("c", 0.5)],
        };
        let ranked = rank_vault(
            &vault,
            &store,
            "q",
            &SearchFilters::default(),
            &VaultSearchOptions::default(),
        )
        .await
        .unwrap();
        let scores: Vec<u8> = ranked.iter().map(|m| m.score).collect();
        assert_eq!(scores, vec![90, 50, 20]);
    }

    #[tokio::test]
    async fn test_zero_hits_is_not_an_error() {
        let store = InMemoryStore::new();
        let vault = FixedVault { hits: vec![] };
        let ranked = rank_vault(
            &vault,
            &store,
            "q",
            &SearchFilters::default(),
            &VaultSearchOptions::default(),
        )
        .await
        .unwrap();
        assert!(ranked.is_empty());
    }

    #[tokio::test]
    async fn test_transport_error_propagates() {
        let store = InMemoryStore::new();
        let err = rank_vault(
            &BrokenVault,
            &store,
            "q",
            &SearchFilters::default(),
            &VaultSearchOptions::default(),
        )
        .await;
        assert!(err.is_err());
    }

    #[test]
    fn test_method_parse_roundtrip() {
        for m in [
            VaultMethod::Hybrid,
            VaultMethod::Fast,
            VaultMethod::Local,
            VaultMethod::Global,
        ] {
            assert_eq!(VaultMethod::parse(m.as_str()).unwrap(), m);
        }
        assert!(VaultMethod::parse("bm25").is_err());
    }
}
