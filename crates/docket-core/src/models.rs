//! Core data models for the evidence catalog.
//!
//! Every signal the rankers consume lives in an explicit field on
//! [`EvidenceDoc`]; a `None` means the signal is absent for that document,
//! which is a valid state, never an error.

use serde::{Deserialize, Serialize};

/// Category assigned to documents the classifier has not labeled, and to
/// placeholders synthesized from unresolved vault hits.
pub const DEFAULT_CATEGORY: &str = "other";

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

/// Locally held metadata for one evidence document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvidenceDoc {
    /// Local primary key.
    pub id: String,
    /// Object identifier assigned by the vault service. A separate identifier
    /// space from `id`; vault search results resolve against this field only.
    #[serde(default)]
    pub vault_id: Option<String>,
    /// Original filename of the uploaded document.
    pub filename: String,
    /// Classification category (`"contract"`, `"correspondence"`, ...).
    #[serde(default = "default_category")]
    pub category: String,
    /// One-paragraph summary produced by classification.
    #[serde(default)]
    pub summary: Option<String>,
    /// User- and classifier-assigned tags, in insertion order.
    #[serde(default)]
    pub tags: Vec<String>,
    /// OCR text, possibly truncated.
    #[serde(default)]
    pub extracted_text: Option<String>,
    /// Precomputed embedding vector; fixed dimensionality per corpus.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
    /// Set on records synthesized from vault hits that have no local
    /// metadata yet; cleared once the record is reconciled.
    #[serde(default)]
    pub needs_sync: bool,
    /// Unix timestamp of record creation.
    #[serde(default)]
    pub created_at: i64,
    /// Unix timestamp of the last metadata update.
    #[serde(default)]
    pub updated_at: i64,
}

impl EvidenceDoc {
    /// Placeholder for a vault object the local catalog has not seen.
    ///
    /// Carries the default category and no tags, so filter gates treat it
    /// exactly like an unclassified local record.
    pub fn placeholder(vault_object_id: &str, snippet: Option<String>) -> Self {
        Self {
            id: vault_object_id.to_string(),
            vault_id: Some(vault_object_id.to_string()),
            filename: vault_object_id.to_string(),
            category: default_category(),
            summary: snippet,
            tags: Vec::new(),
            extracted_text: None,
            embedding: None,
            needs_sync: true,
            created_at: 0,
            updated_at: 0,
        }
    }
}

/// A document paired with its display score.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredMatch {
    pub doc: EvidenceDoc,
    /// Integer relevance in `0..=100`.
    pub score: u8,
}

/// One result from the vault's own fused (keyword + vector) search.
///
/// `object_id` may name a document with no corresponding [`EvidenceDoc`];
/// such orphans are expected whenever ingestion outpaces metadata sync.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultHit {
    pub object_id: String,
    /// Vault relevance in `[0, 1]`.
    pub score: f64,
    /// Matched-text excerpt, when the vault provides one.
    #[serde(default)]
    pub snippet: Option<String>,
}

/// Category/tag gates applied after scoring. Empty lists are inactive.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchFilters {
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl SearchFilters {
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty() && self.tags.is_empty()
    }

    /// Whether a document passes the active gates.
    ///
    /// Categories and tags match by case-insensitive equality — filters are
    /// exact gates, unlike the keyword scorer's substring matching. A
    /// document with no tags fails any active tag filter.
    pub fn allows(&self, doc: &EvidenceDoc) -> bool {
        if !self.categories.is_empty()
            && !self
                .categories
                .iter()
                .any(|c| c.eq_ignore_ascii_case(&doc.category))
        {
            return false;
        }
        if !self.tags.is_empty()
            && !self
                .tags
                .iter()
                .any(|t| doc.tags.iter().any(|dt| dt.eq_ignore_ascii_case(t)))
        {
            return false;
        }
        true
    }
}

/// Clamp-and-round a unit-interval relevance value onto the 0–100 display
/// scale used by every public output.
pub fn unit_to_display(value: f64) -> u8 {
    (value * 100.0).round().clamp(0.0, 100.0) as u8
}
