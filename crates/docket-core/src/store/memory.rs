//! In-memory [`MetadataStore`] for tests and embedded usage.
//!
//! Documents live in a `Vec` behind `std::sync::RwLock`, preserving
//! insertion order so ranked ties resolve deterministically.

use std::sync::RwLock;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::EvidenceDoc;

use super::MetadataStore;

/// In-memory store backed by an insertion-ordered `Vec`.
#[derive(Default)]
pub struct InMemoryStore {
    docs: RwLock<Vec<EvidenceDoc>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience constructor pre-populated with a corpus.
    pub fn with_docs(docs: Vec<EvidenceDoc>) -> Self {
        Self {
            docs: RwLock::new(docs),
        }
    }
}

#[async_trait]
impl MetadataStore for InMemoryStore {
    async fn upsert(&self, doc: &EvidenceDoc) -> Result<String> {
        let mut docs = self.docs.write().unwrap();
        match docs.iter_mut().find(|d| d.id == doc.id) {
            Some(existing) => *existing = doc.clone(),
            None => docs.push(doc.clone()),
        }
        Ok(doc.id.clone())
    }

    async fn get(&self, id: &str) -> Result<Option<EvidenceDoc>> {
        let docs = self.docs.read().unwrap();
        Ok(docs.iter().find(|d| d.id == id).cloned())
    }

    async fn find_by_vault_id(&self, vault_id: &str) -> Result<Option<EvidenceDoc>> {
        let docs = self.docs.read().unwrap();
        Ok(docs
            .iter()
            .find(|d| d.vault_id.as_deref() == Some(vault_id))
            .cloned())
    }

    async fn list(&self) -> Result<Vec<EvidenceDoc>> {
        let docs = self.docs.read().unwrap();
        Ok(docs.clone())
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let mut docs = self.docs.write().unwrap();
        let before = docs.len();
        docs.retain(|d| d.id != id);
        Ok(docs.len() < before)
    }
}
