//! Metadata repository abstraction.
//!
//! The combiners never touch global state; every document read goes through
//! [`MetadataStore`], so any backend (SQLite in the application, in-memory
//! here) can serve them and the ranking logic stays independently testable.
//!
//! All operations are async (via `async-trait`) to match the application's
//! sqlx-backed implementation; the in-memory store returns immediately-ready
//! futures.

pub mod memory;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::EvidenceDoc;

/// Abstract store for locally held evidence metadata.
#[async_trait]
pub trait MetadataStore: Send + Sync {
    /// Insert or update a document, returning its local id.
    async fn upsert(&self, doc: &EvidenceDoc) -> Result<String>;

    /// Fetch a document by its local primary key.
    async fn get(&self, id: &str) -> Result<Option<EvidenceDoc>>;

    /// Fetch a document by the vault's externally-assigned object id.
    ///
    /// `None` is the normal outcome for orphaned vault hits, not an error.
    async fn find_by_vault_id(&self, vault_id: &str) -> Result<Option<EvidenceDoc>>;

    /// All documents in insertion order.
    async fn list(&self) -> Result<Vec<EvidenceDoc>>;

    /// Remove a document. Returns whether a record existed.
    async fn delete(&self, id: &str) -> Result<bool>;
}
