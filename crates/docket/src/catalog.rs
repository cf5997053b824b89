//! Thin CRUD over the local evidence catalog.
//!
//! Upload, OCR, and classification happen in the vault; what lands here is
//! the metadata the rankers read. These functions are shared by the CLI
//! verbs and the HTTP routes.

use anyhow::Result;
use uuid::Uuid;

use docket_core::models::{EvidenceDoc, DEFAULT_CATEGORY};
use docket_core::store::MetadataStore;

use crate::config::Config;
use crate::db;
use crate::sqlite_store::SqliteStore;

/// Fields accepted when registering a new evidence document.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct NewEvidence {
    pub filename: String,
    #[serde(default)]
    pub vault_id: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub extracted_text: Option<String>,
    #[serde(default)]
    pub embedding: Option<Vec<f32>>,
}

/// Create a catalog record with a fresh id and store it.
pub async fn add_evidence<S: MetadataStore + ?Sized>(
    store: &S,
    new: NewEvidence,
) -> Result<EvidenceDoc> {
    if new.filename.trim().is_empty() {
        anyhow::bail!("filename must not be empty");
    }

    let now = chrono::Utc::now().timestamp();
    let doc = EvidenceDoc {
        id: Uuid::new_v4().to_string(),
        vault_id: new.vault_id,
        filename: new.filename,
        category: new
            .category
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
        summary: new.summary,
        tags: new.tags,
        extracted_text: new.extracted_text,
        embedding: new.embedding,
        needs_sync: false,
        created_at: now,
        updated_at: now,
    };

    store.upsert(&doc).await?;
    Ok(doc)
}

/// All documents, optionally narrowed to one category.
pub async fn list_evidence<S: MetadataStore + ?Sized>(
    store: &S,
    category: Option<&str>,
) -> Result<Vec<EvidenceDoc>> {
    let docs = store.list().await?;
    Ok(match category {
        Some(cat) => docs
            .into_iter()
            .filter(|d| d.category.eq_ignore_ascii_case(cat))
            .collect(),
        None => docs,
    })
}

/// CLI entry point for `docket add`.
pub async fn run_add(config: &Config, new: NewEvidence) -> Result<()> {
    let pool = db::connect(config).await?;
    let store = SqliteStore::new(pool.clone());

    let doc = add_evidence(&store, new).await?;
    pool.close().await;

    println!("Added {} ({})", doc.filename, doc.id);
    Ok(())
}

/// CLI entry point for `docket list`.
pub async fn run_list(config: &Config, category: Option<String>) -> Result<()> {
    let pool = db::connect(config).await?;
    let store = SqliteStore::new(pool.clone());

    let docs = list_evidence(&store, category.as_deref()).await?;
    pool.close().await;

    if docs.is_empty() {
        println!("No documents.");
        return Ok(());
    }

    for doc in &docs {
        let tags = if doc.tags.is_empty() {
            String::new()
        } else {
            format!("  [{}]", doc.tags.join(", "))
        };
        println!("{}  {}  {}{}", doc.id, doc.category, doc.filename, tags);
    }
    println!("{} document(s).", docs.len());
    Ok(())
}

/// CLI entry point for `docket delete`.
pub async fn run_delete(config: &Config, id: &str) -> Result<()> {
    let pool = db::connect(config).await?;
    let store = SqliteStore::new(pool.clone());

    let existed = store.delete(id).await?;
    pool.close().await;

    if existed {
        println!("Deleted {}.", id);
        Ok(())
    } else {
        anyhow::bail!("evidence not found: {}", id)
    }
}
