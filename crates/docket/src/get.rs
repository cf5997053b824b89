//! Evidence retrieval by id.
//!
//! Shared by the `docket get` CLI command and the `GET /evidence/{id}`
//! HTTP route.

use anyhow::{bail, Result};

use docket_core::models::EvidenceDoc;
use docket_core::store::MetadataStore;

use crate::config::Config;
use crate::db;
use crate::sqlite_store::SqliteStore;

/// Fetch one document by its local id.
pub async fn get_evidence(config: &Config, id: &str) -> Result<EvidenceDoc> {
    let pool = db::connect(config).await?;
    let store = SqliteStore::new(pool.clone());

    let result = store.get(id).await?;
    pool.close().await;

    match result {
        Some(doc) => Ok(doc),
        None => bail!("evidence not found: {}", id),
    }
}

/// CLI entry point for `docket get <id>`.
pub async fn run_get(config: &Config, id: &str) -> Result<()> {
    let doc = get_evidence(config, id).await?;

    println!("--- Evidence ---");
    println!("id:        {}", doc.id);
    println!(
        "vault id:  {}",
        doc.vault_id.as_deref().unwrap_or("(not synced)")
    );
    println!("filename:  {}", doc.filename);
    println!("category:  {}", doc.category);
    if !doc.tags.is_empty() {
        println!("tags:      {}", doc.tags.join(", "));
    }
    if let Some(summary) = &doc.summary {
        println!("summary:   {}", summary);
    }
    if let Some(embedding) = &doc.embedding {
        println!("embedding: {} dims", embedding.len());
    }
    if doc.needs_sync {
        println!("needs sync: yes");
    }
    if let Some(text) = &doc.extracted_text {
        println!();
        println!("{}", text);
    }

    Ok(())
}
