//! Schema migrations for the evidence catalog.

use anyhow::Result;

use crate::config::Config;
use crate::db;

/// Create the catalog schema. Idempotent; safe to run on every start.
pub async fn run_migrations(config: &Config) -> Result<()> {
    let pool = db::connect(config).await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS evidence (
            id TEXT PRIMARY KEY,
            vault_id TEXT UNIQUE,
            filename TEXT NOT NULL,
            category TEXT NOT NULL DEFAULT 'other',
            summary TEXT,
            tags_json TEXT NOT NULL DEFAULT '[]',
            extracted_text TEXT,
            embedding BLOB,
            needs_sync INTEGER NOT NULL DEFAULT 0,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        )
        "#,
    )
    .execute(&pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_evidence_category ON evidence(category)")
        .execute(&pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_evidence_updated_at ON evidence(updated_at DESC)")
        .execute(&pool)
        .await?;

    pool.close().await;
    Ok(())
}
