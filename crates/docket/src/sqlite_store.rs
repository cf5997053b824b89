//! SQLite-backed [`MetadataStore`] implementation.
//!
//! Tags are stored as a JSON array in `tags_json`; embeddings as
//! little-endian `f32` BLOBs. Row order follows `created_at` then `id`, so
//! listings (and therefore ranked ties) stay deterministic.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

use docket_core::models::EvidenceDoc;
use docket_core::similarity::{blob_to_vec, vec_to_blob};
use docket_core::store::MetadataStore;

/// SQLite implementation of the [`MetadataStore`] trait.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    #[allow(dead_code)]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn row_to_doc(row: &SqliteRow) -> EvidenceDoc {
    let tags_json: String = row.get("tags_json");
    let tags: Vec<String> = serde_json::from_str(&tags_json).unwrap_or_default();
    let embedding: Option<Vec<u8>> = row.get("embedding");

    EvidenceDoc {
        id: row.get("id"),
        vault_id: row.get("vault_id"),
        filename: row.get("filename"),
        category: row.get("category"),
        summary: row.get("summary"),
        tags,
        extracted_text: row.get("extracted_text"),
        embedding: embedding.map(|blob| blob_to_vec(&blob)),
        needs_sync: row.get("needs_sync"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

const SELECT_COLUMNS: &str = "id, vault_id, filename, category, summary, tags_json, \
                              extracted_text, embedding, needs_sync, created_at, updated_at";

#[async_trait]
impl MetadataStore for SqliteStore {
    async fn upsert(&self, doc: &EvidenceDoc) -> Result<String> {
        let tags_json = serde_json::to_string(&doc.tags)?;
        let embedding_blob = doc.embedding.as_deref().map(vec_to_blob);

        sqlx::query(
            r#"
            INSERT INTO evidence (id, vault_id, filename, category, summary, tags_json,
                                  extracted_text, embedding, needs_sync, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                vault_id = excluded.vault_id,
                filename = excluded.filename,
                category = excluded.category,
                summary = excluded.summary,
                tags_json = excluded.tags_json,
                extracted_text = excluded.extracted_text,
                embedding = excluded.embedding,
                needs_sync = excluded.needs_sync,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&doc.id)
        .bind(&doc.vault_id)
        .bind(&doc.filename)
        .bind(&doc.category)
        .bind(&doc.summary)
        .bind(&tags_json)
        .bind(&doc.extracted_text)
        .bind(&embedding_blob)
        .bind(doc.needs_sync)
        .bind(doc.created_at)
        .bind(doc.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(doc.id.clone())
    }

    async fn get(&self, id: &str) -> Result<Option<EvidenceDoc>> {
        let row = sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} FROM evidence WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(row_to_doc))
    }

    async fn find_by_vault_id(&self, vault_id: &str) -> Result<Option<EvidenceDoc>> {
        let row = sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} FROM evidence WHERE vault_id = ?"
        ))
        .bind(vault_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(row_to_doc))
    }

    async fn list(&self) -> Result<Vec<EvidenceDoc>> {
        let rows = sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} FROM evidence ORDER BY created_at ASC, id ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(row_to_doc).collect())
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM evidence WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
