//! End-to-end search tests: strategy selection, vault orphan handling, and
//! the keyword fallback when the vault is unreachable or empty.
//!
//! The vault is played by a throwaway axum server bound to an ephemeral
//! loopback port, returning a fixed hit list.

use axum::{routing::post, Json, Router};
use tempfile::TempDir;

use docket::config::{Config, DbConfig, RankingConfig, ServerConfig, VaultConfig};
use docket::sqlite_store::SqliteStore;
use docket::{catalog, db, migrate, search};
use docket_core::models::SearchFilters;

fn test_config(dir: &TempDir, vault_url: Option<String>) -> Config {
    Config {
        db: DbConfig {
            path: dir.path().join("docket.sqlite"),
        },
        vault: VaultConfig {
            url: vault_url,
            timeout_secs: 5,
            ..Default::default()
        },
        ranking: RankingConfig::default(),
        server: ServerConfig {
            bind: "127.0.0.1:0".to_string(),
        },
    }
}

/// Seed the catalog with the two-document corpus used across these tests.
async fn seed_corpus(config: &Config) {
    migrate::run_migrations(config).await.unwrap();
    let pool = db::connect(config).await.unwrap();
    let store = SqliteStore::new(pool.clone());

    catalog::add_evidence(
        &store,
        catalog::NewEvidence {
            filename: "lease-agreement.pdf".to_string(),
            tags: vec!["lease".to_string()],
            ..Default::default()
        },
    )
    .await
    .unwrap();

    catalog::add_evidence(
        &store,
        catalog::NewEvidence {
            filename: "photo.jpg".to_string(),
            summary: Some("a scanned photo".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    pool.close().await;
}

/// Serve a fixed `/api/search` response on an ephemeral port, returning the
/// base URL to point the vault client at.
async fn spawn_stub_vault(response: serde_json::Value) -> String {
    let app = Router::new().route(
        "/api/search",
        post(move || {
            let response = response.clone();
            async move { Json(response) }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

#[tokio::test]
async fn keyword_search_matches_filename_and_tag() {
    let tmp = TempDir::new().unwrap();
    let config = test_config(&tmp, None);
    seed_corpus(&config).await;

    // no vault configured, so `auto` resolves to keyword ranking
    let results = search::search_evidence(
        &config,
        "lease",
        "auto",
        &SearchFilters::default(),
        None,
        None,
    )
    .await
    .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].doc.filename, "lease-agreement.pdf");
    // filename (50) + tag (20) out of 110 → 64
    assert_eq!(results[0].score, 64);
}

#[tokio::test]
async fn keyword_search_filename_only_scores_45() {
    let tmp = TempDir::new().unwrap();
    let config = test_config(&tmp, None);
    seed_corpus(&config).await;

    let results = search::search_evidence(
        &config,
        "agreement",
        "keyword",
        &SearchFilters::default(),
        None,
        None,
    )
    .await
    .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].score, 45);
}

#[tokio::test]
async fn unknown_mode_is_rejected() {
    let tmp = TempDir::new().unwrap();
    let config = test_config(&tmp, None);
    seed_corpus(&config).await;

    let err = search::search_evidence(
        &config,
        "lease",
        "fuzzy",
        &SearchFilters::default(),
        None,
        None,
    )
    .await;
    assert!(err.is_err());
}

#[tokio::test]
async fn unreachable_vault_falls_back_to_keyword() {
    let tmp = TempDir::new().unwrap();
    // nothing listens on port 1
    let config = test_config(&tmp, Some("http://127.0.0.1:1".to_string()));
    seed_corpus(&config).await;

    let results = search::search_evidence(
        &config,
        "lease",
        "vault",
        &SearchFilters::default(),
        None,
        None,
    )
    .await
    .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].doc.filename, "lease-agreement.pdf");
    assert!(!results[0].doc.needs_sync);
}

#[tokio::test]
async fn empty_vault_falls_back_to_keyword() {
    let tmp = TempDir::new().unwrap();
    let url = spawn_stub_vault(serde_json::json!({ "results": [] })).await;
    let config = test_config(&tmp, Some(url));
    seed_corpus(&config).await;

    let results = search::search_evidence(
        &config,
        "lease",
        "vault",
        &SearchFilters::default(),
        None,
        None,
    )
    .await
    .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].doc.filename, "lease-agreement.pdf");
}

#[tokio::test]
async fn orphan_vault_hit_is_surfaced_with_needs_sync() {
    let tmp = TempDir::new().unwrap();
    let url = spawn_stub_vault(serde_json::json!({
        "results": [{ "object_id": "r1", "score": 0.92 }]
    }))
    .await;
    let config = test_config(&tmp, Some(url));
    seed_corpus(&config).await;

    let results = search::search_evidence(
        &config,
        "lease",
        "vault",
        &SearchFilters::default(),
        None,
        None,
    )
    .await
    .unwrap();

    assert_eq!(results.len(), 1);
    let m = &results[0];
    assert_eq!(m.score, 92);
    assert!(m.doc.needs_sync);
    assert_eq!(m.doc.category, "other");
    assert!(m.doc.tags.is_empty());
}

#[tokio::test]
async fn category_filter_gates_orphans() {
    let tmp = TempDir::new().unwrap();
    let url = spawn_stub_vault(serde_json::json!({
        "results": [{ "object_id": "r1", "score": 0.92 }]
    }))
    .await;
    let config = test_config(&tmp, Some(url));
    seed_corpus(&config).await;

    // "other" explicitly allowed → orphan stays
    let kept = search::search_evidence(
        &config,
        "lease",
        "vault",
        &SearchFilters {
            categories: vec!["other".to_string()],
            tags: vec![],
        },
        None,
        None,
    )
    .await
    .unwrap();
    assert_eq!(kept.len(), 1);
    assert!(kept[0].doc.needs_sync);

    // a filter that excludes "other" drops the orphan; hits were non-empty,
    // so no keyword fallback kicks in
    let dropped = search::search_evidence(
        &config,
        "lease",
        "vault",
        &SearchFilters {
            categories: vec!["contract".to_string()],
            tags: vec![],
        },
        None,
        None,
    )
    .await
    .unwrap();
    assert!(dropped.is_empty());
}

#[tokio::test]
async fn resolved_vault_hit_uses_local_metadata() {
    let tmp = TempDir::new().unwrap();
    let url = spawn_stub_vault(serde_json::json!({
        "results": [{ "object_id": "vault-7", "score": 0.55, "snippet": "…lease…" }]
    }))
    .await;
    let config = test_config(&tmp, Some(url));

    migrate::run_migrations(&config).await.unwrap();
    let pool = db::connect(&config).await.unwrap();
    let store = SqliteStore::new(pool.clone());
    catalog::add_evidence(
        &store,
        catalog::NewEvidence {
            filename: "deposition.pdf".to_string(),
            vault_id: Some("vault-7".to_string()),
            category: Some("transcript".to_string()),
            tags: vec!["deposition".to_string()],
            ..Default::default()
        },
    )
    .await
    .unwrap();
    pool.close().await;

    let results = search::search_evidence(
        &config,
        "deposition",
        "vault",
        &SearchFilters::default(),
        None,
        None,
    )
    .await
    .unwrap();

    assert_eq!(results.len(), 1);
    let m = &results[0];
    assert_eq!(m.score, 55);
    assert_eq!(m.doc.filename, "deposition.pdf");
    assert_eq!(m.doc.category, "transcript");
    assert!(!m.doc.needs_sync);
}

#[tokio::test]
async fn local_mode_uses_supplied_embedding() {
    let tmp = TempDir::new().unwrap();
    let config = test_config(&tmp, None);

    migrate::run_migrations(&config).await.unwrap();
    let pool = db::connect(&config).await.unwrap();
    let store = SqliteStore::new(pool.clone());
    catalog::add_evidence(
        &store,
        catalog::NewEvidence {
            filename: "memo.pdf".to_string(),
            embedding: Some(vec![1.0, 0.0, 0.0]),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    pool.close().await;

    // semantic-only match: the query string hits no field, but the
    // embedding is identical → semantic 100 × 0.7 = 70
    let results = search::search_evidence(
        &config,
        "zoning variance",
        "local",
        &SearchFilters::default(),
        Some(&[1.0, 0.0, 0.0]),
        None,
    )
    .await
    .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].score, 70);

    // without the embedding, nothing matches
    let without = search::search_evidence(
        &config,
        "zoning variance",
        "local",
        &SearchFilters::default(),
        None,
        None,
    )
    .await
    .unwrap();
    assert!(without.is_empty());
}
