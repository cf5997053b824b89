//! Application-level search entry points.
//!
//! Strategy selection and the fallback policy live here; the scoring itself
//! is in `docket-core`. Four modes:
//!
//! - **auto** — vault-assisted when a vault is configured, keyword otherwise.
//! - **keyword** — weighted field matching over the local catalog.
//! - **local** — local hybrid (keyword + semantic) fusion; the semantic leg
//!   runs only when the caller supplies a query embedding.
//! - **vault** — the vault's fused relevance re-mapped onto local metadata,
//!   with keyword fallback when the vault is unreachable or returns nothing.

use anyhow::{bail, Result};
use tracing::warn;

use docket_core::hybrid::{rank_hybrid, rank_keyword, RankWeights};
use docket_core::models::{ScoredMatch, SearchFilters};
use docket_core::store::MetadataStore;
use docket_core::vault::{rank_vault_hits, VaultSearch};

use crate::config::Config;
use crate::db;
use crate::sqlite_store::SqliteStore;
use crate::vault_client::VaultClient;

/// Core search function returning ranked matches.
///
/// Shared by the CLI (`docket search`) and the HTTP server (`POST /search`).
/// Category/tag filters apply in every mode; `query_vec` is only consulted
/// in `local` mode.
pub async fn search_evidence(
    config: &Config,
    query: &str,
    mode: &str,
    filters: &SearchFilters,
    query_vec: Option<&[f32]>,
    limit: Option<usize>,
) -> Result<Vec<ScoredMatch>> {
    match mode {
        "auto" | "keyword" | "local" | "vault" => {}
        _ => bail!(
            "Unknown search mode: {}. Use auto, keyword, local, or vault.",
            mode
        ),
    }

    let effective = if mode == "auto" {
        if config.vault.is_enabled() {
            "vault"
        } else {
            "keyword"
        }
    } else {
        mode
    };

    if effective == "vault" && !config.vault.is_enabled() {
        bail!("Mode 'vault' requires [vault] url in config.");
    }

    let pool = db::connect(config).await?;
    let store = SqliteStore::new(pool.clone());

    let mut results = match effective {
        "vault" => vault_with_fallback(config, &store, query, filters).await?,
        "local" => {
            let corpus = store.list().await?;
            let weights = RankWeights {
                keyword: config.ranking.keyword_weight,
                semantic: config.ranking.semantic_weight,
            };
            let ranked = rank_hybrid(
                query,
                query_vec,
                &corpus,
                weights,
                config.ranking.min_similarity,
            );
            apply_filters(ranked, filters)
        }
        _ => keyword_over_catalog(&store, query, filters).await?,
    };

    results.truncate(limit.unwrap_or(config.ranking.final_limit));

    pool.close().await;
    Ok(results)
}

/// Vault-assisted ranking with the caller-side fallback policy.
///
/// A vault transport failure is logged and treated as zero hits; zero hits
/// (failure, or genuinely empty because nothing is indexed yet) fall back
/// to keyword ranking over the local catalog. The fallback keys off the
/// raw hit count — hits that merely fail the category/tag gates do NOT
/// trigger it. Nothing fatal reaches the UI from here.
async fn vault_with_fallback(
    config: &Config,
    store: &SqliteStore,
    query: &str,
    filters: &SearchFilters,
) -> Result<Vec<ScoredMatch>> {
    let opts = config.vault.search_options()?;
    let hits = match VaultClient::new(&config.vault) {
        Ok(client) => match client.search(query, &opts).await {
            Ok(hits) => hits,
            Err(e) => {
                warn!("vault search failed, using local ranking: {e:#}");
                Vec::new()
            }
        },
        Err(e) => {
            warn!("vault client unavailable, using local ranking: {e:#}");
            Vec::new()
        }
    };

    if hits.is_empty() {
        return keyword_over_catalog(store, query, filters).await;
    }
    rank_vault_hits(hits, store, filters).await
}

async fn keyword_over_catalog(
    store: &SqliteStore,
    query: &str,
    filters: &SearchFilters,
) -> Result<Vec<ScoredMatch>> {
    let corpus = store.list().await?;
    Ok(apply_filters(rank_keyword(query, &corpus), filters))
}

fn apply_filters(ranked: Vec<ScoredMatch>, filters: &SearchFilters) -> Vec<ScoredMatch> {
    if filters.is_empty() {
        return ranked;
    }
    ranked
        .into_iter()
        .filter(|m| filters.allows(&m.doc))
        .collect()
}

/// CLI entry point — calls [`search_evidence`] and prints results to stdout.
pub async fn run_search(
    config: &Config,
    query: &str,
    mode: &str,
    categories: Vec<String>,
    tags: Vec<String>,
    limit: Option<usize>,
) -> Result<()> {
    let filters = SearchFilters { categories, tags };
    let results = search_evidence(config, query, mode, &filters, None, limit).await?;

    if results.is_empty() {
        println!("No results.");
        return Ok(());
    }

    for (i, m) in results.iter().enumerate() {
        println!("{}. [{:>3}] {}", i + 1, m.score, m.doc.filename);
        println!("    category: {}", m.doc.category);
        if !m.doc.tags.is_empty() {
            println!("    tags: {}", m.doc.tags.join(", "));
        }
        if let Some(summary) = &m.doc.summary {
            println!("    summary: {}", summary.replace('\n', " "));
        }
        if m.doc.needs_sync {
            println!("    (vault record, not yet in local catalog)");
        }
        println!("    id: {}", m.doc.id);
        println!();
    }

    Ok(())
}
