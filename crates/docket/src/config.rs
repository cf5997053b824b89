use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use docket_core::vault::{VaultMethod, VaultSearchOptions};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub db: DbConfig,
    #[serde(default)]
    pub vault: VaultConfig,
    #[serde(default)]
    pub ranking: RankingConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    pub path: PathBuf,
}

/// Connection settings for the vault service. The vault is considered
/// configured when `url` is set; everything else has workable defaults.
#[derive(Debug, Deserialize, Clone)]
pub struct VaultConfig {
    #[serde(default)]
    pub url: Option<String>,
    /// Name of the environment variable holding the vault API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Fusion method: `hybrid`, `fast`, `local`, or `global`.
    #[serde(default = "default_method")]
    pub method: String,
    #[serde(default = "default_vault_limit")]
    pub limit: usize,
    /// Recall floor forwarded to the vault. Local filtering is the precision
    /// gate, so this stays near zero.
    #[serde(default = "default_min_score")]
    pub min_score: f64,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            url: None,
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout_secs(),
            method: default_method(),
            limit: default_vault_limit(),
            min_score: default_min_score(),
        }
    }
}

fn default_api_key_env() -> String {
    "VAULT_API_KEY".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_method() -> String {
    "hybrid".to_string()
}
fn default_vault_limit() -> usize {
    30
}
fn default_min_score() -> f64 {
    0.01
}

impl VaultConfig {
    pub fn is_enabled(&self) -> bool {
        self.url.is_some()
    }

    /// Build the per-call search options from this configuration.
    pub fn search_options(&self) -> Result<VaultSearchOptions> {
        Ok(VaultSearchOptions {
            method: VaultMethod::parse(&self.method)?,
            limit: self.limit,
            min_score: self.min_score,
        })
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct RankingConfig {
    #[serde(default = "default_keyword_weight")]
    pub keyword_weight: f64,
    #[serde(default = "default_semantic_weight")]
    pub semantic_weight: f64,
    /// Inclusion threshold on raw cosine similarity for the semantic scorer.
    #[serde(default = "default_min_similarity")]
    pub min_similarity: f32,
    #[serde(default = "default_final_limit")]
    pub final_limit: usize,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            keyword_weight: default_keyword_weight(),
            semantic_weight: default_semantic_weight(),
            min_similarity: default_min_similarity(),
            final_limit: default_final_limit(),
        }
    }
}

fn default_keyword_weight() -> f64 {
    0.3
}
fn default_semantic_weight() -> f64 {
    0.7
}
fn default_min_similarity() -> f32 {
    docket_core::semantic::DEFAULT_MIN_SIMILARITY
}
fn default_final_limit() -> usize {
    20
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub bind: String,
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    if config.ranking.final_limit < 1 {
        anyhow::bail!("ranking.final_limit must be >= 1");
    }
    if !(0.0..=1.0).contains(&config.ranking.keyword_weight) {
        anyhow::bail!("ranking.keyword_weight must be in [0.0, 1.0]");
    }
    if !(0.0..=1.0).contains(&config.ranking.semantic_weight) {
        anyhow::bail!("ranking.semantic_weight must be in [0.0, 1.0]");
    }
    if !(0.0..=1.0).contains(&config.vault.min_score) {
        anyhow::bail!("vault.min_score must be in [0.0, 1.0]");
    }
    if config.vault.is_enabled() {
        // fail on a bad method at load time, not on the first search
        config.vault.search_options()?;
    }

    Ok(config)
}
