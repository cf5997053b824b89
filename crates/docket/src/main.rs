//! # Docket CLI (`docket`)
//!
//! Command-line interface for the evidence catalog. All commands accept a
//! `--config` flag pointing to a TOML configuration file; see
//! `config/docket.example.toml`.
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `docket init` | Create the SQLite catalog and run schema migrations |
//! | `docket add <filename>` | Register a document's metadata |
//! | `docket list` | List cataloged documents |
//! | `docket get <id>` | Show one document |
//! | `docket delete <id>` | Remove one document |
//! | `docket search "<query>"` | Ranked search (vault-assisted when configured) |
//! | `docket serve` | Start the JSON HTTP API |

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use docket::{catalog, config, get, migrate, search, server};

/// Docket — an evidence catalog with hybrid local and vault-assisted search.
#[derive(Parser)]
#[command(
    name = "docket",
    about = "Docket — evidence catalog with hybrid local and vault-assisted search",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/docket.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Initialize the catalog database schema.
    ///
    /// Creates the SQLite file and the evidence table. Idempotent.
    Init,

    /// Register a document's metadata in the catalog.
    ///
    /// The document itself lives in the vault; this records the locally
    /// searchable fields (filename, category, tags, summary).
    Add {
        /// Original filename of the document.
        filename: String,

        /// Classification category (defaults to `other`).
        #[arg(long)]
        category: Option<String>,

        /// One-paragraph summary.
        #[arg(long)]
        summary: Option<String>,

        /// Tag (repeatable).
        #[arg(long = "tag")]
        tags: Vec<String>,

        /// Vault object id, when the document is already ingested remotely.
        #[arg(long)]
        vault_id: Option<String>,

        /// OCR text to make locally searchable.
        #[arg(long)]
        text: Option<String>,
    },

    /// List cataloged documents.
    List {
        /// Only show documents in this category.
        #[arg(long)]
        category: Option<String>,
    },

    /// Show one document by its id.
    Get {
        /// Document id.
        id: String,
    },

    /// Remove one document from the catalog.
    ///
    /// Does not touch the vault copy.
    Delete {
        /// Document id.
        id: String,
    },

    /// Search the catalog.
    ///
    /// Mode `auto` uses the vault's fused relevance when a vault is
    /// configured and falls back to local keyword ranking when it is
    /// unreachable or has not indexed anything yet.
    Search {
        /// The search query string.
        query: String,

        /// Search mode: `auto`, `keyword`, `local`, or `vault`.
        #[arg(long, default_value = "auto")]
        mode: String,

        /// Only return documents in this category (repeatable).
        #[arg(long = "category")]
        categories: Vec<String>,

        /// Only return documents carrying this tag (repeatable).
        #[arg(long = "tag")]
        tags: Vec<String>,

        /// Maximum number of results to return.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Start the JSON HTTP API server.
    ///
    /// Binds to the address configured in `[server].bind`.
    Serve,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Init => {
            migrate::run_migrations(&cfg).await?;
            println!("Catalog initialized successfully.");
        }
        Commands::Add {
            filename,
            category,
            summary,
            tags,
            vault_id,
            text,
        } => {
            catalog::run_add(
                &cfg,
                catalog::NewEvidence {
                    filename,
                    vault_id,
                    category,
                    summary,
                    tags,
                    extracted_text: text,
                    embedding: None,
                },
            )
            .await?;
        }
        Commands::List { category } => {
            catalog::run_list(&cfg, category).await?;
        }
        Commands::Get { id } => {
            get::run_get(&cfg, &id).await?;
        }
        Commands::Delete { id } => {
            catalog::run_delete(&cfg, &id).await?;
        }
        Commands::Search {
            query,
            mode,
            categories,
            tags,
            limit,
        } => {
            search::run_search(&cfg, &query, &mode, categories, tags, limit).await?;
        }
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
    }

    Ok(())
}
