//! # Docket
//!
//! An evidence catalog for legal document collections: thin CRUD over local
//! metadata plus hybrid search that fuses keyword, semantic, and vault
//! relevance signals.
//!
//! The heavy lifting — storage, OCR, embedding, and fused retrieval — is the
//! vault service's job. This crate holds the local metadata catalog (SQLite),
//! the vault HTTP client, and the orchestration that picks a ranking strategy
//! and falls back gracefully when the vault is unreachable. The scoring
//! itself lives in `docket-core`.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌─────────────────┐   ┌───────────────┐
//! │   CLI    │──▶│ docket::search   │──▶│  vault (HTTP) │
//! │ (docket) │   │ strategy+fallback│   └───────────────┘
//! └──────────┘   │                 │   ┌───────────────┐
//! ┌──────────┐   │  docket-core    │──▶│ SQLite catalog │
//! │   HTTP   │──▶│  rankers        │   └───────────────┘
//! └──────────┘   └─────────────────┘
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`catalog`] | CRUD over local evidence metadata |
//! | [`db`] | SQLite connection pool |
//! | [`migrate`] | Schema migrations |
//! | [`sqlite_store`] | SQLite-backed `MetadataStore` |
//! | [`vault_client`] | HTTP client for the vault search API |
//! | [`search`] | Strategy selection and vault fallback |
//! | [`get`] | Document retrieval by id |
//! | [`server`] | JSON HTTP API for the web UI |

pub mod catalog;
pub mod config;
pub mod db;
pub mod get;
pub mod migrate;
pub mod search;
pub mod server;
pub mod sqlite_store;
pub mod vault_client;
