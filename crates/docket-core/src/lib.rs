//! # Docket Core
//!
//! Shared ranking logic for Docket: evidence document models, the cosine
//! similarity primitive, the keyword and semantic scorers, the local hybrid
//! combiner, the vault-assisted combiner, and the metadata store abstraction.
//!
//! This crate contains no tokio, sqlx, network, or filesystem dependencies.
//! The application crate (`docket`) supplies concrete [`store::MetadataStore`]
//! and [`vault::VaultSearch`] implementations and drives the combiners.

pub mod hybrid;
pub mod keyword;
pub mod models;
pub mod semantic;
pub mod similarity;
pub mod store;
pub mod vault;
