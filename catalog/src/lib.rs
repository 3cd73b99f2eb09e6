//! # Superchain Catalog
//!
//! Aggregates OP Stack chain metadata from the rollup registry, the chain-ID
//! directory and the DeFi Llama TVL list into a ranked catalog of chain groups,
//! each main network carrying its testnets and alternates.

pub mod client;
pub mod colors;
pub mod config;
pub mod enrich;
pub mod error;
pub mod grouping;
pub mod pipeline;
pub mod sources;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use client::{HttpResponse, HttpSourceClient, SourceClient};
pub use config::CatalogConfig;
pub use error::{CatalogError, Result};
pub use grouping::{filter_by_name, find_group};
pub use pipeline::{generate_chain_data, CatalogPipeline};
pub use types::*;

/// Current version of the catalog
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
