//! Fetchers for the three upstream sources
//!
//! Each fetcher issues a single GET, accepts either a bare JSON array or an
//! envelope with a `data` array, and shapes the records into a lookup keyed by
//! chain ID. Any failure is reported as [`CatalogError::SourceFetch`].

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::{
    client::SourceClient,
    types::{NetworkDirectoryItem, RegistryEntry, TvlRecord},
    utils::is_success,
    CatalogError, Result,
};

/// Chain-ID directory endpoint
pub const DIRECTORY_URL: &str = "https://chainid.network/chains.json";

/// Analytics (TVL) endpoint
pub const ANALYTICS_URL: &str = "https://api.llama.fi/chains";

/// Rollup registry endpoint
pub const REGISTRY_URL: &str =
    "https://raw.githubusercontent.com/ethereum-optimism/superchain-registry/refs/heads/main/chainList.json";

/// Base path of the logo host; the slug is appended as `rsz_<slug>`
pub const LOGO_HOST: &str = "https://icons.llamao.fi/icons/chains/";

/// Identifies an upstream source in errors and logs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Directory,
    Analytics,
    Registry,
}

impl Source {
    pub fn name(&self) -> &'static str {
        match self {
            Source::Directory => "directory",
            Source::Analytics => "analytics",
            Source::Registry => "registry",
        }
    }

    pub fn url(&self) -> &'static str {
        match self {
            Source::Directory => DIRECTORY_URL,
            Source::Analytics => ANALYTICS_URL,
            Source::Registry => REGISTRY_URL,
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Fetch the chain-ID directory as a lookup by chain ID
pub async fn fetch_directory(client: &dyn SourceClient) -> Result<HashMap<u64, NetworkDirectoryItem>> {
    let items: Vec<NetworkDirectoryItem> = fetch_records(client, Source::Directory).await?;
    Ok(items.into_iter().map(|item| (item.chain_id, item)).collect())
}

/// Fetch the analytics TVL list as a lookup by chain ID.
/// Records without a chain ID cannot be joined and are dropped.
pub async fn fetch_tvl(client: &dyn SourceClient) -> Result<HashMap<u64, TvlRecord>> {
    let records: Vec<TvlRecord> = fetch_records(client, Source::Analytics).await?;
    let total = records.len();

    let lookup: HashMap<u64, TvlRecord> = records
        .into_iter()
        .filter_map(|record| record.chain_id.map(|id| (id, record)))
        .collect();

    debug!(total, joinable = lookup.len(), "Built TVL lookup");
    Ok(lookup)
}

/// Fetch the rollup registry, in upstream order
pub async fn fetch_registry(client: &dyn SourceClient) -> Result<Vec<RegistryEntry>> {
    fetch_records(client, Source::Registry).await
}

/// Fetch a source and deserialize its records.
///
/// A malformed body is fatal; a single malformed record is skipped with a warning.
async fn fetch_records<T: DeserializeOwned>(client: &dyn SourceClient, source: Source) -> Result<Vec<T>> {
    let payload = fetch_payload(client, source).await?;

    let Value::Array(items) = payload else {
        return Err(source_error(source, None, "expected a JSON array"));
    };

    let total = items.len();
    let mut records = Vec::with_capacity(total);
    for (index, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<T>(item) {
            Ok(record) => records.push(record),
            Err(e) => warn!(source = %source, index, error = %e, "Skipping malformed record"),
        }
    }

    debug!(source = %source, total, parsed = records.len(), "Fetched source");
    Ok(records)
}

/// GET a source, check the status, parse JSON and unwrap a `data` envelope
async fn fetch_payload(client: &dyn SourceClient, source: Source) -> Result<Value> {
    let response = client
        .get(source.url())
        .await
        .map_err(|e| source_error(source, e.status(), &e.to_string()))?;

    if !is_success(response.status) {
        return Err(source_error(
            source,
            Some(response.status),
            &format!("HTTP {}", response.status),
        ));
    }

    let json: Value = serde_json::from_slice(&response.body)
        .map_err(|e| source_error(source, Some(response.status), &format!("invalid JSON: {}", e)))?;

    Ok(unwrap_data_envelope(json))
}

/// Return the `data` array of an envelope, or the whole document otherwise
pub fn unwrap_data_envelope(json: Value) -> Value {
    match json {
        Value::Object(mut map) if matches!(map.get("data"), Some(Value::Array(_))) => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

fn source_error(source: Source, status: Option<u16>, message: &str) -> CatalogError {
    CatalogError::source_fetch(source.name(), source.url().to_string(), status, message.to_string())
}
