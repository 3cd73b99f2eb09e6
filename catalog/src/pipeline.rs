//! Pipeline orchestration: fetch, enrich, group, rank

use futures::future::join_all;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

use crate::{
    client::{HttpSourceClient, SourceClient},
    config::CatalogConfig,
    enrich::Enricher,
    grouping::{group_networks, sort_by_tvl},
    sources::{fetch_directory, fetch_registry, fetch_tvl},
    types::AggregatedGroup,
    Result,
};

/// Builds the chain catalog from the three upstream sources.
///
/// Holds no state between runs; every call to [`CatalogPipeline::run`] refetches everything.
#[derive(Clone)]
pub struct CatalogPipeline {
    client: Arc<dyn SourceClient>,
    config: Arc<CatalogConfig>,
}

impl CatalogPipeline {
    /// Create a pipeline backed by a real HTTP client
    pub fn new(config: CatalogConfig) -> Result<Self> {
        let client = HttpSourceClient::new(&config.http)?;
        Ok(Self::with_client(Arc::new(client), config))
    }

    /// Create a pipeline over any [`SourceClient`]
    pub fn with_client(client: Arc<dyn SourceClient>, config: CatalogConfig) -> Self {
        Self {
            client,
            config: Arc::new(config),
        }
    }

    /// Run the full pipeline and return groups ranked by main-network TVL.
    ///
    /// A failure of any source aborts the run; logo failures never do.
    pub async fn run(&self) -> Result<Vec<AggregatedGroup>> {
        let started = Instant::now();
        let client = self.client.as_ref();

        let (directory, tvl, registry) = tokio::try_join!(
            fetch_directory(client),
            fetch_tvl(client),
            fetch_registry(client),
        )
        .map_err(|e| {
            error!(
                category = e.category(),
                status = ?e.status(),
                error = %e,
                "Source fetch failed"
            );
            e
        })?;

        info!(
            registry_entries = registry.len(),
            directory_items = directory.len(),
            tvl_records = tvl.len(),
            "Sources fetched"
        );

        let enricher = Enricher::new(self.client.clone(), self.config.colors);
        let enriched = join_all(registry.into_iter().map(|entry| {
            let directory_item = directory.get(&entry.chain_id);
            let tvl_record = tvl.get(&entry.chain_id);
            let enricher = &enricher;
            async move { enricher.enrich(entry, directory_item, tvl_record).await }
        }))
        .await;

        let mut groups = group_networks(enriched);
        sort_by_tvl(&mut groups);

        let with_colors = groups
            .iter()
            .flat_map(|group| group.networks())
            .filter(|network| network.logo_colors.is_some())
            .count();

        info!(
            groups = groups.len(),
            networks = groups.iter().map(AggregatedGroup::len).sum::<usize>(),
            with_logo_colors = with_colors,
            elapsed_ms = started.elapsed().as_millis(),
            "Catalog generated"
        );

        Ok(groups)
    }
}

/// Build the catalog with default settings.
///
/// This is the parameterless entry point; callers that need configuration or
/// a custom client should use [`CatalogPipeline`].
pub async fn generate_chain_data() -> Result<Vec<AggregatedGroup>> {
    CatalogPipeline::new(CatalogConfig::default())?.run().await
}
