//! Merges a registry entry with its directory and analytics matches
//!
//! Precedence: registry fields win, directory fields fill the gaps, the
//! analytics name replaces the display name, and explorers are the ordered
//! union of both sources. A logo is only derived when an analytics record
//! matched; logo color failures never abort the entry.

use std::sync::Arc;
use tracing::{error, warn};

use crate::{
    client::SourceClient,
    colors::{colors_from_image_bytes, ColorCutoffs},
    sources::LOGO_HOST,
    types::{EnrichedNetwork, LogoColors, NetworkDirectoryItem, RegistryEntry, TvlRecord},
    utils::{is_success, merge_unique, name_slug},
    CatalogError, Result,
};

/// Enriches registry entries, fetching logos through the shared client
#[derive(Clone)]
pub struct Enricher {
    client: Arc<dyn SourceClient>,
    cutoffs: ColorCutoffs,
}

impl Enricher {
    pub fn new(client: Arc<dyn SourceClient>, cutoffs: ColorCutoffs) -> Self {
        Self { client, cutoffs }
    }

    /// Build one [`EnrichedNetwork`]. Never fails: logo problems leave `logo_colors` empty.
    pub async fn enrich(
        &self,
        entry: RegistryEntry,
        directory: Option<&NetworkDirectoryItem>,
        tvl: Option<&TvlRecord>,
    ) -> EnrichedNetwork {
        let logo = logo_url(&entry, tvl);

        let logo_colors = match &logo {
            Some(url) => match fetch_logo_colors(self.client.as_ref(), url, self.cutoffs).await {
                Ok(colors) => Some(colors),
                Err(e) if e.is_fatal() => {
                    error!(
                        chain_id = entry.chain_id,
                        url = %url,
                        category = e.category(),
                        error = %e,
                        "Logo color extraction failed unexpectedly"
                    );
                    None
                }
                Err(e) => {
                    warn!(
                        chain_id = entry.chain_id,
                        url = %url,
                        category = e.category(),
                        error = %e,
                        "Failed to extract colors from logo"
                    );
                    None
                }
            },
            None => None,
        };

        merge_network(entry, directory, tvl, logo, logo_colors)
    }
}

/// Logo URL on the icon host, only when the analytics source knows the chain
pub fn logo_url(entry: &RegistryEntry, tvl: Option<&TvlRecord>) -> Option<String> {
    let tvl = tvl?;
    let slug = name_slug(display_name(entry, Some(tvl)));
    Some(format!("{}rsz_{}", LOGO_HOST, slug))
}

/// Analytics name when present and non-empty, otherwise the registry name
pub fn display_name<'a>(entry: &'a RegistryEntry, tvl: Option<&'a TvlRecord>) -> &'a str {
    tvl.map(|record| record.name.as_str())
        .filter(|name| !name.is_empty())
        .unwrap_or(entry.name.as_str())
}

/// Fetch a logo and extract its colors
pub async fn fetch_logo_colors(
    client: &dyn SourceClient,
    url: &str,
    cutoffs: ColorCutoffs,
) -> Result<LogoColors> {
    let response = client
        .get(url)
        .await
        .map_err(|e| CatalogError::image_fetch(url.to_string(), e.to_string()))?;

    if !is_success(response.status) {
        return Err(CatalogError::image_fetch(
            url.to_string(),
            format!("HTTP {}", response.status),
        ));
    }

    let body = response.body;
    let colors = tokio::task::spawn_blocking(move || colors_from_image_bytes(&body, cutoffs))
        .await
        .map_err(|e| CatalogError::internal(format!("color extraction task failed: {}", e)))??;

    Ok(LogoColors::new(colors.average_color, colors.most_common_color))
}

/// Field-by-field merge of the three sources
pub fn merge_network(
    entry: RegistryEntry,
    directory: Option<&NetworkDirectoryItem>,
    tvl: Option<&TvlRecord>,
    logo: Option<String>,
    logo_colors: Option<LogoColors>,
) -> EnrichedNetwork {
    let name = display_name(&entry, tvl).to_string();

    let explorers = merge_unique(
        entry.explorers.iter().map(String::as_str),
        directory
            .into_iter()
            .flat_map(|item| item.explorers.iter().map(|e| e.url.as_str())),
    );

    let rpc = fill_gap(entry.rpc, directory.map(|item| &item.rpc));
    let faucets = fill_gap(entry.faucets, directory.map(|item| &item.faucets));

    EnrichedNetwork {
        name,
        identifier: entry.identifier,
        chain_id: entry.chain_id,
        rpc,
        faucets,
        superchain_level: entry.superchain_level,
        governed_by_optimism: entry.governed_by_optimism,
        data_availability_type: entry.data_availability_type,
        parent: entry.parent,

        chain: directory.and_then(|item| item.chain.clone()),
        icon: directory.and_then(|item| item.icon.clone()),
        network: directory.and_then(|item| item.network.clone()),
        native_currency: directory.and_then(|item| item.native_currency.clone()),
        info_url: directory.and_then(|item| item.info_url.clone()),
        short_name: directory.and_then(|item| item.short_name.clone()),
        network_id: directory.and_then(|item| item.network_id),
        slip44: directory.and_then(|item| item.slip44),
        ens: directory.and_then(|item| item.ens.clone()),

        explorers,
        logo,
        symbol: tvl.and_then(|record| record.token_symbol.clone()),
        tvl: tvl.map(|record| record.tvl),
        logo_colors,
    }
}

fn fill_gap(primary: Vec<String>, fallback: Option<&Vec<String>>) -> Vec<String> {
    match fallback {
        Some(fallback) if primary.is_empty() => fallback.clone(),
        _ => primary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{HttpResponse, MockSourceClient};
    use crate::types::{ExplorerDescriptor, NativeCurrency};

    fn registry_entry() -> RegistryEntry {
        RegistryEntry {
            name: "OP Mainnet".to_string(),
            identifier: "mainnet/op".to_string(),
            chain_id: 10,
            rpc: vec!["https://mainnet.optimism.io".to_string()],
            explorers: vec!["a.com".to_string(), "b.com".to_string()],
            governed_by_optimism: true,
            ..Default::default()
        }
    }

    fn directory_item() -> NetworkDirectoryItem {
        NetworkDirectoryItem {
            chain_id: 10,
            name: Some("OP Mainnet".to_string()),
            short_name: Some("oeth".to_string()),
            info_url: Some("https://optimism.io".to_string()),
            rpc: vec!["https://directory-rpc.example".to_string()],
            faucets: vec!["https://faucet.example".to_string()],
            native_currency: Some(NativeCurrency {
                name: "Ether".to_string(),
                symbol: "ETH".to_string(),
                decimals: 18,
            }),
            explorers: vec![
                ExplorerDescriptor {
                    name: "b".to_string(),
                    url: "b.com".to_string(),
                    standard: None,
                },
                ExplorerDescriptor {
                    name: "c".to_string(),
                    url: "c.com".to_string(),
                    standard: Some("EIP3091".to_string()),
                },
            ],
            ..Default::default()
        }
    }

    fn tvl_record(name: &str) -> TvlRecord {
        TvlRecord {
            name: name.to_string(),
            chain_id: Some(10),
            tvl: 1_000.0,
            token_symbol: Some("OP".to_string()),
            ..Default::default()
        }
    }

    fn png_bytes(rgb: [u8; 3]) -> Vec<u8> {
        let img = image::RgbImage::from_pixel(2, 2, image::Rgb(rgb));
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_explorers_are_ordered_union() {
        let network = merge_network(registry_entry(), Some(&directory_item()), None, None, None);
        assert_eq!(network.explorers, vec!["a.com", "b.com", "c.com"]);
    }

    #[test]
    fn test_registry_wins_and_directory_fills_gaps() {
        let network = merge_network(registry_entry(), Some(&directory_item()), None, None, None);

        assert_eq!(network.rpc, vec!["https://mainnet.optimism.io"]);
        assert_eq!(network.faucets, vec!["https://faucet.example"]);
        assert_eq!(network.short_name.as_deref(), Some("oeth"));
        assert_eq!(network.info_url.as_deref(), Some("https://optimism.io"));
        assert!(network.governed_by_optimism);
    }

    #[test]
    fn test_analytics_name_overrides_registry_name() {
        let tvl = tvl_record("Optimism");
        let network = merge_network(registry_entry(), None, Some(&tvl), None, None);
        assert_eq!(network.name, "Optimism");
        assert_eq!(network.symbol.as_deref(), Some("OP"));
        assert_eq!(network.tvl, Some(1_000.0));

        let unnamed = tvl_record("");
        let network = merge_network(registry_entry(), None, Some(&unnamed), None, None);
        assert_eq!(network.name, "OP Mainnet");
    }

    #[test]
    fn test_logo_url_requires_analytics_match() {
        assert_eq!(logo_url(&registry_entry(), None), None);

        let tvl = tvl_record("OP Mainnet");
        assert_eq!(
            logo_url(&registry_entry(), Some(&tvl)).as_deref(),
            Some("https://icons.llamao.fi/icons/chains/rsz_opmainnet")
        );

        let tvl = tvl_record("Arena-Z");
        assert_eq!(
            logo_url(&registry_entry(), Some(&tvl)).as_deref(),
            Some("https://icons.llamao.fi/icons/chains/rsz_arenaz")
        );
    }

    #[test]
    fn test_logo_url_keeps_slug_verbatim() {
        let tvl = tvl_record("Zkfair? #1 Ünichain");
        assert_eq!(
            logo_url(&registry_entry(), Some(&tvl)).as_deref(),
            Some("https://icons.llamao.fi/icons/chains/rsz_zkfair?#1ünichain")
        );
    }

    #[tokio::test]
    async fn test_entry_without_analytics_match_keeps_other_fields() {
        let mut client = MockSourceClient::new();
        client.expect_get().never();
        let enricher = Enricher::new(Arc::new(client), ColorCutoffs::default());

        let network = enricher
            .enrich(registry_entry(), Some(&directory_item()), None)
            .await;

        assert_eq!(network.logo, None);
        assert_eq!(network.logo_colors, None);
        assert_eq!(network.tvl, None);
        assert_eq!(network.name, "OP Mainnet");
        assert_eq!(network.short_name.as_deref(), Some("oeth"));
        assert_eq!(network.explorers, vec!["a.com", "b.com", "c.com"]);
    }

    #[tokio::test]
    async fn test_logo_colors_extracted_from_fetched_image() {
        let body = png_bytes([255, 4, 32]);
        let mut client = MockSourceClient::new();
        client
            .expect_get()
            .withf(|url| url == "https://icons.llamao.fi/icons/chains/rsz_optimism")
            .times(1)
            .returning(move |_| Ok(HttpResponse::ok(body.clone())));
        let enricher = Enricher::new(Arc::new(client), ColorCutoffs::default());

        let tvl = tvl_record("Optimism");
        let network = enricher.enrich(registry_entry(), None, Some(&tvl)).await;

        let colors = network.logo_colors.expect("logo colors");
        assert_eq!(colors.average, "#ff0420");
        assert_eq!(colors.most_common, "#ff0420");
        assert_eq!(colors.text_color.as_deref(), Some("#ffffff"));
    }

    #[tokio::test]
    async fn test_logo_failures_are_absorbed() {
        for response in [
            Ok(HttpResponse::with_status(404)),
            Ok(HttpResponse::ok("definitely not a png")),
            Err(CatalogError::Timeout {
                url: "https://icons.llamao.fi/icons/chains/rsz_optimism".to_string(),
                timeout_ms: 5000,
            }),
        ] {
            let mut client = MockSourceClient::new();
            let mut response = Some(response);
            client
                .expect_get()
                .times(1)
                .returning(move |_| response.take().expect("single call"));
            let enricher = Enricher::new(Arc::new(client), ColorCutoffs::default());

            let tvl = tvl_record("Optimism");
            let network = enricher.enrich(registry_entry(), None, Some(&tvl)).await;

            assert!(network.logo.is_some());
            assert_eq!(network.logo_colors, None);
            assert_eq!(network.tvl, Some(1_000.0));
        }
    }
}
