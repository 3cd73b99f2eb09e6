//! Core data types for the upstream sources and the merged catalog

use serde::{Deserialize, Deserializer, Serialize};

use crate::colors::contrasting_text_color;

/// Data availability classification of a rollup.
///
/// Values the registry adds later are carried through unchanged as `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DataAvailability {
    EthDa,
    AltDa,
    Other(String),
}

impl Default for DataAvailability {
    fn default() -> Self {
        DataAvailability::EthDa
    }
}

impl From<String> for DataAvailability {
    fn from(value: String) -> Self {
        match value.as_str() {
            "eth-da" => DataAvailability::EthDa,
            "alt-da" => DataAvailability::AltDa,
            _ => DataAvailability::Other(value),
        }
    }
}

impl From<DataAvailability> for String {
    fn from(value: DataAvailability) -> Self {
        match value {
            DataAvailability::EthDa => "eth-da".to_string(),
            DataAvailability::AltDa => "alt-da".to_string(),
            DataAvailability::Other(other) => other,
        }
    }
}

/// Settlement layer of a registry entry; missing parts stay empty
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParentChain {
    /// "L1" or "L2"
    #[serde(rename = "type")]
    pub kind: String,
    /// Parent network name, e.g. "mainnet" or "sepolia"
    pub chain: String,
}

/// Treat an explicit `null` like a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A chain as listed by the rollup registry. Authoritative for identity and governance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryEntry {
    pub name: String,
    /// `"<variant>/<family>"`, e.g. `"sepolia/op"`
    pub identifier: String,
    pub chain_id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub rpc: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub explorers: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub faucets: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub superchain_level: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub governed_by_optimism: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub data_availability_type: DataAvailability,
    #[serde(default, deserialize_with = "null_as_default")]
    pub parent: ParentChain,
}

/// Split a compound identifier into `(variant, family)`.
///
/// Only the first two `/` segments are considered; a missing family is empty.
pub fn split_identifier(identifier: &str) -> (&str, &str) {
    let mut parts = identifier.split('/');
    let variant = parts.next().unwrap_or_default();
    let family = parts.next().unwrap_or_default();
    (variant, family)
}

/// Native currency descriptor from the chain-ID directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// Block explorer descriptor from the chain-ID directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplorerDescriptor {
    #[serde(default)]
    pub name: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standard: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnsRegistry {
    pub registry: String,
}

/// A chain record from the general-purpose chain-ID directory
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkDirectoryItem {
    pub chain_id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub chain: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub network: Option<String>,
    #[serde(default)]
    pub rpc: Vec<String>,
    #[serde(default)]
    pub faucets: Vec<String>,
    #[serde(default)]
    pub native_currency: Option<NativeCurrency>,
    #[serde(default, rename = "infoURL")]
    pub info_url: Option<String>,
    #[serde(default)]
    pub short_name: Option<String>,
    #[serde(default)]
    pub network_id: Option<u64>,
    #[serde(default)]
    pub slip44: Option<u64>,
    #[serde(default)]
    pub ens: Option<EnsRegistry>,
    #[serde(default)]
    pub explorers: Vec<ExplorerDescriptor>,
}

/// A per-chain TVL and branding record from the analytics source
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TvlRecord {
    pub name: String,
    /// Not every analytics chain is EVM; records without an id cannot be joined.
    #[serde(default)]
    pub chain_id: Option<u64>,
    #[serde(default)]
    pub tvl: f64,
    #[serde(default)]
    pub token_symbol: Option<String>,
    #[serde(default, rename = "gecko_id")]
    pub gecko_id: Option<String>,
    #[serde(default)]
    pub cmc_id: Option<String>,
}

/// Colors extracted from a chain logo
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoColors {
    pub average: String,
    pub most_common: String,
    /// Readable text color (`#000000` or `#ffffff`) over the average color
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
}

impl LogoColors {
    pub fn new(average: String, most_common: String) -> Self {
        let text_color = contrasting_text_color(&average).map(str::to_string);
        Self {
            average,
            most_common,
            text_color,
        }
    }
}

/// The merged projection of one registry entry and its optional matches
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedNetwork {
    // Registry fields
    pub name: String,
    pub identifier: String,
    pub chain_id: u64,
    pub rpc: Vec<String>,
    pub faucets: Vec<String>,
    pub superchain_level: u64,
    pub governed_by_optimism: bool,
    pub data_availability_type: DataAvailability,
    pub parent: ParentChain,

    // Directory fields
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub native_currency: Option<NativeCurrency>,
    #[serde(rename = "infoURL", skip_serializing_if = "Option::is_none")]
    pub info_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slip44: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ens: Option<EnsRegistry>,

    // Merged and derived fields
    pub explorers: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tvl: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_colors: Option<LogoColors>,
}

impl EnrichedNetwork {
    pub fn identifier_parts(&self) -> (&str, &str) {
        split_identifier(&self.identifier)
    }

    /// TVL used for ranking; missing TVL ranks as zero
    pub fn ranking_tvl(&self) -> f64 {
        self.tvl.unwrap_or(0.0)
    }
}

/// A main network and the variant networks attached to it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedGroup {
    pub main: EnrichedNetwork,
    pub other: Vec<EnrichedNetwork>,
}

impl AggregatedGroup {
    pub fn new(main: EnrichedNetwork) -> Self {
        Self {
            main,
            other: Vec::new(),
        }
    }

    /// Number of networks in the group, main included
    pub fn len(&self) -> usize {
        1 + self.other.len()
    }

    pub fn networks(&self) -> impl Iterator<Item = &EnrichedNetwork> {
        std::iter::once(&self.main).chain(self.other.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_identifier() {
        assert_eq!(split_identifier("mainnet/op"), ("mainnet", "op"));
        assert_eq!(split_identifier("sepolia/op-stack"), ("sepolia", "op-stack"));
        assert_eq!(split_identifier("devnet/zora/extra"), ("devnet", "zora"));
        assert_eq!(split_identifier("orphan"), ("orphan", ""));
    }

    #[test]
    fn test_registry_entry_deserializes_upstream_shape() {
        let json = r#"{
            "name": "OP Mainnet",
            "identifier": "mainnet/op",
            "chainId": 10,
            "rpc": ["https://mainnet.optimism.io"],
            "explorers": ["https://explorer.optimism.io"],
            "superchainLevel": 2,
            "governedByOptimism": true,
            "dataAvailabilityType": "eth-da",
            "parent": { "type": "L2", "chain": "mainnet" },
            "gasPayingToken": null
        }"#;

        let entry: RegistryEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.chain_id, 10);
        assert_eq!(split_identifier(&entry.identifier), ("mainnet", "op"));
        assert!(entry.faucets.is_empty());
        assert_eq!(entry.data_availability_type, DataAvailability::EthDa);
        assert_eq!(entry.parent.kind, "L2");
    }

    #[test]
    fn test_registry_entry_tolerates_new_shapes() {
        let json = r#"{
            "name": "Fresh",
            "identifier": "mainnet/fresh",
            "chainId": 9000,
            "explorers": null,
            "dataAvailabilityType": "celestia-da",
            "parent": { "chain": "mainnet" }
        }"#;

        let entry: RegistryEntry = serde_json::from_str(json).unwrap();
        assert!(entry.explorers.is_empty());
        assert_eq!(
            entry.data_availability_type,
            DataAvailability::Other("celestia-da".to_string())
        );
        assert_eq!(entry.parent.kind, "");
        assert_eq!(entry.parent.chain, "mainnet");

        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["dataAvailabilityType"], "celestia-da");
    }

    #[test]
    fn test_registry_entry_without_identity_is_rejected() {
        let json = r#"{ "identifier": "mainnet/anon", "chainId": 1 }"#;
        assert!(serde_json::from_str::<RegistryEntry>(json).is_err());
    }

    #[test]
    fn test_directory_item_reads_info_url_and_explorers() {
        let json = r#"{
            "name": "OP Mainnet",
            "chain": "ETH",
            "icon": "optimism",
            "rpc": ["https://mainnet.optimism.io"],
            "faucets": [],
            "nativeCurrency": { "name": "Ether", "symbol": "ETH", "decimals": 18 },
            "infoURL": "https://optimism.io",
            "shortName": "oeth",
            "chainId": 10,
            "networkId": 10,
            "explorers": [{ "name": "etherscan", "url": "https://optimistic.etherscan.io", "standard": "EIP3091" }]
        }"#;

        let item: NetworkDirectoryItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.info_url.as_deref(), Some("https://optimism.io"));
        assert_eq!(item.explorers[0].url, "https://optimistic.etherscan.io");
        assert_eq!(item.native_currency.unwrap().symbol, "ETH");
    }

    #[test]
    fn test_tvl_record_tolerates_missing_chain_id() {
        let json = r#"{ "gecko_id": null, "tvl": 12.5, "tokenSymbol": null, "cmcId": null, "name": "Solana", "chainId": null }"#;
        let record: TvlRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.chain_id, None);
        assert_eq!(record.tvl, 12.5);
    }

    #[test]
    fn test_enriched_network_omits_absent_fields() {
        let network = EnrichedNetwork {
            name: "Zora".to_string(),
            identifier: "mainnet/zora".to_string(),
            chain_id: 7777777,
            ..Default::default()
        };

        let value = serde_json::to_value(&network).unwrap();
        assert_eq!(value["chainId"], 7777777);
        assert!(value.get("logo").is_none());
        assert!(value.get("logoColors").is_none());
        assert!(value.get("tvl").is_none());
        assert_eq!(value["dataAvailabilityType"], "eth-da");
    }
}
