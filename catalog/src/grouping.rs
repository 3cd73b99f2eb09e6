//! Hierarchical grouping of enriched networks into main/variant groups
//!
//! Identifiers look like `"<variant>/<family>"`. Every `mainnet` entry opens a
//! new group. Any other entry joins the first group whose main family is a
//! substring of its own family, or opens a group of its own when none matches.
//! The substring match is deliberately loose so `op-stack` variants attach to
//! an `op` mainnet.

use std::cmp::Ordering;
use tracing::debug;

use crate::types::{AggregatedGroup, EnrichedNetwork};

/// Variant segment that always starts a new group
pub const MAINNET_VARIANT: &str = "mainnet";

/// Partition networks into groups, preserving input order. The result is unsorted.
pub fn group_networks(networks: Vec<EnrichedNetwork>) -> Vec<AggregatedGroup> {
    let mut groups: Vec<AggregatedGroup> = Vec::new();

    for network in networks {
        let (variant, family) = network.identifier_parts();

        if variant == MAINNET_VARIANT {
            groups.push(AggregatedGroup::new(network));
            continue;
        }

        let target = groups
            .iter()
            .position(|group| family_matches(family, group.main.identifier_parts().1));

        match target {
            Some(index) => groups[index].other.push(network),
            None => {
                debug!(identifier = %network.identifier, "No main network matched, opening group");
                groups.push(AggregatedGroup::new(network));
            }
        }
    }

    groups
}

/// Whether a variant's family belongs under a main network's family.
/// An empty main family never attracts variants.
fn family_matches(family: &str, main_family: &str) -> bool {
    !main_family.is_empty() && family.contains(main_family)
}

/// Sort groups by main TVL, highest first. Missing TVL ranks as zero; ties keep input order.
pub fn sort_by_tvl(groups: &mut [AggregatedGroup]) {
    groups.sort_by(|a, b| {
        b.main
            .ranking_tvl()
            .partial_cmp(&a.main.ranking_tvl())
            .unwrap_or(Ordering::Equal)
    });
}

/// Find a group by its main network's chain ID (numeric key) or name (case-insensitive)
pub fn find_group<'a>(groups: &'a [AggregatedGroup], chain_id_or_name: &str) -> Option<&'a AggregatedGroup> {
    let key = chain_id_or_name.trim();

    if let Ok(chain_id) = key.parse::<u64>() {
        if let Some(group) = groups.iter().find(|group| group.main.chain_id == chain_id) {
            return Some(group);
        }
    }

    let name = key.to_lowercase();
    groups
        .iter()
        .find(|group| group.main.name.to_lowercase() == name)
}

/// Groups whose main network name contains `query`, case-insensitively
pub fn filter_by_name<'a>(groups: &'a [AggregatedGroup], query: &str) -> Vec<&'a AggregatedGroup> {
    let query = query.trim().to_lowercase();
    groups
        .iter()
        .filter(|group| group.main.name.to_lowercase().contains(&query))
        .collect()
}
