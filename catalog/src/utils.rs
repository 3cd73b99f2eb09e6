//! Utility functions shared by the fetchers and the enricher

use std::collections::HashSet;
use std::time::Duration;
use tokio::time::timeout;
use tracing::warn;

use crate::{CatalogError, Result};

/// Execute a request future with a timeout, reporting `url` on expiry
pub async fn with_timeout<F, T>(future: F, timeout_duration: Duration, url: &str) -> Result<T>
where
    F: std::future::Future<Output = Result<T>>,
{
    match timeout(timeout_duration, future).await {
        Ok(result) => result,
        Err(_) => {
            warn!(
                url = url,
                timeout_ms = timeout_duration.as_millis(),
                "Request timed out"
            );
            Err(CatalogError::Timeout {
                url: url.to_string(),
                timeout_ms: timeout_duration.as_millis(),
            })
        }
    }
}

/// Concatenate two URL lists, dropping repeats and keeping first-seen order
pub fn merge_unique<'a, A, B>(first: A, second: B) -> Vec<String>
where
    A: IntoIterator<Item = &'a str>,
    B: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    first
        .into_iter()
        .chain(second)
        .filter(|url| seen.insert(*url))
        .map(str::to_string)
        .collect()
}

/// Lower-cased name with whitespace and hyphens removed, for logo URLs
pub fn name_slug(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Whether an HTTP status code is in the 2xx range
pub fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_unique_keeps_first_seen_order() {
        let registry = ["a.com", "b.com"];
        let directory = ["b.com", "c.com"];
        assert_eq!(
            merge_unique(registry, directory),
            vec!["a.com", "b.com", "c.com"]
        );
    }

    #[test]
    fn test_merge_unique_dedups_within_one_source() {
        assert_eq!(merge_unique(["x", "x", "y"], []), vec!["x", "y"]);
        assert!(merge_unique([], []).is_empty());
    }

    #[test]
    fn test_name_slug() {
        assert_eq!(name_slug("OP Mainnet"), "opmainnet");
        assert_eq!(name_slug("Arena-Z"), "arenaz");
        assert_eq!(name_slug("  Base\t"), "base");
        assert_eq!(name_slug("Zora"), "zora");
    }

    #[test]
    fn test_is_success() {
        assert!(is_success(200));
        assert!(is_success(204));
        assert!(!is_success(301));
        assert!(!is_success(404));
        assert!(!is_success(500));
    }

    #[tokio::test]
    async fn test_with_timeout_expires() {
        let result: Result<()> = with_timeout(
            async {
                tokio::time::sleep(Duration::from_millis(200)).await;
                Ok(())
            },
            Duration::from_millis(10),
            "https://slow.example",
        )
        .await;

        match result {
            Err(CatalogError::Timeout { url, timeout_ms }) => {
                assert_eq!(url, "https://slow.example");
                assert_eq!(timeout_ms, 10);
            }
            other => panic!("expected timeout, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_with_timeout_passes_result_through() {
        let result = with_timeout(async { Ok(7) }, Duration::from_secs(1), "https://fast.example").await;
        assert_eq!(result.unwrap(), 7);
    }
}
