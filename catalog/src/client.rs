//! HTTP client seam used by the source fetchers and the logo fetch

use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use crate::{config::HttpConfig, utils::with_timeout, Result};

/// A fetched response: status code and raw body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub fn with_status(status: u16) -> Self {
        Self {
            status,
            body: Vec::new(),
        }
    }
}

/// Read-only HTTP access to the upstream sources and the logo host
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SourceClient: Send + Sync {
    /// Issue a GET request. Non-2xx statuses are returned, not raised.
    async fn get(&self, url: &str) -> Result<HttpResponse>;
}

/// `reqwest`-backed client with a per-request timeout
#[derive(Debug, Clone)]
pub struct HttpSourceClient {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpSourceClient {
    /// Create a new client from HTTP settings
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .connect_timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            client,
            timeout: config.request_timeout(),
        })
    }
}

#[async_trait]
impl SourceClient for HttpSourceClient {
    async fn get(&self, url: &str) -> Result<HttpResponse> {
        let request = async {
            let response = self.client.get(url).send().await?;
            let status = response.status().as_u16();
            let body = response.bytes().await?.to_vec();
            Ok(HttpResponse { status, body })
        };

        let response = with_timeout(request, self.timeout, url).await?;
        debug!(
            url = url,
            status = response.status,
            bytes = response.body.len(),
            "Fetched"
        );
        Ok(response)
    }
}
