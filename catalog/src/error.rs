//! Error types for the catalog pipeline

use thiserror::Error;

/// Result type alias for catalog operations
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Error types raised while building the chain catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// One of the three upstream sources could not be read. Fatal to the invocation.
    #[error("Failed to fetch {source_name} from {url}: {message}")]
    SourceFetch {
        source_name: &'static str,
        url: String,
        status: Option<u16>,
        message: String,
    },

    #[error("Failed to fetch image {url}: {message}")]
    ImageFetch { url: String, message: String },

    #[error("Image decode error: {0}")]
    ImageDecode(#[from] image::ImageError),

    #[error("Image has no pixels")]
    EmptyImage,

    #[error("Request to {url} timed out after {timeout_ms}ms")]
    Timeout { url: String, timeout_ms: u128 },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CatalogError {
    /// Create a new source fetch error
    pub fn source_fetch<S: Into<String>>(
        source_name: &'static str,
        url: S,
        status: Option<u16>,
        message: S,
    ) -> Self {
        Self::SourceFetch {
            source_name,
            url: url.into(),
            status,
            message: message.into(),
        }
    }

    /// Create a new image fetch error
    pub fn image_fetch<S: Into<String>>(url: S, message: S) -> Self {
        Self::ImageFetch {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create a new internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            CatalogError::SourceFetch { status, .. } => *status,
            CatalogError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether the error aborts a whole pipeline invocation
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            CatalogError::ImageFetch { .. } | CatalogError::ImageDecode(_) | CatalogError::EmptyImage
        )
    }

    /// Get the error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            CatalogError::Config(_) => "config",
            CatalogError::Network(_) => "network",
            CatalogError::Serialization(_) => "serialization",
            CatalogError::Io(_) => "io",
            CatalogError::SourceFetch { .. } => "source_fetch",
            CatalogError::ImageFetch { .. } => "image",
            CatalogError::ImageDecode(_) => "image",
            CatalogError::EmptyImage => "image",
            CatalogError::Timeout { .. } => "timeout",
            CatalogError::Internal(_) => "internal",
        }
    }
}
