//! HTTP error responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

use superchain_catalog::CatalogError;

/// JSON body of every error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Errors returned by the API handlers.
///
/// Upstream details are logged but never sent to the client.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Failed to fetch chain data: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Chain not found: {0}")]
    ChainNotFound(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Catalog(e) => {
                error!(
                    category = e.category(),
                    upstream_status = ?e.status(),
                    error = %e,
                    "Error fetching chain data"
                );
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch chain data.")
            }
            ApiError::ChainNotFound(_) => (StatusCode::NOT_FOUND, "Chain not found"),
        };

        (
            status,
            Json(ErrorResponse {
                error: message.to_string(),
            }),
        )
            .into_response()
    }
}
