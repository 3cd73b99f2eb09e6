//! Route handlers

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use superchain_catalog::{filter_by_name, find_group};

use crate::{cache::Catalog, error::ApiError, AppState};

/// Query parameters for `GET /api/chains`
#[derive(Debug, Default, Deserialize)]
pub struct ChainsQuery {
    /// Case-insensitive substring of the main network name
    pub search: Option<String>,
}

/// GET /api/chains
pub async fn list_chains(
    State(state): State<AppState>,
    Query(query): Query<ChainsQuery>,
) -> Result<Response, ApiError> {
    let catalog = load_catalog(&state).await?;

    let response = match query.search.as_deref() {
        Some(search) => Json(filter_by_name(&catalog, search)).into_response(),
        None => Json(catalog.as_slice()).into_response(),
    };
    Ok(response)
}

/// GET /api/chains/:chain_id_or_name
pub async fn get_chain(
    State(state): State<AppState>,
    Path(chain_id_or_name): Path<String>,
) -> Result<Response, ApiError> {
    let catalog = load_catalog(&state).await?;

    match find_group(&catalog, &chain_id_or_name) {
        Some(group) => Ok(Json(group).into_response()),
        None => Err(ApiError::ChainNotFound(chain_id_or_name)),
    }
}

/// Serve the cached catalog or run the pipeline
async fn load_catalog(state: &AppState) -> Result<Catalog, ApiError> {
    if let Some(catalog) = state.cache.get().await {
        return Ok(catalog);
    }

    let catalog = Arc::new(state.pipeline.run().await?);
    info!(groups = catalog.len(), "Catalog regenerated");
    state.cache.insert(catalog.clone()).await;
    Ok(catalog)
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub module: String,
    pub version: String,
}

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        module: "superchain-api".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
