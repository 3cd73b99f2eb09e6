//! # Superchain API
//!
//! HTTP surface over the catalog pipeline:
//! - `GET /api/chains` - the ranked catalog, optionally filtered with `?search=`
//! - `GET /api/chains/:chain_id_or_name` - a single group
//! - `GET /health`

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use superchain_catalog::CatalogPipeline;

pub mod cache;
pub mod config;
pub mod error;
pub mod handlers;

pub use cache::CatalogCache;
pub use config::{ApiConfig, ServerConfig};
pub use error::{ApiError, ErrorResponse};

/// Application state shared across handlers, built once per server
#[derive(Clone)]
pub struct AppState {
    pub pipeline: CatalogPipeline,
    pub cache: Arc<CatalogCache>,
}

impl AppState {
    pub fn new(pipeline: CatalogPipeline, server: &ServerConfig) -> Self {
        Self {
            pipeline,
            cache: Arc::new(CatalogCache::new(server.cache_ttl())),
        }
    }
}

/// Build the application router
pub fn build_router(state: AppState, allow_any_origin: bool) -> Router {
    let router = Router::new()
        .route("/api/chains", get(handlers::list_chains))
        .route("/api/chains/:chain_id_or_name", get(handlers::get_chain))
        .route("/health", get(handlers::health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if allow_any_origin {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}
