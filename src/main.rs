// Main entry point - Dependency injection and server setup
mod domain;
mod application;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};
use anyhow::Context;
use axum::{routing::get, Router};
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::catalog_service::CatalogService;
use crate::application::dashboard_service::DashboardService;
use crate::application::series_provider::SeriesProvider;
use crate::application::streaming_service::StreamingDashboardService;
use crate::infrastructure::config::load_app_config;
use crate::infrastructure::random_provider::RandomSeriesProvider;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    compare, entity_detail, entity_regression, health_check, list_entities, overview,
    stream_overview,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = load_app_config()?;
    let catalog = Arc::new(config.catalog()?);
    if catalog.is_empty() {
        tracing::warn!("Catalog is empty, the overview will have no cards");
    } else {
        tracing::info!("Loaded catalog with {} entities", catalog.len());
    }
    let clock = config.defaults.display_clock()?;

    // Create series provider (infrastructure layer)
    let synth = &config.synthesizer;
    let provider: Arc<dyn SeriesProvider> = Arc::new(RandomSeriesProvider::new(
        synth.min_value,
        synth.max_value,
        synth.seed,
    )?);

    // Create services (application layer)
    let catalog_service = CatalogService::new(catalog.clone());
    let dashboard_service =
        DashboardService::new(provider.clone(), catalog.clone(), config.defaults, clock);
    let streaming_service = StreamingDashboardService::new(provider, catalog, clock);

    // Create application state
    let state = Arc::new(AppState {
        catalog_service,
        dashboard_service,
        streaming_service,
    });

    // Build router (presentation layer)
    // The NDJSON stream is registered after the compression layer so lines
    // reach the client as soon as they are produced.
    let router = Router::new()
        .route("/entities", get(list_entities))
        .route("/entities/:name", get(entity_detail))
        .route("/entities/:name/regression", get(entity_regression))
        .route("/dashboard", get(overview))
        .route("/compare", get(compare))
        .layer(CompressionLayer::new())
        .route("/dashboard/stream", get(stream_overview))
        .route("/healthz", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = config
        .server
        .bind_addr
        .parse()
        .with_context(|| format!("invalid bind address '{}'", config.server.bind_addr))?;
    tracing::info!("Starting crypto-dashboard service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
