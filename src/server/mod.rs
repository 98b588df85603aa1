// imgpress/src/server/mod.rs
pub mod handlers;
pub mod models;

use crate::core::{ImageProcessor, Result, ServiceConfig};
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method};
use axum::routing::post;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServiceConfig>,
    pub processor: Arc<ImageProcessor>,
}

impl AppState {
    pub fn new(config: ServiceConfig) -> Result<Self> {
        config.ensure_dirs()?;
        let processor = ImageProcessor::new(config.clone());
        Ok(Self {
            config: Arc::new(config),
            processor: Arc::new(processor),
        })
    }
}

/// Build the application router: the upload endpoint, static serving of the
/// output directory, CORS for the configured frontend origin, and the
/// upload size cap.
pub fn build_router(state: AppState) -> anyhow::Result<Router> {
    let cors = CorsLayer::new()
        .allow_origin(state.config.cors_origin.parse::<HeaderValue>()?)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    let router = Router::new()
        .route(
            "/upload",
            post(handlers::upload).layer(DefaultBodyLimit::max(state.config.max_upload_bytes)),
        )
        .nest_service("/output", ServeDir::new(state.config.output_dir.clone()))
        .layer(cors)
        .with_state(state);

    Ok(router)
}
