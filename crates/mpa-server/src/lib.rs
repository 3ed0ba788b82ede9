//! Development server with virtual page routing for MPA.
//!
//! This crate serves discovered pages on demand: requests matching a page
//! name are rendered from the page's template and answered directly, with
//! the page's entry script injected so the browser loads it from source.
//! Nothing is materialized on disk; the registry built at startup is the
//! only routing table.
//!
//! Request handling, in order:
//! 1. Match the path against every page's name variants and resolved output
//!    path; `/` falls back to the page named `index`.
//! 2. If a page matched and the request accepts HTML, render and respond.
//!    A render failure is logged and falls through; the router never owns
//!    terminal error responses.
//! 3. Otherwise delegate down the chain: static files from the project
//!    root, a generated page listing for `/`, then 404.
//!
//! # Architecture
//!
//! ```text
//! Browser ──HTTP──► axum app (mpa-server)
//!                      │
//!                      ├─► virtual pages (registry + PageRenderer + caches)
//!                      │
//!                      ├─► static files (project root)
//!                      │
//!                      └─► "/" page listing fallback
//! ```

mod app;
mod handlers;
mod state;
mod static_files;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use mpa_cache::TemplateCache;
use mpa_render::EngineOptions;
use mpa_site::{OutputLayout, PageRenderer, ScanConfig, scan_pages};
use serde_json::{Map, Value};
use state::AppState;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Project root (static files and entry paths resolve against it).
    pub root: PathBuf,
    /// Directory scanned for page entry points.
    pub pages_dir: PathBuf,
    /// Global fallback template path.
    pub template: PathBuf,
    /// Recurse into subdirectories of matched pages.
    pub nested: bool,
    /// Public base path prefix for injected entry scripts.
    pub base: String,
    /// Record merged into every render context.
    pub default_data: Map<String, Value>,
    /// Template engine options.
    pub engine: EngineOptions,
    /// Log the local URL on startup.
    pub open_auto: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 5173,
            root: PathBuf::from("."),
            pages_dir: PathBuf::from("src/pages"),
            template: PathBuf::from("index.html"),
            nested: true,
            base: "/".to_owned(),
            default_data: Map::new(),
            engine: EngineOptions::default(),
            open_auto: true,
        }
    }
}

/// Run the dev server.
///
/// Discovers pages once, installs the virtual router and serves until
/// ctrl-c. The template caches are cleared at this registry-build boundary
/// and live for the rest of the process.
///
/// # Errors
///
/// Returns an error if the server fails to bind or start.
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let cache = Arc::new(TemplateCache::new());
    cache.clear();

    let scan_config = ScanConfig {
        pages_dir: config.pages_dir.clone(),
        template: config.template.clone(),
        nested: config.nested,
        // The dev router always serves pages at their discovered path
        layout: OutputLayout::None,
    };
    let registry = scan_pages(&scan_config, false);
    tracing::info!(pages = registry.len(), "virtual routing installed");

    let renderer = PageRenderer::new(Arc::clone(&cache))
        .with_default_data(config.default_data.clone())
        .with_options(config.engine.clone());

    let state = Arc::new(AppState {
        registry,
        renderer,
        root: config.root.clone(),
        base: config.base.clone(),
        transforms: Vec::new(),
    });

    let app = app::create_router(state);

    let addr = SocketAddr::from_str(&format!("{}:{}", config.host, config.port))?;
    tracing::info!(address = %addr, "Starting dev server");
    if config.open_auto {
        tracing::info!("dev server running at http://{}:{}/", config.host, config.port);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Create server configuration from MPA config.
///
/// # Arguments
///
/// * `config` - MPA configuration
#[must_use]
pub fn server_config_from_config(config: &mpa_config::Config) -> ServerConfig {
    ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        root: config.root.clone(),
        pages_dir: config.pages_resolved.dir.clone(),
        template: config.pages_resolved.template.clone(),
        nested: config.pages_resolved.nested,
        base: config.server.base.clone(),
        default_data: config.pages_resolved.default_data.clone(),
        engine: config.engine.clone(),
        open_auto: config.server.open_auto,
    }
}
