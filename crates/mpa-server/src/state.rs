//! Application state.
//!
//! Shared state for all request handlers. Read-only during a request; the
//! registry is built once at startup and replaced wholesale on the next run.

use std::path::PathBuf;

use mpa_site::{HtmlTransform, PageRegistry, PageRenderer};

/// Application state shared across all handlers.
pub(crate) struct AppState {
    /// Page registry from the discovery pass at startup.
    pub(crate) registry: PageRegistry,
    /// Renderer shared with the build mode (same pipeline, same caches).
    pub(crate) renderer: PageRenderer,
    /// Project root for static files and entry-script paths.
    pub(crate) root: PathBuf,
    /// Public base path prefix for injected entry scripts.
    pub(crate) base: String,
    /// HTML post-processing chain applied after each render.
    pub(crate) transforms: Vec<Box<dyn HtmlTransform>>,
}
