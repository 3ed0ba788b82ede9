//! Page registry, discovery and rendering for MPA.
//!
//! This crate provides:
//! - [`Page`] / [`PageRegistry`]: the data model shared by the serve and
//!   build execution modes
//! - [`scan_pages`]: directory-driven page discovery
//! - [`OutputLayout`]: the output-path resolution policy
//! - [`PageRenderer`]: template resolution, cached rendering and
//!   entry-script injection
//! - [`HtmlTransform`]: the HTML post-processing boundary
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::path::Path;
//! use std::sync::Arc;
//! use mpa_cache::TemplateCache;
//! use mpa_site::{OutputLayout, PageRenderer, ScanConfig, scan_pages};
//!
//! let root = Path::new("/project");
//! let config = ScanConfig {
//!     pages_dir: root.join("src/pages"),
//!     template: root.join("index.html"),
//!     nested: true,
//!     layout: OutputLayout::None,
//! };
//! let registry = scan_pages(&config, false);
//!
//! let cache = Arc::new(TemplateCache::new());
//! let renderer = PageRenderer::new(cache);
//! for page in registry.values() {
//!     let html = renderer.render_page(page)?;
//! }
//! # Ok(())
//! # }
//! ```

mod output;
mod page;
mod render;
mod scan;
mod transform;

pub use output::{OutputLayout, OutputPathFn};
pub use page::{Page, PageRegistry};
pub use render::{DEFAULT_TEMPLATE, PageRenderError, PageRenderer, entry_url, inject_entry_script};
pub use scan::{ENTRY_CANDIDATES, ScanConfig, scan_pages};
pub use transform::{HtmlTransform, TransformContext, apply_transforms};
