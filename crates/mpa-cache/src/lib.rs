//! Template content caches for MPA.
//!
//! [`TemplateCache`] owns the two independent stores used by the render
//! pipeline:
//!
//! - **raw**: template file contents, keyed by template path
//! - **rendered**: compiled output, keyed by the exact (template text,
//!   serialized data) pair
//!
//! Both stores are keyed by content identity, not page identity: two pages
//! sharing a template file share its raw entry, and two renders of the same
//! template text with the same data share the rendered entry. There is no
//! fine-grained invalidation; [`TemplateCache::clear`] empties both stores
//! and is called at every registry-rebuild boundary.
//!
//! # Example
//!
//! ```
//! use mpa_cache::TemplateCache;
//!
//! let cache = TemplateCache::new();
//! cache.store_rendered("<h1></h1>", "{}", "<h1></h1>");
//! assert_eq!(cache.rendered("<h1></h1>", "{}").as_deref(), Some("<h1></h1>"));
//!
//! cache.clear();
//! assert_eq!(cache.rendered("<h1></h1>", "{}"), None);
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Error reading a template file.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    /// The template file could not be read.
    #[error("failed to read template {}: {source}", path.display())]
    Read {
        /// Path of the unreadable template.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// The two template stores shared by discovery, the dev router, and the
/// build pipeline.
///
/// Shared by reference (typically `Arc`) rather than held as a global; all
/// methods take `&self`.
///
/// # Panics
///
/// Methods panic if an internal lock is poisoned.
#[derive(Default)]
pub struct TemplateCache {
    /// Template path -> raw file contents.
    raw: RwLock<HashMap<PathBuf, String>>,
    /// (template text, serialized data) -> rendered HTML.
    rendered: RwLock<HashMap<(String, String), String>>,
}

impl TemplateCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a template's raw contents, reading the file on first access.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::Read`] if the file cannot be read.
    pub fn template_content(&self, path: &Path) -> Result<String, TemplateError> {
        self.template_content_with(path, |path| std::fs::read_to_string(path))
    }

    /// Get a template's raw contents, calling `loader` on cache miss.
    ///
    /// The loader runs at most once per path between [`clear`](Self::clear)
    /// calls; repeated lookups are served from the store.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::Read`] if the loader fails. Failures are not
    /// cached; the next lookup retries.
    pub fn template_content_with(
        &self,
        path: &Path,
        loader: impl FnOnce(&Path) -> std::io::Result<String>,
    ) -> Result<String, TemplateError> {
        if let Some(content) = self.raw.read().unwrap().get(path) {
            tracing::debug!(path = %path.display(), "template cache hit");
            return Ok(content.clone());
        }

        tracing::debug!(path = %path.display(), "template cache miss, reading file");
        let content = loader(path).map_err(|source| TemplateError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        self.raw
            .write()
            .unwrap()
            .insert(path.to_path_buf(), content.clone());
        Ok(content)
    }

    /// Look up a rendered result for the exact (template, data) pair.
    #[must_use]
    pub fn rendered(&self, template: &str, data: &str) -> Option<String> {
        self.rendered
            .read()
            .unwrap()
            .get(&(template.to_owned(), data.to_owned()))
            .cloned()
    }

    /// Store a rendered result for the (template, data) pair.
    pub fn store_rendered(&self, template: &str, data: &str, html: &str) {
        self.rendered
            .write()
            .unwrap()
            .insert((template.to_owned(), data.to_owned()), html.to_owned());
    }

    /// Empty both stores.
    ///
    /// Called at the start of each configuration pass; stale entries are
    /// never invalidated individually.
    pub fn clear(&self) {
        let raw_count = {
            let mut raw = self.raw.write().unwrap();
            let count = raw.len();
            raw.clear();
            count
        };
        let rendered_count = {
            let mut rendered = self.rendered.write().unwrap();
            let count = rendered.len();
            rendered.clear();
            count
        };
        tracing::debug!(raw_count, rendered_count, "template caches cleared");
    }
}
