//! Scratch-file generation and cleanup.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use mpa_site::{
    DEFAULT_TEMPLATE, Page, PageRegistry, PageRenderError, PageRenderer, entry_url,
    inject_entry_script,
};

/// Scratch directory name, created under the project root.
pub const SCRATCH_DIR_NAME: &str = ".mpa-temp";

/// Conventional entry script injected into the empty-registry fallback page.
pub const DEFAULT_ENTRY_SRC: &str = "/src/main.js";

/// Staging error.
#[derive(Debug, thiserror::Error)]
pub enum StageError {
    /// The page failed to render.
    #[error(transparent)]
    Render(#[from] PageRenderError),
    /// The scratch directory could not be created.
    #[error("failed to create scratch directory {}: {source}", path.display())]
    Scratch {
        /// Scratch directory path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// A staged file could not be written.
    #[error("failed to write staged file {}: {source}", path.display())]
    Write {
        /// Destination path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The fallback page's template could not be read.
    #[error("failed to read fallback template {}: {source}", path.display())]
    Fallback {
        /// Root template path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Materializes pages into the scratch directory and owns the temp-file
/// list.
///
/// Every file the stager writes is recorded; [`cleanup`](Self::cleanup)
/// drains the list unconditionally at run completion, success or failure.
pub struct Stager {
    root: PathBuf,
    renderer: PageRenderer,
    temp_files: Vec<PathBuf>,
}

impl Stager {
    /// Create a stager for a project root.
    #[must_use]
    pub fn new(root: PathBuf, renderer: PageRenderer) -> Self {
        Self {
            root,
            renderer,
            temp_files: Vec::new(),
        }
    }

    /// The scratch directory under the project root.
    #[must_use]
    pub fn scratch_dir(&self) -> PathBuf {
        self.root.join(SCRATCH_DIR_NAME)
    }

    /// Paths of every scratch file written so far.
    #[must_use]
    pub fn temp_files(&self) -> &[PathBuf] {
        &self.temp_files
    }

    /// Write one HTML file per page into the scratch directory.
    ///
    /// Returns the page-name to scratch-path mapping handed to the bundler
    /// as its input set. A page that fails to render or write is logged and
    /// skipped; the rest of the batch still materializes. With an empty
    /// registry a single fallback `index` page is synthesized so the
    /// bundler always receives at least one input.
    ///
    /// # Errors
    ///
    /// Returns [`StageError`] if the scratch directory cannot be created or
    /// the fallback page cannot be produced.
    pub fn stage(&mut self, registry: &PageRegistry) -> Result<BTreeMap<String, PathBuf>, StageError> {
        let scratch = self.scratch_dir();
        std::fs::create_dir_all(&scratch).map_err(|source| StageError::Scratch {
            path: scratch.clone(),
            source,
        })?;

        if registry.is_empty() {
            tracing::warn!("no pages discovered, staging a fallback index page");
            return self.stage_fallback(&scratch);
        }

        let mut inputs = BTreeMap::new();
        for page in registry.values() {
            match self.stage_page(&scratch, page) {
                Ok(path) => {
                    tracing::debug!(page = %page.name, path = %path.display(), "staged page");
                    inputs.insert(page.name.clone(), path);
                }
                Err(error) => {
                    tracing::warn!(page = %page.name, %error, "failed to stage page, skipping");
                }
            }
        }

        tracing::info!(count = inputs.len(), "staged pages for bundling");
        Ok(inputs)
    }

    /// Render one page and write it at its resolved output path.
    fn stage_page(&mut self, scratch: &Path, page: &Page) -> Result<PathBuf, StageError> {
        let destination = scratch.join(&page.output_path);
        if let Some(parent) = destination.parent() {
            std::fs::create_dir_all(parent).map_err(|source| StageError::Write {
                path: destination.clone(),
                source,
            })?;
        }

        let html = self.renderer.render_page(page)?;
        // Root-relative entry path; the bundler rewrites it per output location
        let html = inject_entry_script(&html, &entry_url(&self.root, &page.entry, "/"));

        std::fs::write(&destination, html).map_err(|source| StageError::Write {
            path: destination.clone(),
            source,
        })?;
        self.temp_files.push(destination.clone());
        Ok(destination)
    }

    /// Synthesize the single fallback `index` page.
    ///
    /// Uses the project's root-level template verbatim when one exists, the
    /// built-in skeleton otherwise, and injects the conventional default
    /// entry. The fallback is not compiled; there is no page data to render
    /// it against.
    fn stage_fallback(&mut self, scratch: &Path) -> Result<BTreeMap<String, PathBuf>, StageError> {
        let root_template = self.root.join("index.html");
        let html = if root_template.is_file() {
            std::fs::read_to_string(&root_template).map_err(|source| StageError::Fallback {
                path: root_template.clone(),
                source,
            })?
        } else {
            DEFAULT_TEMPLATE.replace("{{ title }}", "Default Page")
        };
        let html = inject_entry_script(&html, DEFAULT_ENTRY_SRC);

        let destination = scratch.join("index.html");
        std::fs::write(&destination, html).map_err(|source| StageError::Write {
            path: destination.clone(),
            source,
        })?;
        self.temp_files.push(destination.clone());

        let mut inputs = BTreeMap::new();
        inputs.insert("index".to_owned(), destination);
        Ok(inputs)
    }

    /// Remove every recorded scratch file and the scratch directory.
    ///
    /// Runs at batch completion regardless of upstream success. Deletion
    /// errors are logged and swallowed; calling this twice is harmless.
    pub fn cleanup(&mut self) {
        for path in self.temp_files.drain(..) {
            if !path.exists() {
                continue;
            }
            if let Err(error) = std::fs::remove_file(&path) {
                tracing::debug!(path = %path.display(), %error, "failed to remove temp file");
            }
        }

        let scratch = self.scratch_dir();
        if scratch.exists()
            && let Err(error) = std::fs::remove_dir_all(&scratch)
        {
            tracing::debug!(path = %scratch.display(), %error, "failed to remove scratch directory");
        }
    }
}
