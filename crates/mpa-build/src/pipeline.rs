//! Build lifecycle orchestration.

use std::path::PathBuf;

use mpa_site::PageRegistry;

use crate::bundler::{BundleError, Bundler};
use crate::relocate::relocate_staged_output;
use crate::stage::{StageError, Stager};

/// Build error.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// Staging failed before any bundler input existed.
    #[error(transparent)]
    Stage(#[from] StageError),
    /// The bundler failed.
    #[error(transparent)]
    Bundle(#[from] BundleError),
}

/// Outcome of a completed build.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildSummary {
    /// Number of pages handed to the bundler.
    pub pages: usize,
    /// Final output directory.
    pub out_dir: PathBuf,
}

/// One-shot build run: stage, bundle, relocate, clean up.
///
/// Cleanup of scratch artifacts is guaranteed at run completion on both the
/// success and the failure path.
pub struct BuildPipeline<'a> {
    stager: Stager,
    bundler: &'a dyn Bundler,
    out_dir: PathBuf,
}

impl<'a> BuildPipeline<'a> {
    /// Create a pipeline.
    #[must_use]
    pub fn new(stager: Stager, bundler: &'a dyn Bundler, out_dir: PathBuf) -> Self {
        Self {
            stager,
            bundler,
            out_dir,
        }
    }

    /// Run the build to completion.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError`] if staging produced no usable input set or the
    /// bundler failed. Scratch artifacts are removed either way.
    pub fn run(&mut self, registry: &PageRegistry) -> Result<BuildSummary, BuildError> {
        let result = self.run_inner(registry);
        self.stager.cleanup();
        result
    }

    fn run_inner(&mut self, registry: &PageRegistry) -> Result<BuildSummary, BuildError> {
        let inputs = self.stager.stage(registry)?;
        tracing::info!(
            pages = inputs.len(),
            out_dir = %self.out_dir.display(),
            "bundling staged pages"
        );

        self.bundler.bundle(&inputs, &self.out_dir)?;
        relocate_staged_output(&self.out_dir);

        Ok(BuildSummary {
            pages: inputs.len(),
            out_dir: self.out_dir.clone(),
        })
    }
}
