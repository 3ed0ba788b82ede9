//! Build staging pipeline for MPA.
//!
//! A batch build materializes one HTML file per page into a scratch
//! directory, hands the file set to an external bundler, then fixes up the
//! bundler's output layout and removes every temporary artifact. This crate
//! provides:
//!
//! - [`Stager`]: scratch-file generation and unconditional cleanup
//! - [`Bundler`]: the external-bundler boundary, with [`CopyBundler`] as the
//!   built-in implementation
//! - [`relocate_staged_output`]: the post-bundle relocation step
//! - [`BuildPipeline`]: the lifecycle orchestration (stage → bundle →
//!   relocate → cleanup)
//!
//! Failure philosophy: a page that fails to stage is skipped, relocation
//! problems are logged, and cleanup never raises. The only fatal errors are
//! an unusable scratch directory, a failed fallback page, and a bundler
//! failure.

mod bundler;
mod pipeline;
mod relocate;
mod stage;

pub use bundler::{BundleError, Bundler, CopyBundler};
pub use pipeline::{BuildError, BuildPipeline, BuildSummary};
pub use relocate::relocate_staged_output;
pub use stage::{DEFAULT_ENTRY_SRC, SCRATCH_DIR_NAME, StageError, Stager};
