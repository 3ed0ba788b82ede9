//! External bundler boundary.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Bundler error.
#[derive(Debug, thiserror::Error)]
pub enum BundleError {
    /// I/O error while producing output.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The bundler reported a failure.
    #[error("bundler failed: {0}")]
    Failed(String),
}

/// The external bundler consuming staged HTML entry points.
///
/// Receives the page-name to staged-path input set and the final output
/// directory. Implementations typically preserve each input's path relative
/// to the project root, which is why bundled HTML lands inside a
/// scratch-named subtree of the output directory and the relocation step
/// exists.
pub trait Bundler {
    /// Bundle the inputs into `out_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`BundleError`] if bundling fails as a whole.
    fn bundle(&self, inputs: &BTreeMap<String, PathBuf>, out_dir: &Path)
    -> Result<(), BundleError>;
}

/// Built-in bundler that copies staged HTML into the output directory.
///
/// Each input is copied to `out_dir` at its path relative to the project
/// root, mirroring how multi-entry bundlers lay out HTML outputs. No script
/// processing happens; entry tags are left as written by the stager.
pub struct CopyBundler {
    root: PathBuf,
}

impl CopyBundler {
    /// Create a copy bundler for a project root.
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }
}

impl Bundler for CopyBundler {
    fn bundle(
        &self,
        inputs: &BTreeMap<String, PathBuf>,
        out_dir: &Path,
    ) -> Result<(), BundleError> {
        for (name, input) in inputs {
            let relative = input.strip_prefix(&self.root).unwrap_or(input.as_path());
            let destination = out_dir.join(relative);
            if let Some(parent) = destination.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::copy(input, &destination)?;
            tracing::debug!(page = %name, path = %destination.display(), "bundled page");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_copy_bundler_preserves_root_relative_layout() {
        let tmp = TempDir::new().unwrap();
        let staged = tmp.path().join(".mpa-temp/sub/a.html");
        std::fs::create_dir_all(staged.parent().unwrap()).unwrap();
        std::fs::write(&staged, "<html/>").unwrap();

        let mut inputs = BTreeMap::new();
        inputs.insert("sub/a".to_owned(), staged);
        let out_dir = tmp.path().join("dist");

        CopyBundler::new(tmp.path().to_path_buf())
            .bundle(&inputs, &out_dir)
            .unwrap();

        // Output mirrors the scratch-relative input path, nested scratch and all
        assert!(out_dir.join(".mpa-temp/sub/a.html").is_file());
    }

    #[test]
    fn test_copy_bundler_missing_input_is_error() {
        let tmp = TempDir::new().unwrap();
        let mut inputs = BTreeMap::new();
        inputs.insert("gone".to_owned(), tmp.path().join("missing.html"));

        let result =
            CopyBundler::new(tmp.path().to_path_buf()).bundle(&inputs, &tmp.path().join("dist"));

        assert!(matches!(result, Err(BundleError::Io(_))));
    }
}
