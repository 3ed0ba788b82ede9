//! Post-bundle output relocation.

use std::path::Path;

use crate::stage::SCRATCH_DIR_NAME;

/// Move bundled HTML out of the nested scratch subtree.
///
/// Bundlers that preserve input paths write HTML under
/// `<out_dir>/.mpa-temp/...`; this step moves every file and directory in
/// that subtree to the corresponding position directly under `out_dir`,
/// then removes the emptied subtree. Nothing outside the scratch subtree is
/// touched, a missing subtree is a no-op, and failures are logged rather
/// than propagated; the build is still considered complete.
pub fn relocate_staged_output(out_dir: &Path) {
    let scratch = out_dir.join(SCRATCH_DIR_NAME);
    if !scratch.is_dir() {
        return;
    }

    tracing::info!(dir = %scratch.display(), "relocating bundled output");
    if let Err(error) = move_tree(&scratch, out_dir) {
        tracing::warn!(%error, "failed to relocate bundled output");
    }
    if let Err(error) = std::fs::remove_dir_all(&scratch) {
        tracing::warn!(%error, "failed to remove scratch subtree from output");
    }
}

/// Recursively move every entry of `source` into `target`.
fn move_tree(source: &Path, target: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(source)? {
        let entry = entry?;
        let from = entry.path();
        let to = target.join(entry.file_name());

        if from.is_dir() {
            std::fs::create_dir_all(&to)?;
            move_tree(&from, &to)?;
        } else {
            if let Some(parent) = to.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::rename(&from, &to)?;
            tracing::debug!(from = %from.display(), to = %to.display(), "moved output file");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn write(root: &Path, path: &str, contents: &str) {
        let full = root.join(path);
        std::fs::create_dir_all(full.parent().unwrap()).unwrap();
        std::fs::write(full, contents).unwrap();
    }

    #[test]
    fn test_relocates_nested_files_and_removes_scratch() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path();
        write(out, ".mpa-temp/sub/a.html", "<a/>");
        write(out, ".mpa-temp/index.html", "<i/>");

        relocate_staged_output(out);

        assert_eq!(std::fs::read_to_string(out.join("sub/a.html")).unwrap(), "<a/>");
        assert_eq!(std::fs::read_to_string(out.join("index.html")).unwrap(), "<i/>");
        assert!(!out.join(".mpa-temp").exists());
    }

    #[test]
    fn test_merges_into_existing_directories() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path();
        write(out, "assets/app.js", "js");
        write(out, ".mpa-temp/assets/page.html", "<p/>");

        relocate_staged_output(out);

        // Pre-existing bundler output is left alone
        assert!(out.join("assets/app.js").is_file());
        assert!(out.join("assets/page.html").is_file());
        assert!(!out.join(".mpa-temp").exists());
    }

    #[test]
    fn test_missing_scratch_subtree_is_noop() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "index.html", "<i/>");

        relocate_staged_output(tmp.path());

        assert!(tmp.path().join("index.html").is_file());
    }
}
