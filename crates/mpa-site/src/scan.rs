//! Directory-driven page discovery.
//!
//! [`scan_pages`] walks the pages directory and builds a fresh
//! [`PageRegistry`]. Each recursion step is a pure function returning its own
//! registry, merged by the caller, so no shared accumulator is threaded
//! through the walk.
//!
//! Discovery soft-fails: a missing pages root or an unreadable directory
//! yields an empty registry and the run continues with fallbacks.

use std::path::{Path, PathBuf};

use serde_json::{Value, json};

use crate::output::OutputLayout;
use crate::page::{Page, PageRegistry};

/// Entry-file candidates, probed in order; first match wins.
pub const ENTRY_CANDIDATES: &[&str] = &["index.js", "main.js", "app.js"];

/// Per-page metadata sidecar filename.
const PAGE_DATA_FILENAME: &str = "info.json";

/// Per-page local template filename.
const LOCAL_TEMPLATE_FILENAME: &str = "index.html";

/// Discovery configuration.
#[derive(Debug)]
pub struct ScanConfig {
    /// Directory scanned for page entry points (absolute).
    pub pages_dir: PathBuf,
    /// Global fallback template path (absolute).
    pub template: PathBuf,
    /// Recurse into subdirectories of matched pages.
    pub nested: bool,
    /// Output-path policy applied at discovery time in batch mode.
    pub layout: OutputLayout,
}

/// Discover all pages under the configured pages directory.
///
/// Returns an empty registry when the pages directory is missing or
/// unreadable; discovery is never fatal.
#[must_use]
pub fn scan_pages(config: &ScanConfig, batch_mode: bool) -> PageRegistry {
    if !config.pages_dir.is_dir() {
        tracing::warn!(dir = %config.pages_dir.display(), "pages directory not found");
        return PageRegistry::new();
    }

    let registry = scan_dir(&config.pages_dir, "", config, batch_mode);
    if registry.is_empty() {
        tracing::warn!(dir = %config.pages_dir.display(), "no pages found");
    } else {
        tracing::info!(count = registry.len(), "pages discovered");
        for (name, page) in &registry {
            tracing::debug!(
                page = %name,
                entry = %page.entry.display(),
                template = %page.template.as_deref().unwrap_or(Path::new("<builtin>")).display(),
                output = %page.output_path,
                "discovered page"
            );
        }
    }
    registry
}

/// Scan one directory level, recursing when nesting is enabled.
///
/// A directory both becomes a page (when the probe matches) and is still
/// traversed for nested pages; nested names extend the parent name with a
/// slash, so they can never collide with it.
fn scan_dir(dir: &Path, base: &str, config: &ScanConfig, batch_mode: bool) -> PageRegistry {
    let mut registry = PageRegistry::new();

    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(error) => {
            tracing::warn!(dir = %dir.display(), %error, "failed to read directory");
            return registry;
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let Some(segment) = path.file_name().and_then(|name| name.to_str()) else {
            continue;
        };

        let name = if base.is_empty() {
            segment.to_owned()
        } else {
            format!("{base}/{segment}")
        };

        if let Some(entry_file) = find_entry_file(&path) {
            match load_page_data(&path) {
                Ok(data) => {
                    let mut page = Page {
                        name: name.clone(),
                        entry: entry_file,
                        template: resolve_template(&path, config),
                        output_path: String::new(),
                        data,
                    };
                    page.output_path = config.layout.resolve(&name, &page, batch_mode);
                    registry.insert(name.clone(), page);
                }
                Err(error) => {
                    tracing::warn!(page = %name, %error, "invalid page metadata, skipping page");
                }
            }
        }

        if config.nested {
            registry.extend(scan_dir(&path, &name, config, batch_mode));
        }
    }

    registry
}

/// Probe a directory for a recognized entry file.
fn find_entry_file(dir: &Path) -> Option<PathBuf> {
    ENTRY_CANDIDATES
        .iter()
        .map(|candidate| dir.join(candidate))
        .find(|path| path.is_file())
}

/// Resolve a page directory's template.
///
/// A local `index.html` beats the globally configured template. When the
/// winner does not exist on disk the page renders with the built-in
/// skeleton instead.
fn resolve_template(page_dir: &Path, config: &ScanConfig) -> Option<PathBuf> {
    let local = page_dir.join(LOCAL_TEMPLATE_FILENAME);
    if local.is_file() {
        return Some(local);
    }
    config.template.is_file().then(|| config.template.clone())
}

/// Load the page's `info.json`, defaulting to an empty object when absent.
///
/// An unreadable or unparsable file is an error; the caller logs it and
/// skips the page.
fn load_page_data(page_dir: &Path) -> Result<Value, std::io::Error> {
    let path = page_dir.join(PAGE_DATA_FILENAME);
    if !path.is_file() {
        return Ok(json!({}));
    }

    let content = std::fs::read_to_string(&path)?;
    serde_json::from_str(&content).map_err(std::io::Error::other)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::TempDir;

    use super::*;

    /// Build a project tree: each (path, contents) lands under the root.
    fn project(files: &[(&str, &str)]) -> TempDir {
        let tmp = TempDir::new().unwrap();
        for (path, contents) in files {
            let full = tmp.path().join(path);
            std::fs::create_dir_all(full.parent().unwrap()).unwrap();
            std::fs::write(full, contents).unwrap();
        }
        tmp
    }

    fn config_for(root: &Path) -> ScanConfig {
        ScanConfig {
            pages_dir: root.join("src/pages"),
            template: root.join("index.html"),
            nested: true,
            layout: OutputLayout::None,
        }
    }

    #[test]
    fn test_missing_pages_dir_yields_empty_registry() {
        let tmp = TempDir::new().unwrap();

        let registry = scan_pages(&config_for(tmp.path()), false);

        assert!(registry.is_empty());
    }

    #[test]
    fn test_one_entry_per_recognized_directory() {
        let tmp = project(&[
            ("src/pages/home/index.js", ""),
            ("src/pages/about/main.js", ""),
            ("src/pages/assets/logo.svg", ""),
        ]);

        let registry = scan_pages(&config_for(tmp.path()), false);

        assert_eq!(
            registry.keys().collect::<Vec<_>>(),
            vec!["about", "home"],
            "directories without an entry file produce no page"
        );
        assert_eq!(registry["home"].output_path, "home.html");
    }

    #[test]
    fn test_entry_candidates_probed_in_order() {
        let tmp = project(&[
            ("src/pages/home/app.js", ""),
            ("src/pages/home/index.js", ""),
        ]);

        let registry = scan_pages(&config_for(tmp.path()), false);

        assert!(registry["home"].entry.ends_with("index.js"));
    }

    #[test]
    fn test_nested_names_are_slash_joined() {
        let tmp = project(&[
            ("src/pages/admin/index.js", ""),
            ("src/pages/admin/users/index.js", ""),
            ("src/pages/admin/users/roles/main.js", ""),
        ]);

        let registry = scan_pages(&config_for(tmp.path()), false);

        assert_eq!(
            registry.keys().collect::<Vec<_>>(),
            vec!["admin", "admin/users", "admin/users/roles"]
        );
    }

    #[test]
    fn test_container_without_entry_still_recursed() {
        let tmp = project(&[("src/pages/admin/users/index.js", "")]);

        let registry = scan_pages(&config_for(tmp.path()), false);

        assert_eq!(registry.keys().collect::<Vec<_>>(), vec!["admin/users"]);
    }

    #[test]
    fn test_nesting_disabled_stops_at_first_level() {
        let tmp = project(&[
            ("src/pages/admin/index.js", ""),
            ("src/pages/admin/users/index.js", ""),
        ]);
        let config = ScanConfig {
            nested: false,
            ..config_for(tmp.path())
        };

        let registry = scan_pages(&config, false);

        assert_eq!(registry.keys().collect::<Vec<_>>(), vec!["admin"]);
    }

    #[test]
    fn test_local_template_beats_global() {
        let tmp = project(&[
            ("index.html", "<global/>"),
            ("src/pages/home/index.js", ""),
            ("src/pages/home/index.html", "<local/>"),
            ("src/pages/about/index.js", ""),
        ]);

        let registry = scan_pages(&config_for(tmp.path()), false);

        assert_eq!(
            registry["home"].template.as_deref(),
            Some(tmp.path().join("src/pages/home/index.html").as_path())
        );
        assert_eq!(
            registry["about"].template.as_deref(),
            Some(tmp.path().join("index.html").as_path())
        );
    }

    #[test]
    fn test_no_existing_template_resolves_to_none() {
        let tmp = project(&[("src/pages/home/index.js", "")]);

        let registry = scan_pages(&config_for(tmp.path()), false);

        assert_eq!(registry["home"].template, None);
    }

    #[test]
    fn test_page_data_loaded_from_info_json() {
        let tmp = project(&[
            ("src/pages/home/index.js", ""),
            ("src/pages/home/info.json", r#"{"title": "Home", "order": 1}"#),
        ]);

        let registry = scan_pages(&config_for(tmp.path()), false);

        assert_eq!(registry["home"].data, json!({"title": "Home", "order": 1}));
    }

    #[test]
    fn test_missing_info_json_defaults_to_empty_object() {
        let tmp = project(&[("src/pages/home/index.js", "")]);

        let registry = scan_pages(&config_for(tmp.path()), false);

        assert_eq!(registry["home"].data, json!({}));
    }

    #[test]
    fn test_invalid_info_json_skips_page_but_not_siblings_or_children() {
        let tmp = project(&[
            ("src/pages/broken/index.js", ""),
            ("src/pages/broken/info.json", "{not json"),
            ("src/pages/broken/child/index.js", ""),
            ("src/pages/ok/index.js", ""),
        ]);

        let registry = scan_pages(&config_for(tmp.path()), false);

        assert_eq!(registry.keys().collect::<Vec<_>>(), vec!["broken/child", "ok"]);
    }

    #[test]
    fn test_batch_mode_applies_layout_at_discovery() {
        let tmp = project(&[("src/pages/admin/users/index.js", "")]);
        let config = ScanConfig {
            layout: OutputLayout::Pattern("{dir}/{basename}-view".to_owned()),
            ..config_for(tmp.path())
        };

        let batch = scan_pages(&config, true);
        let dev = scan_pages(&config, false);

        assert_eq!(batch["admin/users"].output_path, "admin/users-view.html");
        assert_eq!(dev["admin/users"].output_path, "admin/users.html");
    }
}
