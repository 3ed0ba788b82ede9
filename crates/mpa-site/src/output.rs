//! Output-path resolution policy.

use crate::page::Page;

/// Callback form of the output-path policy.
pub type OutputPathFn = Box<dyn Fn(&str, &Page) -> String + Send + Sync>;

/// Where a page's rendered output lands, relative to the output root.
///
/// Only these three shapes exist; the configuration layer can express
/// [`Pattern`](Self::Pattern), while [`Custom`](Self::Custom) is a
/// programmatic option. The layout applies to materialized build artifacts
/// only; the dev router always serves pages at their natural discovered
/// path.
pub enum OutputLayout {
    /// Identity mapping: `{name}.html`.
    None,
    /// String template with `{name}`, `{dir}` and `{basename}` placeholders,
    /// substituted by plain textual replacement.
    Pattern(String),
    /// Arbitrary callback over the page name and page record.
    Custom(OutputPathFn),
}

impl std::fmt::Debug for OutputLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => f.write_str("OutputLayout::None"),
            Self::Pattern(pattern) => write!(f, "OutputLayout::Pattern({pattern:?})"),
            Self::Custom(_) => f.write_str("OutputLayout::Custom(..)"),
        }
    }
}

impl OutputLayout {
    /// Build a layout from an optional configured pattern.
    #[must_use]
    pub fn from_pattern(pattern: Option<String>) -> Self {
        match pattern {
            Some(pattern) => Self::Pattern(pattern),
            None => Self::None,
        }
    }

    /// Resolve a page's output path.
    ///
    /// Outside batch mode the layout is ignored and the identity mapping
    /// applies. The result always carries a `.html` suffix; re-applying the
    /// suffix rule to an already-suffixed result is a no-op.
    #[must_use]
    pub fn resolve(&self, name: &str, page: &Page, batch_mode: bool) -> String {
        if !batch_mode {
            return ensure_html_suffix(name.to_owned());
        }

        match self {
            Self::None => ensure_html_suffix(name.to_owned()),
            Self::Pattern(pattern) => {
                let path = pattern
                    .replace("{name}", name)
                    .replace("{dir}", dir_of(name))
                    .replace("{basename}", basename_of(name));
                ensure_html_suffix(path)
            }
            Self::Custom(callback) => ensure_html_suffix(callback(name, page)),
        }
    }
}

/// Append `.html` when absent.
fn ensure_html_suffix(path: String) -> String {
    if path.ends_with(".html") {
        path
    } else {
        format!("{path}.html")
    }
}

/// Everything before the last slash; empty when the name has no separator.
fn dir_of(name: &str) -> &str {
    name.rsplit_once('/').map_or("", |(dir, _)| dir)
}

/// The last slash-separated segment.
fn basename_of(name: &str) -> &str {
    name.rsplit_once('/').map_or(name, |(_, base)| base)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use serde_json::json;

    use super::*;

    fn make_page(name: &str) -> Page {
        Page {
            name: name.to_owned(),
            entry: PathBuf::from("/proj/src/pages").join(name).join("index.js"),
            template: None,
            output_path: String::new(),
            data: json!({}),
        }
    }

    #[test]
    fn test_identity_outside_batch_mode() {
        let layout = OutputLayout::Pattern("nested/{name}".to_owned());
        let page = make_page("admin/users");

        // Dev mode ignores the configured layout entirely
        assert_eq!(layout.resolve("admin/users", &page, false), "admin/users.html");
    }

    #[test]
    fn test_identity_with_no_layout() {
        let page = make_page("home");

        assert_eq!(OutputLayout::None.resolve("home", &page, true), "home.html");
    }

    #[test]
    fn test_pattern_substitution() {
        let layout = OutputLayout::Pattern("{dir}/{basename}-view".to_owned());
        let page = make_page("admin/users");

        assert_eq!(layout.resolve("admin/users", &page, true), "admin/users-view.html");
    }

    #[test]
    fn test_pattern_dir_empty_for_top_level_name() {
        let layout = OutputLayout::Pattern("{dir}/{basename}".to_owned());
        let page = make_page("home");

        assert_eq!(layout.resolve("home", &page, true), "/home.html");
    }

    #[test]
    fn test_pattern_name_placeholder() {
        let layout = OutputLayout::Pattern("pages/{name}".to_owned());
        let page = make_page("admin/users");

        assert_eq!(layout.resolve("admin/users", &page, true), "pages/admin/users.html");
    }

    #[test]
    fn test_pattern_replaces_all_occurrences() {
        let layout = OutputLayout::Pattern("{basename}/{basename}".to_owned());
        let page = make_page("home");

        assert_eq!(layout.resolve("home", &page, true), "home/home.html");
    }

    #[test]
    fn test_custom_appends_suffix_when_missing() {
        let layout = OutputLayout::Custom(Box::new(|name, _| format!("v2/{name}")));
        let page = make_page("home");

        assert_eq!(layout.resolve("home", &page, true), "v2/home.html");
    }

    #[test]
    fn test_custom_suffixed_result_unchanged() {
        let layout = OutputLayout::Custom(Box::new(|_, _| "exact/path.html".to_owned()));
        let page = make_page("home");

        assert_eq!(layout.resolve("home", &page, true), "exact/path.html");
    }

    #[test]
    fn test_suffix_rule_idempotent() {
        let once = ensure_html_suffix("admin/users".to_owned());
        let twice = ensure_html_suffix(once.clone());

        assert_eq!(once, twice);
    }
}
