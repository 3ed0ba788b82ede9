//! The page data model.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde_json::Value;

/// The complete mapping of page name to [`Page`] for one discovery pass.
///
/// Built fresh on every pass and replaced wholesale; never mutated
/// incrementally.
pub type PageRegistry = BTreeMap<String, Page>;

/// A directory-derived page.
///
/// A directory under the pages root becomes a page iff it contains a
/// recognized entry file. The name is the directory's slash-joined path
/// relative to the pages root and is the unique registry key.
#[derive(Clone, Debug)]
pub struct Page {
    /// Slash-separated logical path, e.g. `admin/users`.
    pub name: String,
    /// Absolute path to the page's script entry point.
    pub entry: PathBuf,
    /// Absolute path to the page's HTML template, or `None` to render with
    /// the built-in skeleton.
    pub template: Option<PathBuf>,
    /// Relative output file path, always ending in `.html`.
    pub output_path: String,
    /// Metadata loaded from the page's `info.json`, or an empty object.
    pub data: Value,
}

impl Page {
    /// The page's display title from its metadata, if any.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.data.get("title").and_then(Value::as_str)
    }
}
