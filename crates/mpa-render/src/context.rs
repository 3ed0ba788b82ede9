//! Render-context construction.

use serde_json::{Map, Value};

/// Fixed key under which per-page data is nested in the render context.
///
/// Page metadata never lands at the context root, so a page's `info.json`
/// cannot silently shadow unrelated default-data keys.
pub const PAGE_DATA_KEY: &str = "info";

/// Build the render context for one page.
///
/// The context root is a copy of the process-wide default-data record with
/// the page's own metadata nested under [`PAGE_DATA_KEY`]. Non-object page
/// data is stored as-is under that key.
#[must_use]
pub fn build_context(default_data: &Map<String, Value>, page_data: Value) -> Value {
    let mut root = default_data.clone();
    root.insert(PAGE_DATA_KEY.to_owned(), page_data);
    Value::Object(root)
}
