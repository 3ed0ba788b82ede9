//! Page rendering pipeline.
//!
//! [`PageRenderer`] handles template resolution, cached compilation and
//! entry-script injection. It operates on individual [`Page`]s without
//! knowledge of registry construction or delivery mode; the dev router and
//! the build stager share it so the two execution modes cannot drift.

use std::path::Path;
use std::sync::Arc;

use mpa_cache::{TemplateCache, TemplateError};
use mpa_render::{EngineOptions, Interpolator, RenderError, TemplateEngine, build_context};
use serde_json::{Map, Value};

use crate::page::Page;

/// Built-in skeleton used when a page has no template file.
pub const DEFAULT_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>{{ title }}</title>
</head>
<body>
  <div id="app"></div>
</body>
</html>
"#;

/// Page rendering error.
#[derive(Debug, thiserror::Error)]
pub enum PageRenderError {
    /// The page's template file could not be read.
    #[error(transparent)]
    Template(#[from] TemplateError),
    /// The template failed to compile.
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Renders pages to HTML through the two-layer template cache.
///
/// Holds the process-wide default data and the engine options; both are
/// merged into every render context, with the page's own metadata nested
/// under a fixed key so page data never shadows default keys.
pub struct PageRenderer {
    cache: Arc<TemplateCache>,
    engine: Box<dyn TemplateEngine>,
    options: EngineOptions,
    default_data: Map<String, Value>,
}

impl PageRenderer {
    /// Create a renderer with the built-in engine and empty default data.
    #[must_use]
    pub fn new(cache: Arc<TemplateCache>) -> Self {
        Self {
            cache,
            engine: Box::new(Interpolator),
            options: EngineOptions::default(),
            default_data: Map::new(),
        }
    }

    /// Set the default-data record merged into every render context.
    #[must_use]
    pub fn with_default_data(mut self, default_data: Map<String, Value>) -> Self {
        self.default_data = default_data;
        self
    }

    /// Set the engine options passed through to every render call.
    #[must_use]
    pub fn with_options(mut self, options: EngineOptions) -> Self {
        self.options = options;
        self
    }

    /// Replace the template engine backend.
    #[must_use]
    pub fn with_engine(mut self, engine: Box<dyn TemplateEngine>) -> Self {
        self.engine = engine;
        self
    }

    /// Render a page to HTML.
    ///
    /// Template content comes from the raw cache (read once per path);
    /// compiled output comes from the rendered cache, keyed by the exact
    /// (template text, serialized page data) pair. Entry-script injection is
    /// the caller's concern, since delivery modes inject differently.
    ///
    /// # Errors
    ///
    /// Returns [`PageRenderError::Template`] if the template file cannot be
    /// read, [`PageRenderError::Render`] if it fails to compile.
    pub fn render_page(&self, page: &Page) -> Result<String, PageRenderError> {
        let template = match &page.template {
            Some(path) => self.cache.template_content(path)?,
            None => DEFAULT_TEMPLATE.to_owned(),
        };

        let data_key = page.data.to_string();
        if let Some(html) = self.cache.rendered(&template, &data_key) {
            return Ok(html);
        }

        let context = build_context(&self.default_data, page.data.clone());
        let html = self.engine.render(&template, &context, &self.options)?;
        self.cache.store_rendered(&template, &data_key, &html);
        Ok(html)
    }
}

/// Append an entry-script tag to rendered HTML.
///
/// The tag lands immediately before the closing body tag, or at the end of
/// the document when no closing body tag exists.
#[must_use]
pub fn inject_entry_script(html: &str, src: &str) -> String {
    let tag = format!("<script type=\"module\" src=\"{src}\"></script>");
    match html.find("</body>") {
        Some(index) => {
            let mut output = String::with_capacity(html.len() + tag.len() + 1);
            output.push_str(&html[..index]);
            output.push_str(&tag);
            output.push('\n');
            output.push_str(&html[index..]);
            output
        }
        None => format!("{html}\n{tag}"),
    }
}

/// URL for a page's entry script.
///
/// The entry path is made relative to the project root and prefixed with
/// `base` (the dev server's public base path, or `/` for build staging).
#[must_use]
pub fn entry_url(root: &Path, entry: &Path, base: &str) -> String {
    let relative = entry.strip_prefix(root).unwrap_or(entry);
    let normalized = relative
        .components()
        .filter_map(|component| match component {
            std::path::Component::Normal(segment) => Some(segment.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/");

    if base.ends_with('/') {
        format!("{base}{normalized}")
    } else {
        format!("{base}/{normalized}")
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::TempDir;

    use super::*;

    fn make_page(template: Option<PathBuf>, data: Value) -> Page {
        Page {
            name: "home".to_owned(),
            entry: PathBuf::from("/proj/src/pages/home/index.js"),
            template,
            output_path: "home.html".to_owned(),
            data,
        }
    }

    #[test]
    fn test_render_with_template_file() {
        let tmp = TempDir::new().unwrap();
        let template = tmp.path().join("index.html");
        std::fs::write(&template, "<h1>{{ info.title }}</h1>").unwrap();

        let renderer = PageRenderer::new(Arc::new(TemplateCache::new()));
        let page = make_page(Some(template), json!({"title": "Home"}));

        assert_eq!(renderer.render_page(&page).unwrap(), "<h1>Home</h1>");
    }

    #[test]
    fn test_render_without_template_uses_skeleton() {
        let renderer = PageRenderer::new(Arc::new(TemplateCache::new()))
            .with_default_data(json!({"title": "Fallback"}).as_object().unwrap().clone());
        let page = make_page(None, json!({}));

        let html = renderer.render_page(&page).unwrap();

        assert!(html.contains("<title>Fallback</title>"));
        assert!(html.contains("<div id=\"app\"></div>"));
    }

    #[test]
    fn test_render_twice_is_byte_identical_without_rereading() {
        let tmp = TempDir::new().unwrap();
        let template = tmp.path().join("index.html");
        std::fs::write(&template, "<p>{{ info.n }}</p>").unwrap();

        let renderer = PageRenderer::new(Arc::new(TemplateCache::new()));
        let page = make_page(Some(template.clone()), json!({"n": 1}));

        let first = renderer.render_page(&page).unwrap();

        // Rewrite the file; the raw cache must shield the second render
        std::fs::write(&template, "<p>changed</p>").unwrap();
        let second = renderer.render_page(&page).unwrap();

        assert_eq!(first, second);
        assert_eq!(first, "<p>1</p>");
    }

    #[test]
    fn test_render_distinct_data_not_shared() {
        let tmp = TempDir::new().unwrap();
        let template = tmp.path().join("index.html");
        std::fs::write(&template, "<p>{{ info.n }}</p>").unwrap();

        let renderer = PageRenderer::new(Arc::new(TemplateCache::new()));
        let one = make_page(Some(template.clone()), json!({"n": 1}));
        let two = make_page(Some(template), json!({"n": 2}));

        assert_eq!(renderer.render_page(&one).unwrap(), "<p>1</p>");
        assert_eq!(renderer.render_page(&two).unwrap(), "<p>2</p>");
    }

    #[test]
    fn test_render_missing_template_file_is_read_error() {
        let renderer = PageRenderer::new(Arc::new(TemplateCache::new()));
        let page = make_page(Some(PathBuf::from("/nonexistent/tpl.html")), json!({}));

        let result = renderer.render_page(&page);

        assert!(matches!(result, Err(PageRenderError::Template(_))));
    }

    #[test]
    fn test_render_invalid_template_is_render_error() {
        let tmp = TempDir::new().unwrap();
        let template = tmp.path().join("index.html");
        std::fs::write(&template, "<p>{{ broken").unwrap();

        let renderer = PageRenderer::new(Arc::new(TemplateCache::new()));
        let page = make_page(Some(template), json!({}));

        let result = renderer.render_page(&page);

        assert!(matches!(result, Err(PageRenderError::Render(_))));
    }

    #[test]
    fn test_default_data_merged_under_root() {
        let tmp = TempDir::new().unwrap();
        let template = tmp.path().join("index.html");
        std::fs::write(&template, "{{ site }}: {{ info.title }}").unwrap();

        let renderer = PageRenderer::new(Arc::new(TemplateCache::new()))
            .with_default_data(json!({"site": "MPA"}).as_object().unwrap().clone());
        let page = make_page(Some(template), json!({"title": "Home"}));

        assert_eq!(renderer.render_page(&page).unwrap(), "MPA: Home");
    }

    #[test]
    fn test_inject_before_closing_body() {
        let html = "<html><body><div></div></body></html>";

        let result = inject_entry_script(html, "/src/main.js");

        assert_eq!(
            result,
            "<html><body><div></div><script type=\"module\" src=\"/src/main.js\"></script>\n</body></html>"
        );
    }

    #[test]
    fn test_inject_appends_without_closing_body() {
        let result = inject_entry_script("<h1>bare</h1>", "/src/main.js");

        assert_eq!(
            result,
            "<h1>bare</h1>\n<script type=\"module\" src=\"/src/main.js\"></script>"
        );
    }

    #[test]
    fn test_entry_url_relative_to_root() {
        let url = entry_url(
            Path::new("/proj"),
            Path::new("/proj/src/pages/home/index.js"),
            "/",
        );

        assert_eq!(url, "/src/pages/home/index.js");
    }

    #[test]
    fn test_entry_url_with_base_prefix() {
        let url = entry_url(
            Path::new("/proj"),
            Path::new("/proj/src/pages/home/index.js"),
            "/app",
        );

        assert_eq!(url, "/app/src/pages/home/index.js");
    }

    #[test]
    fn test_entry_url_outside_root_kept_verbatim() {
        let url = entry_url(Path::new("/proj"), Path::new("/elsewhere/main.js"), "/");

        assert_eq!(url, "/elsewhere/main.js");
    }
}
