//! HTML post-processing boundary.
//!
//! Transforms run over rendered HTML after compilation. The dev router
//! applies the chain per request; the build pipeline reserves the same seam
//! for build-time rewrites. A failing transform is logged and skipped; the
//! chain never fails a render.

use crate::page::Page;

/// Context handed to each transform invocation.
#[derive(Clone, Copy, Debug)]
pub struct TransformContext<'a> {
    /// The page whose HTML is being transformed.
    pub page: &'a Page,
    /// True during a batch build, false in the dev server.
    pub build_mode: bool,
}

/// A post-render HTML transform.
pub trait HtmlTransform: Send + Sync {
    /// Transform name used in diagnostics.
    fn name(&self) -> &str {
        "unnamed"
    }

    /// Transform the rendered HTML.
    ///
    /// # Errors
    ///
    /// Returns an error to skip this transform; the input HTML is kept and
    /// the rest of the chain still runs.
    fn transform(
        &self,
        html: String,
        context: &TransformContext<'_>,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>>;
}

/// Apply every transform in order.
///
/// Each transform receives the previous transform's output. Failures are
/// logged and leave the HTML unchanged for the next transform.
#[must_use]
pub fn apply_transforms(
    transforms: &[Box<dyn HtmlTransform>],
    mut html: String,
    context: &TransformContext<'_>,
) -> String {
    for transform in transforms {
        match transform.transform(html.clone(), context) {
            Ok(output) => html = output,
            Err(error) => {
                tracing::warn!(
                    transform = transform.name(),
                    page = %context.page.name,
                    %error,
                    "HTML transform failed, skipping"
                );
            }
        }
    }
    html
}
