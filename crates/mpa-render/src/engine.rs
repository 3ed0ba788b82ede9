//! Engine trait and options.

use serde::Deserialize;
use serde_json::Value;

/// Options passed through to the template engine.
///
/// These are opaque to the rest of the system: the configuration layer
/// deserializes them and hands them to every render call unchanged. The
/// built-in [`Interpolator`](crate::Interpolator) honors all three fields;
/// custom engines are free to ignore them.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EngineOptions {
    /// Opening placeholder delimiter.
    pub open: String,
    /// Closing placeholder delimiter.
    pub close: String,
    /// When true, a placeholder that resolves to nothing is a
    /// [`RenderError::UnknownKey`] instead of an empty string.
    pub strict: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            open: "{{".to_owned(),
            close: "}}".to_owned(),
            strict: false,
        }
    }
}

/// Template rendering error.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// A placeholder was opened but never closed.
    #[error("unterminated placeholder starting at line {line}")]
    Unterminated {
        /// 1-based line of the opening delimiter.
        line: usize,
    },
    /// A placeholder contained no key.
    #[error("empty placeholder at line {line}")]
    EmptyPlaceholder {
        /// 1-based line of the placeholder.
        line: usize,
    },
    /// Strict mode only: a key resolved to nothing.
    #[error("unknown key `{key}` in template")]
    UnknownKey {
        /// The dotted path that failed to resolve.
        key: String,
    },
}

/// A template engine renders a template string against a JSON context.
///
/// Implementations must be pure with respect to their inputs: the same
/// (template, context, options) triple must produce the same output, since
/// callers cache rendered results keyed by exactly that pair of template
/// text and serialized context.
pub trait TemplateEngine: Send + Sync {
    /// Render `template` against `context`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] if the template syntax is invalid, or (in
    /// strict mode) if a placeholder cannot be resolved.
    fn render(
        &self,
        template: &str,
        context: &Value,
        options: &EngineOptions,
    ) -> Result<String, RenderError>;
}
