//! Built-in interpolating backend.

use serde_json::Value;

use crate::engine::{EngineOptions, RenderError, TemplateEngine};

/// The built-in template backend.
///
/// Substitutes `{{ dotted.path }}` placeholders with values looked up in the
/// JSON context. Scalars render as their natural text form, `null` and
/// missing keys render as the empty string (unless strict mode is on), and
/// composite values render as compact JSON.
pub struct Interpolator;

impl TemplateEngine for Interpolator {
    fn render(
        &self,
        template: &str,
        context: &Value,
        options: &EngineOptions,
    ) -> Result<String, RenderError> {
        let mut output = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(start) = rest.find(&options.open) {
            output.push_str(&rest[..start]);
            let after_open = &rest[start + options.open.len()..];

            let Some(end) = after_open.find(&options.close) else {
                return Err(RenderError::Unterminated {
                    line: line_of(template, template.len() - rest.len() + start),
                });
            };

            let key = after_open[..end].trim();
            if key.is_empty() {
                return Err(RenderError::EmptyPlaceholder {
                    line: line_of(template, template.len() - rest.len() + start),
                });
            }

            match lookup(context, key) {
                Some(value) => output.push_str(&value_to_text(value)),
                None if options.strict => {
                    return Err(RenderError::UnknownKey {
                        key: key.to_owned(),
                    });
                }
                None => {}
            }

            rest = &after_open[end + options.close.len()..];
        }

        output.push_str(rest);
        Ok(output)
    }
}

/// Resolve a dotted path against the context.
///
/// Returns `None` for missing keys and for `null` values.
fn lookup<'a>(context: &'a Value, key: &str) -> Option<&'a Value> {
    let mut current = context;
    for segment in key.split('.') {
        current = current.as_object()?.get(segment)?;
    }
    if current.is_null() { None } else { Some(current) }
}

/// Render a JSON value as substitution text.
fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// 1-based line number of a byte offset.
fn line_of(template: &str, offset: usize) -> usize {
    template[..offset].bytes().filter(|&b| b == b'\n').count() + 1
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn render(template: &str, context: &Value) -> Result<String, RenderError> {
        Interpolator.render(template, context, &EngineOptions::default())
    }

    #[test]
    fn test_plain_text_passes_through() {
        let result = render("<p>no placeholders</p>", &json!({})).unwrap();

        assert_eq!(result, "<p>no placeholders</p>");
    }

    #[test]
    fn test_substitutes_string_value() {
        let result = render("<title>{{ title }}</title>", &json!({"title": "Home"})).unwrap();

        assert_eq!(result, "<title>Home</title>");
    }

    #[test]
    fn test_substitutes_dotted_path() {
        let context = json!({"info": {"author": {"name": "ada"}}});
        let result = render("by {{ info.author.name }}", &context).unwrap();

        assert_eq!(result, "by ada");
    }

    #[test]
    fn test_numbers_and_bools_render_naturally() {
        let context = json!({"count": 3, "draft": false});
        let result = render("{{ count }} items, draft={{ draft }}", &context).unwrap();

        assert_eq!(result, "3 items, draft=false");
    }

    #[test]
    fn test_composite_values_render_as_json() {
        let context = json!({"tags": ["a", "b"]});
        let result = render("{{ tags }}", &context).unwrap();

        assert_eq!(result, r#"["a","b"]"#);
    }

    #[test]
    fn test_missing_key_renders_empty() {
        let result = render("<h1>{{ nope }}</h1>", &json!({})).unwrap();

        assert_eq!(result, "<h1></h1>");
    }

    #[test]
    fn test_null_renders_empty() {
        let result = render("[{{ gone }}]", &json!({"gone": null})).unwrap();

        assert_eq!(result, "[]");
    }

    #[test]
    fn test_missing_key_errors_in_strict_mode() {
        let options = EngineOptions {
            strict: true,
            ..EngineOptions::default()
        };
        let result = Interpolator.render("{{ nope }}", &json!({}), &options);

        assert!(matches!(result, Err(RenderError::UnknownKey { key }) if key == "nope"));
    }

    #[test]
    fn test_unterminated_placeholder_is_error() {
        let result = render("line one\n<h1>{{ title </h1>", &json!({}));

        assert!(matches!(result, Err(RenderError::Unterminated { line: 2 })));
    }

    #[test]
    fn test_empty_placeholder_is_error() {
        let result = render("{{  }}", &json!({}));

        assert!(matches!(result, Err(RenderError::EmptyPlaceholder { line: 1 })));
    }

    #[test]
    fn test_custom_delimiters() {
        let options = EngineOptions {
            open: "<%=".to_owned(),
            close: "%>".to_owned(),
            strict: false,
        };
        let result = Interpolator
            .render("<%= title %>", &json!({"title": "Legacy"}), &options)
            .unwrap();

        assert_eq!(result, "Legacy");
    }

    #[test]
    fn test_repeated_placeholders() {
        let context = json!({"x": "v"});
        let result = render("{{ x }}{{ x }}{{ x }}", &context).unwrap();

        assert_eq!(result, "vvv");
    }

    #[test]
    fn test_whitespace_inside_delimiters_is_ignored() {
        let result = render("{{title}} {{  title  }}", &json!({"title": "T"})).unwrap();

        assert_eq!(result, "T T");
    }
}
