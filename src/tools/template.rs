//! `${key}` string templates
//!
//! Header text, header conditions and output filenames are small templates filled in from
//! a flat context of JSON primitives. Unknown keys are left in place untouched.

use regex::{Captures, Regex};
use serde_json::{Map, Value};
use std::sync::LazyLock;

/// Flat key/value context used to fill in templates.
pub type TemplateContext = Map<String, Value>;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{\s*([^{}\s]+)\s*\}").expect("valid placeholder regex"));

/// Whether `text` contains at least one `${key}` placeholder.
#[must_use]
pub fn is_template(text: &str) -> bool {
    PLACEHOLDER.is_match(text)
}

/// Replace every `${key}` in `template` with the matching value from `context`.
#[must_use]
pub fn interpolate(template: &str, context: &TemplateContext) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| {
            context
                .get(&caps[1])
                .map_or_else(|| caps[0].to_string(), render_value)
        })
        .into_owned()
}

/// Text form of a context value. Strings are inserted without quotes.
#[must_use]
pub fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// JavaScript-style truthiness, used wherever an option or context value is checked
/// for presence.
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
