use std::borrow::Cow;

use geojson::JsonObject;
use serde_json::Value;

/// Keys checked, in order, for a human-readable feature name.
const NAME_KEYS: [&str; 3] = ["name", "Name", "NAME"];

/// Whether a property value counts as "set" when picking a display name. Empty strings, zero,
/// `false` and `null` do not.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |n| n != 0.),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Render a property value as plain text: strings verbatim, whole-number floats without a
/// fraction (`12.0` as `12`), everything else as JSON.
pub(crate) fn display_value(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(s) => Cow::Borrowed(s),
        Value::Number(n) if n.is_f64() => match n.as_f64() {
            Some(f) if f.fract() == 0. && f.abs() < 1e15 => Cow::Owned(format!("{:.0}", f + 0.)),
            _ => Cow::Owned(n.to_string()),
        },
        other => Cow::Owned(other.to_string()),
    }
}

/// The first truthy value of `name`, `Name` or `NAME`, else `default`.
pub(crate) fn display_name<'a>(properties: Option<&'a JsonObject>, default: &'a str) -> Cow<'a, str> {
    properties
        .and_then(|properties| {
            NAME_KEYS
                .iter()
                .filter_map(|key| properties.get(*key))
                .find(|value| is_truthy(value))
        })
        .map(display_value)
        .unwrap_or(Cow::Borrowed(default))
}
