use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Reads a JSON number, treating any other value (`null`, `"NaN"`, ...) as absent.
pub(crate) fn number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(Value::as_f64))
}

/// Reads an identifier that ArcGIS serializes as either a number or a string.
pub(crate) fn id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Reads a value whose `null` means the same as an absent field.
pub(crate) fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Reads `paths` or `rings`. Each position keeps only its leading numeric ordinates, so
/// `[x, y, null]` from an M-aware layer reads as `[x, y]` and `[null, y]` reads as `[]`.
pub(crate) fn paths<'de, D>(deserializer: D) -> Result<Option<Vec<Vec<Vec<f64>>>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Vec<Vec<Value>>>::deserialize(deserializer)?;
    Ok(value.map(|paths| {
        paths
            .into_iter()
            .map(|path| path.iter().map(ordinates).collect())
            .collect()
    }))
}

fn ordinates(position: &Value) -> Vec<f64> {
    position
        .as_array()
        .map(|values| values.iter().map_while(Value::as_f64).collect())
        .unwrap_or_default()
}
