use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ArcGisError, Result};
use crate::esri::de;

/// Fail with [`ArcGisError::Service`] if `document` carries a top-level `error` object.
///
/// This must run before any other field of the document is inspected. Only the error's
/// `message` is read; `code` and `details` vary in shape between servers.
pub fn check_service_error(document: &Value, context: &str) -> Result<()> {
    let Some(error) = document.get("error").filter(|error| !error.is_null()) else {
        return Ok(());
    };
    let message = error
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or("Unknown error");
    Err(ArcGisError::Service {
        context: context.to_string(),
        message: message.to_string(),
    })
}

/// Metadata of a Feature/Map/Image Service, or of a single layer when the URL addresses one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDocument {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub service_type: Option<String>,
    #[serde(default)]
    pub geometry_type: Option<String>,
    #[serde(default)]
    pub layers: Option<Vec<ServiceLayer>>,
}

/// An entry of a service's `layers` array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceLayer {
    #[serde(default, deserialize_with = "de::id")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub layer_type: Option<String>,
    #[serde(default)]
    pub geometry_type: Option<String>,
}

/// Metadata of one queryable layer (`.../FeatureServer/{id}?f=json`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerInfo {
    #[serde(default, deserialize_with = "de::id")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub layer_type: Option<String>,
    #[serde(default)]
    pub geometry_type: Option<String>,
    /// Renderer and labeling rules. Kept for display collaborators, never interpreted here.
    #[serde(default)]
    pub drawing_info: Option<Value>,
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

/// Metadata of an ArcGIS Online / Portal item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDocument {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub item_type: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}
