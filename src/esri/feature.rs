use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::esri::{de, EsriGeometry};

/// Attribute values of one feature, in the order the service returned them.
pub type Attributes = IndexMap<String, Value>;

/// One feature of a query response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EsriFeature {
    #[serde(default)]
    pub geometry: Option<EsriGeometry>,
    #[serde(default, deserialize_with = "de::null_default")]
    pub attributes: Attributes,
}

impl EsriFeature {
    pub fn new(geometry: Option<EsriGeometry>, attributes: Attributes) -> Self {
        Self {
            geometry,
            attributes,
        }
    }
}

/// The body of a `/query` response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResponse {
    pub features: Vec<EsriFeature>,
    #[serde(default)]
    pub geometry_type: Option<String>,
    /// Set by the server when the result was truncated at its record limit.
    #[serde(default)]
    pub exceeded_transfer_limit: bool,
}
