use serde::{Deserialize, Serialize};

use crate::client::ResourceUrl;

/// Display name for layers that have none.
pub const UNNAMED_LAYER: &str = "Unnamed Layer";

/// A queryable layer found while resolving a service or web map.
///
/// Descriptors are created by [`LayerResolver`](super::LayerResolver) and never modified
/// afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerDescriptor {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub layer_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_layer_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_layer_name: Option<String>,
    /// Titles of the ancestors of the node this descriptor came from, root first.
    #[serde(default)]
    pub parent_path: Vec<String>,
}

impl LayerDescriptor {
    /// The URL the layer's features are queried from.
    ///
    /// This is the service URL itself when it already addresses a layer, or the service URL plus
    /// the layer id. Descriptors without a service URL (inline feature collections, bare feature
    /// layers) and descriptors whose id is not a layer index have none.
    pub fn layer_url(&self) -> Option<String> {
        let service_url = self.service_url.as_deref()?;
        match ResourceUrl::parse(service_url).ok()? {
            ResourceUrl::Layer { .. } => Some(service_url.trim_end_matches('/').to_string()),
            ResourceUrl::Service { url }
                if !self.id.is_empty() && self.id.chars().all(|c| c.is_ascii_digit()) =>
            {
                Some(format!("{url}/{}", self.id))
            }
            _ => None,
        }
    }

    /// `"A > B > name"`, for listings.
    pub fn display_path(&self) -> String {
        self.parent_path
            .iter()
            .map(String::as_str)
            .chain([self.name.as_str()])
            .collect::<Vec<_>>()
            .join(" > ")
    }
}
