use serde::{Deserialize, Serialize};

use crate::esri::de;

/// The data document of a `Web Map` item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebMap {
    #[serde(default, deserialize_with = "de::null_default")]
    pub operational_layers: Vec<RawLayerNode>,
}

/// One entry of a web map's operational-layer tree, as written by ArcGIS.
///
/// The entry's role is implied by which fields are present; [`RawLayerNode::kind`] turns that
/// into a closed [`LayerNode`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLayerNode {
    #[serde(default, deserialize_with = "de::id")]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub item_id: Option<String>,
    #[serde(default)]
    pub layer_type: Option<String>,
    #[serde(default)]
    pub geometry_type: Option<String>,
    #[serde(default)]
    pub layers: Option<Vec<RawLayerNode>>,
    #[serde(default)]
    pub feature_collection: Option<RawFeatureCollection>,
    #[serde(default)]
    pub layer_definition: Option<LayerDefinition>,
}

/// A feature collection stored inline in a web map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFeatureCollection {
    #[serde(default)]
    pub layers: Option<Vec<EmbeddedLayer>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddedLayer {
    #[serde(default)]
    pub layer_definition: Option<LayerDefinition>,
    #[serde(default)]
    pub feature_set: Option<FeatureSet>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerDefinition {
    #[serde(default, deserialize_with = "de::id")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub geometry_type: Option<String>,
}

/// Header of the features stored inline in a web map. The features themselves are not read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureSet {
    #[serde(default)]
    pub geometry_type: Option<String>,
}

/// The resolvable role of a [`RawLayerNode`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LayerNode<'a> {
    /// Container of child nodes.
    Group(&'a [RawLayerNode]),
    /// Reference to a service or layer endpoint.
    Service(&'a str),
    /// Reference to a portal item that points at a service.
    Item(&'a str),
    /// Features stored inline in the web map.
    FeatureCollection(&'a RawFeatureCollection),
    /// A feature layer described only by the node itself.
    FeatureLayer,
    /// Nothing this converter can query.
    Unresolvable,
}

impl RawLayerNode {
    /// Classify the node. When several fields are present the first matching role wins, in
    /// the order group, service, item, feature collection, feature layer.
    pub fn kind(&self) -> LayerNode<'_> {
        if let Some(children) = &self.layers {
            LayerNode::Group(children)
        } else if let Some(url) = &self.url {
            LayerNode::Service(url)
        } else if let Some(item_id) = &self.item_id {
            LayerNode::Item(item_id)
        } else if let Some(collection) = &self.feature_collection {
            LayerNode::FeatureCollection(collection)
        } else if self.layer_type.as_deref() == Some("ArcGISFeatureLayer") {
            LayerNode::FeatureLayer
        } else {
            LayerNode::Unresolvable
        }
    }

    /// Geometry type declared on the node or its layer definition.
    pub fn declared_geometry_type(&self) -> Option<&str> {
        self.geometry_type.as_deref().or_else(|| {
            self.layer_definition
                .as_ref()
                .and_then(|definition| definition.geometry_type.as_deref())
        })
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;

    fn node(value: serde_json::Value) -> RawLayerNode {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn classify_nodes() {
        let group = node(json!({"id": "g", "title": "G", "layers": [], "url": "https://x"}));
        assert!(matches!(group.kind(), LayerNode::Group(children) if children.is_empty()));

        let service = node(json!({"url": "https://x/FeatureServer/0", "itemId": "abc"}));
        assert_eq!(service.kind(), LayerNode::Service("https://x/FeatureServer/0"));

        let item = node(json!({"itemId": "abc", "layerType": "ArcGISFeatureLayer"}));
        assert_eq!(item.kind(), LayerNode::Item("abc"));

        let collection = node(json!({"featureCollection": {"layers": []}}));
        assert!(matches!(collection.kind(), LayerNode::FeatureCollection(_)));

        let bare = node(json!({"id": 7, "layerType": "ArcGISFeatureLayer"}));
        assert_eq!(bare.kind(), LayerNode::FeatureLayer);
        assert_eq!(bare.id.as_deref(), Some("7"));

        let other = node(json!({"layerType": "VectorTileLayer", "styleUrl": "https://x"}));
        assert_eq!(other.kind(), LayerNode::Unresolvable);
    }

    #[test]
    fn decode_web_map() {
        let web_map: WebMap = serde_json::from_value(json!({
            "operationalLayers": [
                {"id": "a", "title": "A", "layers": [{"id": "b", "title": "B", "url": "https://x"}]}
            ],
            "baseMap": {"baseMapLayers": []}
        }))
        .unwrap();
        assert_eq!(web_map.operational_layers.len(), 1);
        assert_eq!(
            web_map.operational_layers[0].layers.as_ref().unwrap()[0].url.as_deref(),
            Some("https://x")
        );
    }

    #[test]
    fn inline_features_do_not_block_decoding() {
        let web_map: WebMap = serde_json::from_value(json!({
            "operationalLayers": [{
                "id": "notes",
                "featureCollection": {"layers": [{
                    "layerDefinition": {"name": "Notes"},
                    "featureSet": {
                        "geometryType": "esriGeometryPolyline",
                        "features": [{"geometry": {"paths": [[[1, 2, null]]]}, "attributes": null}]
                    }
                }]}
            }]
        }))
        .unwrap();
        let LayerNode::FeatureCollection(collection) = web_map.operational_layers[0].kind() else {
            panic!("expected a feature collection");
        };
        let layer = &collection.layers.as_ref().unwrap()[0];
        assert_eq!(
            layer.feature_set.as_ref().unwrap().geometry_type.as_deref(),
            Some("esriGeometryPolyline")
        );

        let web_map: WebMap = serde_json::from_value(json!({"operationalLayers": null})).unwrap();
        assert!(web_map.operational_layers.is_empty());
    }
}
