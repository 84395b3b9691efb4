//! Flatten service documents and web map operational-layer trees into [`LayerDescriptor`]s.

use futures::future::BoxFuture;
use futures::FutureExt;
use tracing::debug;

use crate::client::{ArcGisClient, JsonFetcher};
use crate::error::{ArcGisError, Result};
use crate::esri::{LayerNode, RawFeatureCollection, RawLayerNode, ServiceDocument};
use crate::layer::descriptor::{LayerDescriptor, UNNAMED_LAYER};

const UNTITLED_GROUP: &str = "Untitled Layer";

/// Where a node sits in the tree: the titles above it and the group that encloses it.
#[derive(Debug, Clone, Default)]
struct Lineage {
    path: Vec<String>,
    parent_id: Option<String>,
    parent_name: Option<String>,
}

impl Lineage {
    fn enter_group(&self, group: &RawLayerNode) -> Self {
        let label = group
            .title
            .clone()
            .or_else(|| group.id.clone())
            .unwrap_or_else(|| UNTITLED_GROUP.to_string());
        let mut path = self.path.clone();
        path.push(label);
        Self {
            path,
            parent_id: group.id.clone(),
            parent_name: group.title.clone(),
        }
    }
}

/// Walks layer hierarchies, fetching service and item documents as it goes.
///
/// Fetches are issued one at a time, in tree order. The first failing fetch aborts the walk.
#[derive(Debug)]
pub struct LayerResolver<'a, F> {
    client: &'a ArcGisClient<F>,
    portal: String,
}

impl<'a, F: JsonFetcher> LayerResolver<'a, F> {
    /// Resolve item references against the client's configured portal.
    pub fn new(client: &'a ArcGisClient<F>) -> Self {
        Self {
            portal: client.config().portal.clone(),
            client,
        }
    }

    /// Resolve item references against `portal` instead.
    pub fn with_portal(self, portal: impl Into<String>) -> Self {
        Self {
            portal: portal.into(),
            ..self
        }
    }

    /// Flatten an operational-layer tree.
    pub async fn resolve(&self, nodes: &[RawLayerNode]) -> Result<Vec<LayerDescriptor>> {
        self.resolve_nodes(nodes, &Lineage::default()).await
    }

    /// The layers of a service given by URL.
    pub async fn resolve_service(&self, url: &str) -> Result<Vec<LayerDescriptor>> {
        self.service_descriptors(url, None, &Lineage::default())
            .await
    }

    /// The layers behind a portal item. Web maps are resolved through their operational layers,
    /// map services through their service document. Other item types are rejected.
    pub async fn resolve_item(&self, item_id: &str) -> Result<Vec<LayerDescriptor>> {
        let item = self.client.item(&self.portal, item_id).await?;
        match item.item_type.as_deref() {
            Some("Web Map") => {
                let web_map = self.client.web_map(&self.portal, item_id).await?;
                self.resolve(&web_map.operational_layers).await
            }
            Some("Map Service") => {
                let url = item.url.ok_or_else(|| missing_item_url(item_id))?;
                self.resolve_service(&url).await
            }
            other => Err(ArcGisError::UnsupportedItemType(
                other.unwrap_or("unknown").to_string(),
            )),
        }
    }

    fn resolve_nodes<'s>(
        &'s self,
        nodes: &'s [RawLayerNode],
        lineage: &'s Lineage,
    ) -> BoxFuture<'s, Result<Vec<LayerDescriptor>>> {
        async move {
            let mut descriptors = Vec::new();
            for node in nodes {
                descriptors.extend(self.resolve_node(node, lineage).await?);
            }
            Ok(descriptors)
        }
        .boxed()
    }

    fn resolve_node<'s>(
        &'s self,
        node: &'s RawLayerNode,
        lineage: &'s Lineage,
    ) -> BoxFuture<'s, Result<Vec<LayerDescriptor>>> {
        async move {
            match node.kind() {
                LayerNode::Group(children) => {
                    let lineage = lineage.enter_group(node);
                    self.resolve_nodes(children, &lineage).await
                }
                LayerNode::Service(url) => self.service_descriptors(url, Some(node), lineage).await,
                LayerNode::Item(item_id) => {
                    let item = self.client.item(&self.portal, item_id).await?;
                    let url = item.url.ok_or_else(|| missing_item_url(item_id))?;
                    self.service_descriptors(&url, Some(node), lineage).await
                }
                LayerNode::FeatureCollection(collection) => {
                    Ok(feature_collection_descriptors(node, collection, lineage))
                }
                LayerNode::FeatureLayer => Ok(vec![feature_layer_descriptor(node, lineage)]),
                LayerNode::Unresolvable => {
                    debug!(
                        id = node.id.as_deref(),
                        title = node.title.as_deref(),
                        layer_type = node.layer_type.as_deref(),
                        "skipping unresolvable layer"
                    );
                    Ok(Vec::new())
                }
            }
        }
        .boxed()
    }

    async fn service_descriptors(
        &self,
        url: &str,
        node: Option<&RawLayerNode>,
        lineage: &Lineage,
    ) -> Result<Vec<LayerDescriptor>> {
        let document = self.client.service(url).await?;
        let service_url = url.trim_end_matches('/').to_string();
        debug!(%service_url, "resolved service document");

        if let Some(layers) = &document.layers {
            let parent_layer_name = node
                .and_then(|node| node.title.clone())
                .or_else(|| document.name.clone());
            let mut path = lineage.path.clone();
            if node.is_none() {
                path.extend(document.name.clone());
            }

            return Ok(layers
                .iter()
                .enumerate()
                .map(|(index, layer)| LayerDescriptor {
                    id: layer.id.clone().unwrap_or_else(|| index.to_string()),
                    name: layer.name.clone().unwrap_or_else(|| UNNAMED_LAYER.to_string()),
                    layer_type: layer
                        .layer_type
                        .clone()
                        .unwrap_or_else(|| "Feature Layer".to_string()),
                    geometry_type: layer.geometry_type.clone(),
                    service_url: Some(service_url.clone()),
                    parent_layer_id: node.and_then(|node| node.id.clone()),
                    parent_layer_name: parent_layer_name.clone(),
                    parent_path: path.clone(),
                })
                .collect());
        }

        let descriptor = if is_image_service(&document, &service_url) {
            LayerDescriptor {
                layer_type: "Imagery Layer".to_string(),
                ..self_descriptor(&document, &service_url, node, lineage)
            }
        } else {
            self_descriptor(&document, &service_url, node, lineage)
        };
        Ok(vec![descriptor])
    }
}

fn missing_item_url(item_id: &str) -> ArcGisError {
    ArcGisError::Format(format!("Item {item_id} has no service URL"))
}

fn is_image_service(document: &ServiceDocument, service_url: &str) -> bool {
    document.service_type.as_deref() == Some("ImageServer") || service_url.ends_with("/ImageServer")
}

/// A descriptor for a service or layer document that has no `layers` of its own.
fn self_descriptor(
    document: &ServiceDocument,
    service_url: &str,
    node: Option<&RawLayerNode>,
    lineage: &Lineage,
) -> LayerDescriptor {
    let id = node
        .and_then(|node| node.id.clone())
        .or_else(|| layer_index(service_url))
        .unwrap_or_default();
    let name = node
        .and_then(|node| node.title.clone())
        .or_else(|| document.name.clone())
        .unwrap_or_else(|| UNNAMED_LAYER.to_string());
    let layer_type = document
        .service_type
        .clone()
        .or_else(|| node.and_then(|node| node.layer_type.clone()))
        .unwrap_or_else(|| "Feature Layer".to_string());

    LayerDescriptor {
        id,
        name,
        layer_type,
        geometry_type: document
            .geometry_type
            .clone()
            .or_else(|| node.and_then(|node| node.declared_geometry_type().map(str::to_string))),
        service_url: Some(service_url.to_string()),
        parent_layer_id: lineage.parent_id.clone(),
        parent_layer_name: lineage.parent_name.clone(),
        parent_path: lineage.path.clone(),
    }
}

fn layer_index(url: &str) -> Option<String> {
    let (_, last) = url.rsplit_once('/')?;
    (!last.is_empty() && last.chars().all(|c| c.is_ascii_digit())).then(|| last.to_string())
}

fn feature_collection_descriptors(
    node: &RawLayerNode,
    collection: &RawFeatureCollection,
    lineage: &Lineage,
) -> Vec<LayerDescriptor> {
    let parent_id = node.id.clone().unwrap_or_default();
    let title = node.title.clone();

    match collection.layers.as_deref() {
        Some(layers) if !layers.is_empty() => layers
            .iter()
            .enumerate()
            .map(|(index, layer)| {
                let definition = layer.layer_definition.as_ref();
                let child_id = definition
                    .and_then(|definition| definition.id.clone())
                    .unwrap_or_else(|| index.to_string());
                LayerDescriptor {
                    id: format!("{parent_id}_{child_id}"),
                    name: definition
                        .and_then(|definition| definition.name.clone())
                        .or_else(|| title.clone())
                        .unwrap_or_else(|| UNNAMED_LAYER.to_string()),
                    layer_type: "Feature Collection".to_string(),
                    geometry_type: definition
                        .and_then(|definition| definition.geometry_type.clone())
                        .or_else(|| {
                            layer
                                .feature_set
                                .as_ref()
                                .and_then(|set| set.geometry_type.clone())
                        }),
                    service_url: None,
                    parent_layer_id: node.id.clone(),
                    parent_layer_name: title.clone(),
                    parent_path: lineage.path.clone(),
                }
            })
            .collect(),
        _ => vec![LayerDescriptor {
            id: parent_id,
            name: title.unwrap_or_else(|| UNNAMED_LAYER.to_string()),
            layer_type: "Feature Collection".to_string(),
            geometry_type: node.declared_geometry_type().map(str::to_string),
            service_url: None,
            parent_layer_id: lineage.parent_id.clone(),
            parent_layer_name: lineage.parent_name.clone(),
            parent_path: lineage.path.clone(),
        }],
    }
}

fn feature_layer_descriptor(node: &RawLayerNode, lineage: &Lineage) -> LayerDescriptor {
    LayerDescriptor {
        id: node.id.clone().unwrap_or_default(),
        name: node
            .title
            .clone()
            .unwrap_or_else(|| UNNAMED_LAYER.to_string()),
        layer_type: "Feature Layer".to_string(),
        geometry_type: node.declared_geometry_type().map(str::to_string),
        service_url: node.url.clone(),
        parent_layer_id: lineage.parent_id.clone(),
        parent_layer_name: lineage.parent_name.clone(),
        parent_path: lineage.path.clone(),
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;
    use crate::client::DEFAULT_PORTAL;
    use crate::test::fetcher::MockFetcher;
    use crate::test::webmap::{self, ORTHO, PARKS};

    const ITEMS: &str = "https://www.arcgis.com/sharing/rest/content/items";

    fn client(fetcher: MockFetcher) -> ArcGisClient<MockFetcher> {
        ArcGisClient::new(fetcher)
    }

    #[tokio::test]
    async fn nested_groups_carry_lineage() {
        let client = client(MockFetcher::default().with(PARKS, webmap::parks_service()));
        let descriptors = LayerResolver::new(&client)
            .resolve(&webmap::nested_groups())
            .await
            .unwrap();

        assert_eq!(descriptors.len(), 2);
        for descriptor in &descriptors {
            assert_eq!(descriptor.parent_path, ["A", "B"]);
            assert_eq!(descriptor.parent_layer_name.as_deref(), Some("C"));
            assert_eq!(descriptor.parent_layer_id.as_deref(), Some("c"));
            assert_eq!(descriptor.service_url.as_deref(), Some(PARKS));
        }
        assert_eq!(descriptors[0].name, "Trees");
        assert_eq!(descriptors[1].layer_type, "Feature Layer");
        assert_eq!(
            descriptors[1].layer_url().as_deref(),
            Some(format!("{PARKS}/1").as_str())
        );
    }

    #[tokio::test]
    async fn every_node_kind() {
        let fetcher = MockFetcher::default()
            .with(PARKS, webmap::parks_service())
            .with(ORTHO, webmap::ortho_service())
            .with(
                format!("{ITEMS}/item1"),
                json!({"id": "item1", "type": "Feature Service", "url": format!("{PARKS}/0")}),
            )
            .with(
                format!("{PARKS}/0"),
                json!({"name": "Trees", "type": "Feature Layer", "geometryType": "esriGeometryPoint"}),
            );
        let client = client(fetcher);
        let descriptors = LayerResolver::new(&client)
            .resolve(&webmap::every_kind())
            .await
            .unwrap();

        let summary: Vec<_> = descriptors
            .iter()
            .map(|d| (d.id.as_str(), d.name.as_str(), d.layer_type.as_str()))
            .collect();
        assert_eq!(
            summary,
            [
                ("0", "Trees", "Feature Layer"),
                ("1", "Trails", "Feature Layer"),
                ("img", "Imagery", "Imagery Layer"),
                ("itm", "From item", "Feature Layer"),
                ("fc_7", "Pins", "Feature Collection"),
                ("fc_1", "Lines", "Feature Collection"),
                ("fl", "Standalone", "Feature Layer"),
            ]
        );

        let from_item = &descriptors[3];
        assert_eq!(
            from_item.layer_url().as_deref(),
            Some(format!("{PARKS}/0").as_str())
        );
        assert_eq!(from_item.geometry_type.as_deref(), Some("esriGeometryPoint"));

        let pins = &descriptors[4];
        assert_eq!(pins.parent_layer_id.as_deref(), Some("fc"));
        assert_eq!(pins.parent_layer_name.as_deref(), Some("Sketches"));
        assert_eq!(pins.layer_url(), None);

        assert_eq!(
            descriptors[6].geometry_type.as_deref(),
            Some("esriGeometryPolygon")
        );
        assert!(descriptors.iter().all(|d| d.parent_path.is_empty()));
    }

    #[tokio::test]
    async fn fetches_in_tree_order() {
        let other = "https://example.com/arcgis/rest/services/Other/MapServer";
        let fetcher = MockFetcher::default()
            .with(PARKS, webmap::parks_service())
            .with(other, json!({"name": "Other", "layers": [{"id": 3, "name": "Roads"}]}));
        let nodes = webmap::nodes(json!([
            {"title": "G", "layers": [{"id": "p", "url": PARKS}]},
            {"id": "o", "url": other},
            {"id": "again", "url": PARKS}
        ]));
        let client = client(fetcher);
        let descriptors = LayerResolver::new(&client).resolve(&nodes).await.unwrap();

        assert_eq!(client.fetcher().paths(), [PARKS, other, PARKS]);
        // the same service referenced twice yields its layers twice
        assert_eq!(descriptors.len(), 5);
        assert_eq!(descriptors[0].parent_path, ["G"]);
        assert!(descriptors[2].parent_path.is_empty());
    }

    #[tokio::test]
    async fn service_error_aborts() {
        let fetcher = MockFetcher::default().with(
            PARKS,
            json!({"error": {"code": 498, "message": "Invalid Token"}, "layers": [{"id": 0}]}),
        );
        let client = client(fetcher);
        let err = LayerResolver::new(&client)
            .resolve(&webmap::nested_groups())
            .await
            .unwrap_err();
        assert!(err.to_string().ends_with(": Invalid Token"));
        assert_eq!(err.to_string(), "Feature Server Error: Invalid Token");
    }

    #[tokio::test]
    async fn top_level_service() {
        let client = client(
            MockFetcher::default()
                .with(PARKS, webmap::parks_service())
                .with(ORTHO, webmap::ortho_service()),
        );
        let resolver = LayerResolver::new(&client);

        let descriptors = resolver.resolve_service(&format!("{PARKS}/")).await.unwrap();
        assert_eq!(descriptors.len(), 2);
        assert_eq!(descriptors[0].parent_layer_name.as_deref(), Some("Parks"));
        assert_eq!(descriptors[0].parent_path, ["Parks"]);

        let imagery = resolver.resolve_service(ORTHO).await.unwrap();
        assert_eq!(imagery.len(), 1);
        assert_eq!(imagery[0].layer_type, "Imagery Layer");
        assert_eq!(imagery[0].name, "Ortho");
    }

    #[tokio::test]
    async fn top_level_items() {
        let fetcher = MockFetcher::default()
            .with(format!("{ITEMS}/map"), json!({"id": "map", "type": "Web Map"}))
            .with(
                format!("{ITEMS}/map/data"),
                json!({"operationalLayers": [{"id": "c", "title": "C", "url": PARKS}]}),
            )
            .with(
                format!("{ITEMS}/svc"),
                json!({"id": "svc", "type": "Map Service", "url": PARKS}),
            )
            .with(format!("{ITEMS}/nourl"), json!({"id": "nourl", "type": "Map Service"}))
            .with(format!("{ITEMS}/app"), json!({"id": "app", "type": "Web Mapping Application"}))
            .with(PARKS, webmap::parks_service());
        let client = client(fetcher);
        let resolver = LayerResolver::new(&client).with_portal(DEFAULT_PORTAL);

        let from_map = resolver.resolve_item("map").await.unwrap();
        assert_eq!(from_map.len(), 2);
        assert_eq!(from_map[0].parent_layer_name.as_deref(), Some("C"));

        let from_service = resolver.resolve_item("svc").await.unwrap();
        assert_eq!(from_service.len(), 2);

        let err = resolver.resolve_item("nourl").await.unwrap_err();
        assert!(matches!(err, ArcGisError::Format(_)));

        let err = resolver.resolve_item("app").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unsupported item type: Web Mapping Application"
        );
    }

    #[tokio::test]
    async fn unresolvable_nodes_are_skipped() {
        let client = client(MockFetcher::default());
        let nodes = webmap::nodes(json!([
            {"id": "basemap", "layerType": "VectorTileLayer"},
            {"id": "empty", "title": "Empty group", "layers": []}
        ]));
        let descriptors = LayerResolver::new(&client).resolve(&nodes).await.unwrap();
        assert!(descriptors.is_empty());
        assert!(client.fetcher().requests().is_empty());
    }
}
