//! Raw ArcGIS REST JSON documents, as returned by Feature/Map Services and ArcGIS Online.
//!
//! These types decode leniently: fields the converter does not need are ignored, and identifiers
//! that ArcGIS emits as either numbers or strings are read into strings.

mod de;
mod feature;
mod geometry;
mod service;
mod webmap;

pub use feature::{Attributes, EsriFeature, QueryResponse};
pub use geometry::{EsriGeometry, EsriGeometryKind, Path};
pub use service::{
    check_service_error, ItemDocument, LayerInfo, ServiceDocument, ServiceLayer,
};
pub use webmap::{
    EmbeddedLayer, FeatureSet, LayerDefinition, LayerNode, RawFeatureCollection, RawLayerNode,
    WebMap,
};
