//! Convert ArcGIS Feature and Map Service layers into GeoJSON, KML and GPX.
//!
//! The pipeline reads ArcGIS REST JSON ([`esri`]), normalizes geometries into a canonical
//! feature model ([`geometry`], [`feature`]) and writes that model to standard interchange formats
//! ([`io`]). Layers are discovered by walking services, portal items and web map
//! operational-layer trees ([`layer`]) through a [`client::ArcGisClient`]; a [`session::Session`]
//! keeps the added layers and exports them.
//!
//! ```
//! use arcgis_converter::esri::QueryResponse;
//! use arcgis_converter::feature::FeatureCollection;
//! use arcgis_converter::io::{export_file, ExportFormat};
//!
//! let response: QueryResponse = serde_json::from_str(
//!     r#"{"features": [{"geometry": {"x": -122.4, "y": 37.8}, "attributes": {"name": "Pier 39"}}]}"#,
//! )
//! .unwrap();
//! let collection = FeatureCollection::from_esri(&response.features);
//! let file = export_file(&collection, Some("Piers"), ExportFormat::Gpx).unwrap();
//! assert_eq!(file.filename, "Piers.gpx");
//! assert!(file.contents.contains(r#"<wpt lat="37.8" lon="-122.4">"#));
//! ```

#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![cfg_attr(not(test), deny(unused_crate_dependencies))]

// Used only by the binary.
#[cfg(feature = "cli")]
use {anyhow as _, clap as _, tracing_subscriber as _};

pub mod client;
pub mod error;
pub mod esri;
pub mod feature;
pub mod geometry;
pub mod io;
pub mod layer;
pub mod session;
#[cfg(feature = "worker")]
pub mod worker;
