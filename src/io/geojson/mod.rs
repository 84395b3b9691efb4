//! Write canonical feature collections to [GeoJSON](https://geojson.org/).
//!
//! The [`geojson::FeatureCollection`] built here is also the intermediate form the KML and GPX
//! writers read from.

pub use writer::{to_geojson, write_geojson};

mod writer;
