//! Writers for the supported interchange formats, plus interoperability with the `geozero`
//! crate.
//!
//! GeoJSON is the hub: [`to_geojson`] converts a canonical collection once and the KML and GPX
//! writers read that GeoJSON value.

mod format;
pub mod geojson;
#[cfg(feature = "geozero")]
pub mod geozero;
pub mod gpx;
pub mod kml;
mod properties;
mod xml;

pub use format::{base_filename, export_file, ExportFormat, ExportedFile, DEFAULT_FILENAME};
pub use self::geojson::{to_geojson, write_geojson};
pub use gpx::write_gpx;
pub use kml::write_kml;
pub use xml::escape_xml;
