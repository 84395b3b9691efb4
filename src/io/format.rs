use std::fmt;
use std::str::FromStr;

use crate::error::{ArcGisError, Result};
use crate::feature::FeatureCollection;
use crate::io::geojson::{to_geojson, write_geojson};
use crate::io::gpx::write_gpx;
use crate::io::kml::write_kml;

/// Filename stem used when a layer has no usable name.
pub const DEFAULT_FILENAME: &str = "exported_layer";

/// Export formats a user can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    GeoJson,
    Kml,
    Gpx,
    /// Accepted as a name but not implemented; exporting to it always fails.
    Shapefile,
}

impl ExportFormat {
    /// The formats that can actually be written.
    pub const SUPPORTED: [ExportFormat; 3] =
        [ExportFormat::GeoJson, ExportFormat::Kml, ExportFormat::Gpx];

    /// Lowercase name, as used in share URLs and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::GeoJson => "geojson",
            ExportFormat::Kml => "kml",
            ExportFormat::Gpx => "gpx",
            ExportFormat::Shapefile => "shapefile",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::GeoJson => "application/geo+json",
            ExportFormat::Kml => "application/vnd.google-earth.kml+xml",
            ExportFormat::Gpx => "application/gpx+xml",
            ExportFormat::Shapefile => "application/zip",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::GeoJson => "geojson",
            ExportFormat::Kml => "kml",
            ExportFormat::Gpx => "gpx",
            ExportFormat::Shapefile => "zip",
        }
    }

    /// Render `collection` in this format. `name` is the human-readable layer name embedded in
    /// KML and GPX documents.
    pub fn render(&self, collection: &FeatureCollection, name: &str) -> Result<String> {
        // KML and GPX are written from the GeoJSON form, never from the canonical features.
        let geojson = to_geojson(collection);
        match self {
            ExportFormat::GeoJson => write_geojson(&geojson),
            ExportFormat::Kml => write_kml(&geojson, name),
            ExportFormat::Gpx => write_gpx(&geojson, name),
            ExportFormat::Shapefile => Err(ArcGisError::UnsupportedFormat(
                "Shapefile export is not yet implemented.".to_string(),
            )),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = ArcGisError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "geojson" => Ok(ExportFormat::GeoJson),
            "kml" => Ok(ExportFormat::Kml),
            "gpx" => Ok(ExportFormat::Gpx),
            "shapefile" | "shp" => Ok(ExportFormat::Shapefile),
            _ => Err(ArcGisError::UnsupportedFormat(format!(
                "Unsupported format: {s}"
            ))),
        }
    }
}

/// A rendered document, ready to be saved or downloaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    pub filename: String,
    pub mime_type: &'static str,
    pub contents: String,
}

/// Filename stem for a layer: whitespace runs become `_`; a missing or empty name falls back to
/// [`DEFAULT_FILENAME`].
pub fn base_filename(layer_name: Option<&str>) -> String {
    let Some(name) = layer_name.filter(|name| !name.is_empty()) else {
        return DEFAULT_FILENAME.to_string();
    };

    let mut out = String::with_capacity(name.len());
    let mut in_whitespace = false;
    for c in name.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                out.push('_');
            }
            in_whitespace = true;
        } else {
            out.push(c);
            in_whitespace = false;
        }
    }
    out
}

/// Render one layer in one format, named after the layer.
pub fn export_file(
    collection: &FeatureCollection,
    layer_name: Option<&str>,
    format: ExportFormat,
) -> Result<ExportedFile> {
    let stem = base_filename(layer_name);
    let contents = format.render(collection, &stem)?;
    Ok(ExportedFile {
        filename: format!("{stem}.{}", format.extension()),
        mime_type: format.mime_type(),
        contents,
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test::feature;

    #[test]
    fn parse_formats() {
        assert_eq!("GeoJSON".parse::<ExportFormat>().unwrap(), ExportFormat::GeoJson);
        assert_eq!(" kml ".parse::<ExportFormat>().unwrap(), ExportFormat::Kml);
        assert_eq!("shapefile".parse::<ExportFormat>().unwrap(), ExportFormat::Shapefile);
        let err = "csv".parse::<ExportFormat>().unwrap_err();
        assert_eq!(err.to_string(), "Unsupported format: csv");
    }

    #[test]
    fn filenames() {
        assert_eq!(base_filename(Some("City  Parks\tand Trails")), "City_Parks_and_Trails");
        assert_eq!(base_filename(Some(" lead")), "_lead");
        assert_eq!(base_filename(Some("")), "exported_layer");
        assert_eq!(base_filename(None), "exported_layer");
    }

    #[test]
    fn export_each_format() {
        let collection = FeatureCollection::from_esri(&feature::mixed_features());
        for format in ExportFormat::SUPPORTED {
            let file = export_file(&collection, Some("Bay Area"), format).unwrap();
            assert_eq!(file.filename, format!("Bay_Area.{}", format.extension()));
            assert_eq!(file.mime_type, format.mime_type());
            assert!(!file.contents.is_empty());
        }

        let kml = export_file(&collection, Some("Bay Area"), ExportFormat::Kml).unwrap();
        assert!(kml.contents.contains("<name>Bay_Area</name>"));
        assert_eq!(kml.mime_type, "application/vnd.google-earth.kml+xml");
    }

    #[test]
    fn shapefile_is_unsupported() {
        let collection = FeatureCollection::from_esri(&feature::mixed_features());
        let err = export_file(&collection, None, ExportFormat::Shapefile).unwrap_err();
        assert!(matches!(err, ArcGisError::UnsupportedFormat(_)));
        assert_eq!(err.to_string(), "Shapefile export is not yet implemented.");
    }
}
