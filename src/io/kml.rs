//! Write GeoJSON feature collections to [KML 2.2](https://developers.google.com/kml).

use std::fmt::Write;

use geojson::{Position, Value};
use itertools::Itertools;

use crate::error::Result;
use crate::io::properties::{display_name, display_value};
use crate::io::xml::escape_xml;

const DEFAULT_NAME: &str = "Feature";

/// Write a GeoJSON feature collection as a KML document named `layer_name`.
///
/// Each feature becomes a `Placemark` whose name comes from its `name`/`Name`/`NAME` property
/// and whose description is an HTML list of every property inside CDATA. Points, line strings
/// and polygons are supported. Only the outer ring of a polygon is written; holes are dropped.
/// Features without a writable geometry produce no placemark.
pub fn write_kml(collection: &geojson::FeatureCollection, layer_name: &str) -> Result<String> {
    let mut placemarks = String::new();

    for feature in &collection.features {
        let Some(geometry) = feature.geometry.as_ref().and_then(|g| encode_geometry(&g.value))
        else {
            continue;
        };

        let properties = feature.properties.as_ref();
        let name = display_name(properties, DEFAULT_NAME);
        let description = properties
            .into_iter()
            .flatten()
            .map(|(key, value)| format!("<strong>{key}:</strong> {}", display_value(value)))
            .join("<br>");

        write!(
            placemarks,
            "
            <Placemark>
                <name>{}</name>
                <description><![CDATA[{description}]]></description>
                {geometry}
            </Placemark>",
            escape_xml(&*name),
        )?;
    }

    let mut out = String::new();
    write!(
        out,
        r#"<?xml version="1.0" encoding="UTF-8"?>
<kml xmlns="http://www.opengis.net/kml/2.2">
    <Document>
        <name>{}</name>{placemarks}
    </Document>
</kml>"#,
        escape_xml(layer_name),
    )?;
    Ok(out)
}

fn encode_geometry(value: &Value) -> Option<String> {
    match value {
        Value::Point(position) => Some(format!(
            "<Point><coordinates>{}</coordinates></Point>",
            coordinate(position)?
        )),
        Value::LineString(positions) => Some(format!(
            "<LineString><coordinates>{}</coordinates></LineString>",
            coordinates(positions)?
        )),
        Value::Polygon(rings) => Some(format!(
            "<Polygon><outerBoundaryIs><LinearRing><coordinates>{}</coordinates></LinearRing></outerBoundaryIs></Polygon>",
            coordinates(rings.first()?)?
        )),
        _ => None,
    }
}

fn coordinate(position: &Position) -> Option<String> {
    match position.as_slice() {
        [lon, lat, ..] => Some(format!("{lon},{lat},0")),
        _ => None,
    }
}

fn coordinates(positions: &[Position]) -> Option<String> {
    let triples = positions.iter().map(coordinate).collect::<Option<Vec<_>>>()?;
    Some(triples.join(" "))
}
