//! Write GeoJSON feature collections to [GPX 1.1](https://www.topografix.com/GPX/1/1/).
//!
//! Only point features are written, as waypoints. Line strings and polygons have no waypoint
//! form and are left out; mapping them to tracks or routes is not part of this writer's contract.

use std::fmt::Write;

use geojson::Value;
use itertools::Itertools;

use crate::error::Result;
use crate::io::properties::{display_name, display_value};
use crate::io::xml::escape_xml;

const DEFAULT_NAME: &str = "Waypoint";

/// Value of the root element's `creator` attribute.
pub const GPX_CREATOR: &str = "ArcGIS Converter";

/// Write the point features of a GeoJSON feature collection as GPX waypoints.
pub fn write_gpx(collection: &geojson::FeatureCollection, layer_name: &str) -> Result<String> {
    let mut waypoints = String::new();

    for feature in &collection.features {
        let Some(Value::Point(position)) = feature.geometry.as_ref().map(|g| &g.value) else {
            continue;
        };
        let [lon, lat, ..] = position.as_slice() else {
            continue;
        };

        let properties = feature.properties.as_ref();
        let name = display_name(properties, DEFAULT_NAME);
        let desc = properties
            .into_iter()
            .flatten()
            .map(|(key, value)| format!("{key}: {}", display_value(value)))
            .join(", ");

        // GPX is latitude first
        write!(
            waypoints,
            r#"
    <wpt lat="{lat}" lon="{lon}">
        <name>{}</name>
        <desc>{}</desc>
    </wpt>"#,
            escape_xml(&*name),
            escape_xml(desc.as_str()),
        )?;
    }

    let mut out = String::new();
    write!(
        out,
        r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="{GPX_CREATOR}"
    xmlns="http://www.topografix.com/GPX/1/1"
    xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"
    xsi:schemaLocation="http://www.topografix.com/GPX/1/1 http://www.topografix.com/GPX/1/1/gpx.xsd">
    <metadata>
        <name>{}</name>
    </metadata>{waypoints}
</gpx>"#,
        escape_xml(layer_name),
    )?;
    Ok(out)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::feature::FeatureCollection;
    use crate::io::geojson::to_geojson;
    use crate::test::feature;

    fn gpx(features: &[crate::esri::EsriFeature], name: &str) -> String {
        let collection = to_geojson(&FeatureCollection::from_esri(features));
        write_gpx(&collection, name).unwrap()
    }

    #[test]
    fn only_points_become_waypoints() {
        let out = gpx(
            &[feature::esri_point_feature(), feature::esri_polygon_feature()],
            "Mixed",
        );
        assert_eq!(out.matches("<wpt ").count(), 1);
        assert!(out.contains(r#"<wpt lat="37.8" lon="-122.4">"#));
        assert!(!out.contains("Square"));
    }

    #[test]
    fn header_and_metadata() {
        let out = gpx(&[], "A/B layer");
        assert!(out.contains(r#"<gpx version="1.1" creator="ArcGIS Converter""#));
        assert!(out.contains(
            r#"xsi:schemaLocation="http://www.topografix.com/GPX/1/1 http://www.topografix.com/GPX/1/1/gpx.xsd""#
        ));
        assert!(out.contains("<name>A&#x2F;B layer</name>"));
        assert!(!out.contains("<wpt"));
    }

    #[test]
    fn name_and_description_are_escaped() {
        let raw = crate::esri::EsriFeature::new(
            Some(crate::test::geometry::esri_point()),
            [
                ("NAME".to_string(), serde_json::json!("Tom & Jerry's")),
                ("kind".to_string(), serde_json::json!("<cafe>")),
            ]
            .into_iter()
            .collect(),
        );
        let out = gpx(&[raw], "Layer");
        assert!(out.contains("<name>Tom &amp; Jerry&apos;s</name>"));
        assert!(out.contains(
            "<desc>NAME: Tom &amp; Jerry&apos;s, kind: &lt;cafe&gt;</desc>"
        ));
    }

    #[test]
    fn default_waypoint_name() {
        let raw = crate::esri::EsriFeature::new(
            Some(crate::test::geometry::esri_point()),
            Default::default(),
        );
        let out = gpx(&[raw], "Layer");
        assert!(out.contains("<name>Waypoint</name>"));
        assert!(out.contains("<desc></desc>"));
    }
}
