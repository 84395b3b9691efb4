use geo::Coord;
use geojson::{JsonObject, Position};
use serde_json::{json, Value};

use crate::error::Result;
use crate::feature::{Feature, FeatureCollection};
use crate::geometry::Geometry;

/// Convert a canonical collection into a GeoJSON feature collection.
///
/// The collection's CRS is attached as a legacy `crs` member so consumers that predate RFC 7946
/// still see CRS84.
pub fn to_geojson(collection: &FeatureCollection) -> geojson::FeatureCollection {
    let mut foreign_members = JsonObject::new();
    foreign_members.insert(
        "crs".to_string(),
        json!({"type": "name", "properties": {"name": collection.crs().urn()}}),
    );

    geojson::FeatureCollection {
        bbox: None,
        features: collection.features().iter().map(encode_feature).collect(),
        foreign_members: Some(foreign_members),
    }
}

/// Serialize a GeoJSON feature collection as pretty-printed text, with the members in the order
/// `type`, foreign members (`crs`), `features`.
pub fn write_geojson(collection: &geojson::FeatureCollection) -> Result<String> {
    let mut document = JsonObject::new();
    document.insert("type".to_string(), Value::from("FeatureCollection"));
    if let Some(foreign_members) = &collection.foreign_members {
        for (key, value) in foreign_members {
            document.insert(key.clone(), value.clone());
        }
    }
    document.insert(
        "features".to_string(),
        serde_json::to_value(&collection.features)?,
    );
    Ok(serde_json::to_string_pretty(&document)?)
}

fn encode_feature(feature: &Feature) -> geojson::Feature {
    let properties: JsonObject = feature
        .properties
        .iter()
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    geojson::Feature {
        bbox: None,
        geometry: feature.geometry.as_ref().map(encode_geometry),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

fn encode_geometry(geometry: &Geometry) -> geojson::Geometry {
    let value = match geometry {
        Geometry::Point(coord) => geojson::Value::Point(position(coord)),
        Geometry::LineString(coords) => geojson::Value::LineString(positions(coords)),
        Geometry::Polygon(rings) => {
            geojson::Value::Polygon(rings.iter().map(|ring| positions(ring)).collect())
        }
    };
    geojson::Geometry::new(value)
}

fn position(coord: &Coord) -> Position {
    vec![coord.x, coord.y]
}

fn positions(coords: &[Coord]) -> Vec<Position> {
    coords.iter().map(position).collect()
}

#[cfg(test)]
mod test {
    use geojson::GeoJson;
    use serde_json::json;

    use super::*;
    use crate::test::feature;

    fn round_trip(collection: &FeatureCollection) -> geojson::FeatureCollection {
        let text = write_geojson(&to_geojson(collection)).unwrap();
        match text.parse::<GeoJson>().unwrap() {
            GeoJson::FeatureCollection(parsed) => parsed,
            other => panic!("expected a feature collection, got {other:?}"),
        }
    }

    #[test]
    fn round_trip_preserves_coordinates_and_properties() {
        let collection = FeatureCollection::from_esri(&feature::mixed_features());
        let parsed = round_trip(&collection);
        assert_eq!(parsed.features.len(), 3);

        let values: Vec<_> = parsed
            .features
            .iter()
            .map(|f| f.geometry.as_ref().unwrap().value.clone())
            .collect();
        assert_eq!(values[0], geojson::Value::Point(vec![-122.4, 37.8]));
        assert_eq!(
            values[1],
            geojson::Value::LineString(vec![vec![0., 0.], vec![1., 1.]])
        );
        assert_eq!(
            values[2],
            geojson::Value::Polygon(vec![vec![
                vec![0., 0.],
                vec![1., 0.],
                vec![1., 1.],
                vec![0., 0.]
            ]])
        );

        for (parsed, original) in parsed.features.iter().zip(collection.features()) {
            let properties = parsed.properties.as_ref().unwrap();
            let expected: JsonObject = original
                .properties
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect();
            assert_eq!(properties, &expected);
        }
    }

    #[test]
    fn document_layout() {
        let collection = FeatureCollection::from_esri(&[feature::esri_point_feature()]);
        let text = write_geojson(&to_geojson(&collection)).unwrap();
        let document: Value = serde_json::from_str(&text).unwrap();

        let keys: Vec<_> = document.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, ["type", "crs", "features"]);
        assert_eq!(
            document["crs"],
            json!({"type": "name", "properties": {"name": "urn:ogc:def:crs:OGC:1.3:CRS84"}})
        );
        assert_eq!(document["features"][0]["type"], "Feature");
        assert_eq!(
            document["features"][0]["geometry"],
            json!({"type": "Point", "coordinates": [-122.4, 37.8]})
        );
        assert!(text.contains("\n  \"type\": \"FeatureCollection\""));
    }

    #[test]
    fn empty_collection() {
        let text = write_geojson(&to_geojson(&FeatureCollection::default())).unwrap();
        let document: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(document["features"], json!([]));
    }
}
