//! The canonical geometry model and the conversion from ArcGIS JSON geometries.

use geo::{Coord, LineString, Polygon};

use crate::esri::{EsriGeometry, EsriGeometryKind, Path};

/// A canonical geometry.
///
/// Coordinates are always `x = longitude, y = latitude`, exactly as returned by a query issued
/// with `outSR=4326`.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(Coord),
    LineString(Vec<Coord>),
    /// Rings in input order. The first ring is treated as the outer boundary by consumers that
    /// care; holes are not distinguished.
    Polygon(Vec<Vec<Coord>>),
}

impl Geometry {
    /// The GeoJSON type name of this geometry.
    pub fn geometry_type(&self) -> &'static str {
        match self {
            Geometry::Point(_) => "Point",
            Geometry::LineString(_) => "LineString",
            Geometry::Polygon(_) => "Polygon",
        }
    }

    /// Convert to a [`geo::Geometry`] so `geo` algorithms can run on it.
    pub fn to_geo(&self) -> geo::Geometry {
        match self {
            Geometry::Point(coord) => geo::Geometry::Point((*coord).into()),
            Geometry::LineString(coords) => geo::Geometry::LineString(LineString::new(coords.clone())),
            Geometry::Polygon(rings) => {
                let mut rings = rings.iter().map(|ring| LineString::new(ring.clone()));
                let exterior = rings.next().unwrap_or_else(|| LineString::new(vec![]));
                geo::Geometry::Polygon(Polygon::new(exterior, rings.collect()))
            }
        }
    }
}

/// Convert one ArcGIS geometry into a canonical [`Geometry`].
///
/// - `{x, y}` becomes a `Point`.
/// - `{paths}` becomes a `LineString` made of the **first** path only; further paths are dropped.
/// - `{rings}` becomes a `Polygon` with every ring kept as-is.
///
/// Returns `None` for any other shape, for an empty `paths` array, or when a position has fewer
/// than two ordinates.
///
/// ```
/// use arcgis_converter::esri::EsriGeometry;
/// use arcgis_converter::geometry::{normalize, Geometry};
/// use geo::coord;
///
/// let geom = normalize(&EsriGeometry::point(-122.4, 37.8)).unwrap();
/// assert_eq!(geom, Geometry::Point(coord! { x: -122.4, y: 37.8 }));
/// ```
pub fn normalize(raw: &EsriGeometry) -> Option<Geometry> {
    match raw.kind() {
        EsriGeometryKind::Point { x, y } => Some(Geometry::Point(Coord { x, y })),
        EsriGeometryKind::Polyline(paths) => {
            let first = paths.first()?;
            Some(Geometry::LineString(path_coords(first)?))
        }
        EsriGeometryKind::Polygon(rings) => {
            let rings = rings.iter().map(path_coords).collect::<Option<Vec<_>>>()?;
            Some(Geometry::Polygon(rings))
        }
        EsriGeometryKind::Unknown => None,
    }
}

fn path_coords(path: &Path) -> Option<Vec<Coord>> {
    path.iter()
        .map(|position| match position.as_slice() {
            [x, y, ..] => Some(Coord { x: *x, y: *y }),
            _ => None,
        })
        .collect()
}
