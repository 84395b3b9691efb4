use serde::{Deserialize, Serialize};

use crate::esri::de;

/// One polyline path or polygon ring: a sequence of `[x, y, ...]` positions.
///
/// Positions hold only their leading numeric ordinates; a position with fewer than two is not
/// usable.
pub type Path = Vec<Vec<f64>>;

/// An ArcGIS JSON geometry.
///
/// ArcGIS does not tag its geometries; the shape is implied by which fields are present. Use
/// [`EsriGeometry::kind`] to get the tagged view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EsriGeometry {
    #[serde(default, deserialize_with = "de::number", skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, deserialize_with = "de::number", skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, deserialize_with = "de::paths", skip_serializing_if = "Option::is_none")]
    pub paths: Option<Vec<Path>>,
    #[serde(default, deserialize_with = "de::paths", skip_serializing_if = "Option::is_none")]
    pub rings: Option<Vec<Path>>,
}

/// Borrowed, tagged view over an [`EsriGeometry`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EsriGeometryKind<'a> {
    Point { x: f64, y: f64 },
    Polyline(&'a [Path]),
    Polygon(&'a [Path]),
    Unknown,
}

impl EsriGeometry {
    pub fn point(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Default::default()
        }
    }

    pub fn polyline(paths: Vec<Path>) -> Self {
        Self {
            paths: Some(paths),
            ..Default::default()
        }
    }

    pub fn polygon(rings: Vec<Path>) -> Self {
        Self {
            rings: Some(rings),
            ..Default::default()
        }
    }

    /// Decide the geometry shape. A numeric `x`/`y` pair wins over `paths`, which wins over
    /// `rings`.
    pub fn kind(&self) -> EsriGeometryKind<'_> {
        if let (Some(x), Some(y)) = (self.x, self.y) {
            EsriGeometryKind::Point { x, y }
        } else if let Some(paths) = &self.paths {
            EsriGeometryKind::Polyline(paths)
        } else if let Some(rings) = &self.rings {
            EsriGeometryKind::Polygon(rings)
        } else {
            EsriGeometryKind::Unknown
        }
    }
}
