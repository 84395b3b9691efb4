//! Canonical features and feature collections.

use geo::{BoundingRect, GeometryCollection, Rect};

use crate::esri::{Attributes, EsriFeature};
use crate::geometry::{normalize, Geometry};

/// Feature properties: the ArcGIS attributes, passed through untouched.
pub type Properties = Attributes;

/// The coordinate reference system of a [`FeatureCollection`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Crs {
    /// WGS84 geographic coordinates, longitude first.
    #[default]
    Crs84,
}

impl Crs {
    /// The OGC URN naming this CRS.
    pub fn urn(&self) -> &'static str {
        match self {
            Crs::Crs84 => "urn:ogc:def:crs:OGC:1.3:CRS84",
        }
    }
}

/// A geometry paired with its attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub geometry: Option<Geometry>,
    pub properties: Properties,
}

impl Feature {
    /// Normalize the geometry of an ArcGIS feature and carry its attributes over unchanged.
    pub fn from_esri(raw: &EsriFeature) -> Self {
        Self {
            geometry: raw.geometry.as_ref().and_then(normalize),
            properties: raw.attributes.clone(),
        }
    }
}

/// An ordered set of features that all have a geometry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureCollection {
    features: Vec<Feature>,
    crs: Crs,
}

impl FeatureCollection {
    /// Build a collection from ArcGIS features.
    ///
    /// Features whose geometry is missing or unrecognized are dropped; the others keep their
    /// input order.
    pub fn from_esri(raw: &[EsriFeature]) -> Self {
        raw.iter().map(Feature::from_esri).collect()
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn crs(&self) -> Crs {
        self.crs
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// The extent of every geometry in the collection, or `None` when there is nothing to
    /// measure.
    pub fn bounding_rect(&self) -> Option<Rect> {
        let geometries: GeometryCollection = self
            .features
            .iter()
            .filter_map(|feature| feature.geometry.as_ref().map(Geometry::to_geo))
            .collect();
        geometries.bounding_rect()
    }
}

impl FromIterator<Feature> for FeatureCollection {
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> Self {
        Self {
            features: iter
                .into_iter()
                .filter(|feature| feature.geometry.is_some())
                .collect(),
            crs: Crs::Crs84,
        }
    }
}

/// Build a collection from an optional feature list.
///
/// `None` means the layer has no data at all and must not be exported; an empty list still yields
/// an (empty) collection.
pub fn build_collection(raw: Option<&[EsriFeature]>) -> Option<FeatureCollection> {
    raw.map(FeatureCollection::from_esri)
}
