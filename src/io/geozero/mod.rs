//! Interoperability with the [`geozero`] crate.
//!
//! [`Geometry`](crate::geometry::Geometry) implements [`geozero::GeozeroGeometry`] and
//! [`FeatureCollection`](crate::feature::FeatureCollection) implements
//! [`geozero::GeozeroDatasource`], so any geozero processor can consume the canonical model.

mod data_source;
mod geometry;

pub(crate) use geometry::process_geometry;
