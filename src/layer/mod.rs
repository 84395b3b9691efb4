//! Discover the queryable layers behind services, items and web maps.

mod category;
mod descriptor;
mod resolver;

pub use category::{group_by_category, LayerCategory};
pub use descriptor::{LayerDescriptor, UNNAMED_LAYER};
pub use resolver::LayerResolver;
