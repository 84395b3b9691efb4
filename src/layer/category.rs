use std::collections::BTreeMap;
use std::fmt;

use phf::phf_map;

use crate::layer::LayerDescriptor;

/// Coarse grouping of layer types for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LayerCategory {
    Feature,
    Tiled,
    Imagery,
    Other,
}

static CATEGORIES: phf::Map<&'static str, LayerCategory> = phf_map! {
    "Feature Layer" => LayerCategory::Feature,
    "Feature Collection" => LayerCategory::Feature,
    "Tiled Layer" => LayerCategory::Tiled,
    "Imagery Layer" => LayerCategory::Imagery,
    "ImageServer" => LayerCategory::Imagery,
};

impl LayerCategory {
    pub fn of(layer_type: &str) -> Self {
        CATEGORIES
            .get(layer_type)
            .copied()
            .unwrap_or(LayerCategory::Other)
    }

    pub fn label(&self) -> &'static str {
        match self {
            LayerCategory::Feature => "Feature Layers",
            LayerCategory::Tiled => "Tiled Layers",
            LayerCategory::Imagery => "Imagery Layers",
            LayerCategory::Other => "Other Layers",
        }
    }
}

impl fmt::Display for LayerCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl LayerDescriptor {
    pub fn category(&self) -> LayerCategory {
        LayerCategory::of(&self.layer_type)
    }

    /// Whether [`Session::add_descriptors`](crate::session::Session::add_descriptors) can fetch
    /// this layer: a feature layer with a layer URL. Inline feature collections have none.
    pub fn is_queryable(&self) -> bool {
        self.category() == LayerCategory::Feature && self.layer_url().is_some()
    }
}

/// Bucket descriptors by category. Buckets come in category order and keep descriptor order;
/// empty buckets are left out.
pub fn group_by_category(
    descriptors: &[LayerDescriptor],
) -> BTreeMap<LayerCategory, Vec<&LayerDescriptor>> {
    let mut groups: BTreeMap<_, Vec<_>> = BTreeMap::new();
    for descriptor in descriptors {
        groups
            .entry(descriptor.category())
            .or_default()
            .push(descriptor);
    }
    groups
}
