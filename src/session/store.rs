use indexmap::IndexMap;
use serde_json::Value;

use crate::esri::{EsriFeature, LayerInfo};
use crate::feature::FeatureCollection;

/// An added layer: its metadata and every feature the query returned.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerRecord {
    /// `{service_url}/{layer_id}`; unique within a [`LayerStore`].
    pub layer_url: String,
    pub metadata: LayerInfo,
    pub features: Vec<EsriFeature>,
    /// Renderer settings from the metadata, kept for display.
    pub drawing_info: Option<Value>,
}

impl LayerRecord {
    pub fn new(layer_url: String, metadata: LayerInfo, features: Vec<EsriFeature>) -> Self {
        let drawing_info = metadata.drawing_info.clone();
        Self {
            layer_url,
            metadata,
            features,
            drawing_info,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.metadata.name.as_deref()
    }

    /// The canonical form of the stored features.
    pub fn collection(&self) -> FeatureCollection {
        FeatureCollection::from_esri(&self.features)
    }
}

/// Added layers keyed by layer URL, in the order they were first added.
#[derive(Debug, Clone, Default)]
pub struct LayerStore {
    records: IndexMap<String, LayerRecord>,
}

impl LayerStore {
    pub fn get(&self, layer_url: &str) -> Option<&LayerRecord> {
        self.records.get(layer_url)
    }

    /// Store `record`, replacing any record with the same layer URL in place. Returns the
    /// replaced record.
    pub fn insert(&mut self, record: LayerRecord) -> Option<LayerRecord> {
        self.records.insert(record.layer_url.clone(), record)
    }

    pub fn remove(&mut self, layer_url: &str) -> Option<LayerRecord> {
        self.records.shift_remove(layer_url)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LayerRecord> {
        self.records.values()
    }

    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;
    use crate::test::feature;

    fn record(url: &str, name: &str) -> LayerRecord {
        let metadata: LayerInfo = serde_json::from_value(json!({
            "name": name,
            "drawingInfo": {"renderer": {"type": "simple"}}
        }))
        .unwrap();
        LayerRecord::new(url.to_string(), metadata, feature::mixed_features())
    }

    #[test]
    fn keyed_by_layer_url() {
        let mut store = LayerStore::default();
        assert!(store.insert(record("https://h/FeatureServer/0", "a")).is_none());
        assert!(store.insert(record("https://h/FeatureServer/1", "b")).is_none());
        let replaced = store.insert(record("https://h/FeatureServer/0", "a2")).unwrap();
        assert_eq!(replaced.name(), Some("a"));

        assert_eq!(store.len(), 2);
        let names: Vec<_> = store.iter().filter_map(LayerRecord::name).collect();
        assert_eq!(names, ["a2", "b"]);

        let removed = store.remove("https://h/FeatureServer/0").unwrap();
        assert_eq!(removed.drawing_info.unwrap()["renderer"]["type"], "simple");
        assert_eq!(store.urls().collect::<Vec<_>>(), ["https://h/FeatureServer/1"]);
        assert!(store.get("https://h/FeatureServer/0").is_none());
    }

    #[test]
    fn record_collection() {
        let record = record("https://h/FeatureServer/0", "a");
        assert_eq!(record.collection().len(), 3);
    }
}
