use geozero::error::GeozeroError;
use geozero::{ColumnValue, FeatureProcessor, GeozeroDatasource, PropertyProcessor};
use serde_json::Value;

use crate::feature::{FeatureCollection, Properties};
use crate::io::geozero::process_geometry;

impl GeozeroDatasource for FeatureCollection {
    fn process<P: FeatureProcessor>(&mut self, processor: &mut P) -> Result<(), GeozeroError> {
        process_collection(self, processor)
    }
}

fn process_collection<P: FeatureProcessor>(
    collection: &FeatureCollection,
    processor: &mut P,
) -> Result<(), GeozeroError> {
    processor.dataset_begin(None)?;

    for (idx, feature) in collection.features().iter().enumerate() {
        let idx = idx as u64;
        processor.feature_begin(idx)?;

        processor.properties_begin()?;
        process_properties(&feature.properties, processor)?;
        processor.properties_end()?;

        processor.geometry_begin()?;
        if let Some(geometry) = &feature.geometry {
            process_geometry(geometry, 0, processor)?;
        }
        processor.geometry_end()?;

        processor.feature_end(idx)?;
    }

    processor.dataset_end()?;
    Ok(())
}

fn process_properties<P: PropertyProcessor>(
    properties: &Properties,
    processor: &mut P,
) -> Result<(), GeozeroError> {
    // Null values are omitted, so the property index is tracked separately
    let mut property_idx = 0;
    for (name, value) in properties {
        match value {
            Value::Null => continue,
            Value::Bool(v) => processor.property(property_idx, name, &ColumnValue::Bool(*v))?,
            Value::String(v) => processor.property(property_idx, name, &ColumnValue::String(v))?,
            Value::Number(v) => {
                if let Some(v) = v.as_i64() {
                    processor.property(property_idx, name, &ColumnValue::Long(v))?
                } else if let Some(v) = v.as_u64() {
                    processor.property(property_idx, name, &ColumnValue::ULong(v))?
                } else if let Some(v) = v.as_f64() {
                    processor.property(property_idx, name, &ColumnValue::Double(v))?
                } else {
                    return Err(GeozeroError::Property(name.clone()));
                }
            }
            Value::Array(_) | Value::Object(_) => {
                let json = value.to_string();
                processor.property(property_idx, name, &ColumnValue::Json(&json))?
            }
        };
        property_idx += 1;
    }
    Ok(())
}
