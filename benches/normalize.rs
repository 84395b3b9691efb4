use arcgis_converter::esri::{Attributes, EsriFeature, EsriGeometry};
use arcgis_converter::feature::FeatureCollection;
use criterion::{criterion_group, criterion_main, Criterion};
use serde_json::json;

fn create_data() -> Vec<EsriFeature> {
    // An L shape, repeated with one point and one line per polygon
    let ring = vec![
        vec![0.0, 0.0],
        vec![4.0, 0.0],
        vec![4.0, 1.0],
        vec![1.0, 1.0],
        vec![1.0, 4.0],
        vec![0.0, 4.0],
        vec![0.0, 0.0],
    ];
    (0..1000)
        .flat_map(|i| {
            let attributes = Attributes::from([
                ("OBJECTID".to_string(), json!(i)),
                ("name".to_string(), json!(format!("feature {i}"))),
            ]);
            [
                EsriFeature::new(Some(EsriGeometry::polygon(vec![ring.clone()])), attributes.clone()),
                EsriFeature::new(Some(EsriGeometry::point(i as f64, 1.0)), attributes.clone()),
                EsriFeature::new(
                    Some(EsriGeometry::polyline(vec![ring.clone(), ring.clone()])),
                    attributes,
                ),
            ]
        })
        .collect()
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let data = create_data();

    c.bench_function("normalize 3000 ArcGIS features", |b| {
        b.iter(|| {
            let _collection = FeatureCollection::from_esri(&data);
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
