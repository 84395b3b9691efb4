//! Normalize large feature sets off the async executor.

use tracing::debug;

use crate::error::Result;
use crate::esri::EsriFeature;
use crate::feature::FeatureCollection;

/// Build a [`FeatureCollection`] on tokio's blocking pool.
///
/// The raw features are moved to the worker and the complete collection comes back in one piece.
/// A panic inside the worker surfaces as [`ArcGisError::Worker`](crate::error::ArcGisError::Worker).
pub async fn build_collection_in_background(raw: Vec<EsriFeature>) -> Result<FeatureCollection> {
    let count = raw.len();
    let collection =
        tokio::task::spawn_blocking(move || FeatureCollection::from_esri(&raw)).await?;
    debug!(input = count, output = collection.len(), "normalized features");
    Ok(collection)
}
