//! Fetch ArcGIS REST documents through a pluggable [`JsonFetcher`].

mod config;
mod fetcher;
mod resource;

pub use config::{ClientConfig, QueryOptions, DEFAULT_PORTAL};
#[cfg(feature = "http")]
pub use fetcher::HttpFetcher;
pub use fetcher::JsonFetcher;
pub use resource::ResourceUrl;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::error::{ArcGisError, Result};
use crate::esri::{check_service_error, ItemDocument, LayerInfo, QueryResponse, ServiceDocument, WebMap};

/// Typed access to the ArcGIS REST documents this crate consumes.
///
/// Every request carries `f=json` and, when configured, the access token. Every response is checked
/// for an ArcGIS `error` object before it is decoded.
#[derive(Debug, Clone)]
pub struct ArcGisClient<F> {
    fetcher: F,
    config: ClientConfig,
}

impl<F: JsonFetcher> ArcGisClient<F> {
    pub fn new(fetcher: F) -> Self {
        Self::with_config(fetcher, ClientConfig::default())
    }

    pub fn with_config(fetcher: F, config: ClientConfig) -> Self {
        Self { fetcher, config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Metadata of a service, or of a layer when `url` addresses one.
    pub async fn service(&self, url: &str) -> Result<ServiceDocument> {
        let url = self.endpoint(url, &[])?;
        self.document(url, "Feature Server Error").await
    }

    /// Metadata of layer `layer_id` of the service at `service_url`.
    pub async fn layer_info(&self, service_url: &str, layer_id: &str) -> Result<LayerInfo> {
        let url = self.endpoint(service_url, &[layer_id])?;
        self.document(url, "Layer Error").await
    }

    /// Every feature of a layer, as configured by [`QueryOptions`].
    ///
    /// Fails with [`ArcGisError::Format`] when the response has no `features` array.
    pub async fn query(&self, service_url: &str, layer_id: &str) -> Result<QueryResponse> {
        let mut url = self.endpoint(service_url, &[layer_id, "query"])?;
        url.query_pairs_mut().extend_pairs(self.config.query.params());

        let document = self.fetch(url, "Feature Query Error").await?;
        if !document.get("features").is_some_and(Value::is_array) {
            return Err(ArcGisError::Format(
                "No features found or invalid feature data format.".to_string(),
            ));
        }
        let response: QueryResponse = decode(document, "Feature Query Error")?;
        if response.exceeded_transfer_limit {
            warn!(
                service_url,
                layer_id,
                geometry_type = response.geometry_type.as_deref(),
                features = response.features.len(),
                "query result truncated by the server's transfer limit"
            );
        }
        Ok(response)
    }

    /// Metadata of a portal item.
    pub async fn item(&self, portal: &str, item_id: &str) -> Result<ItemDocument> {
        let url = self.endpoint(portal, &["sharing", "rest", "content", "items", item_id])?;
        self.document(url, "Item Error").await
    }

    /// The data of a Web Map item: its operational layer tree.
    pub async fn web_map(&self, portal: &str, item_id: &str) -> Result<WebMap> {
        let url = self.endpoint(
            portal,
            &["sharing", "rest", "content", "items", item_id, "data"],
        )?;
        self.document(url, "Web Map Error").await
    }

    fn endpoint(&self, base: &str, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(base)?;
        url.set_query(None);
        url.path_segments_mut()
            .map_err(|_| ArcGisError::InvalidUrl(base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("f", "json");
            if let Some(token) = &self.config.token {
                query.append_pair("token", token);
            }
        }
        Ok(url)
    }

    async fn fetch(&self, url: Url, context: &str) -> Result<Value> {
        debug!(%url, "fetching");
        let document = self.fetcher.fetch_json(url).await?;
        check_service_error(&document, context)?;
        Ok(document)
    }

    async fn document<T: DeserializeOwned>(&self, url: Url, context: &str) -> Result<T> {
        let document = self.fetch(url, context).await?;
        decode(document, context)
    }
}

fn decode<T: DeserializeOwned>(document: Value, context: &str) -> Result<T> {
    serde_json::from_value(document)
        .map_err(|err| ArcGisError::Format(format!("{context}: {err}")))
}
