use async_trait::async_trait;
use serde_json::Value;
use url::Url;

use crate::error::Result;

/// Retrieves and decodes JSON documents.
///
/// Implementations report non-success HTTP statuses as
/// [`ArcGisError::Transport`](crate::error::ArcGisError::Transport). They do not inspect the
/// document; ArcGIS `error` bodies are handled by the caller.
#[async_trait]
pub trait JsonFetcher: Send + Sync {
    async fn fetch_json(&self, url: Url) -> Result<Value>;
}

#[cfg(feature = "http")]
pub use http::HttpFetcher;

#[cfg(feature = "http")]
mod http {
    use async_trait::async_trait;
    use serde_json::Value;
    use url::Url;

    use super::JsonFetcher;
    use crate::error::{ArcGisError, Result};

    /// [`JsonFetcher`] over a [`reqwest::Client`].
    #[derive(Debug, Clone, Default)]
    pub struct HttpFetcher {
        client: reqwest::Client,
    }

    impl HttpFetcher {
        pub fn new(client: reqwest::Client) -> Self {
            Self { client }
        }
    }

    #[async_trait]
    impl JsonFetcher for HttpFetcher {
        async fn fetch_json(&self, url: Url) -> Result<Value> {
            let response = self.client.get(url.clone()).send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(ArcGisError::Transport {
                    url: url.to_string(),
                    status: status.to_string(),
                });
            }
            Ok(response.json().await?)
        }
    }
}
