use std::fmt;

use url::Url;

use crate::error::{ArcGisError, Result};

const SERVICE_KINDS: [&str; 3] = ["FeatureServer", "MapServer", "ImageServer"];
const QUERYABLE_KINDS: [&str; 2] = ["FeatureServer", "MapServer"];
const PORTAL_MARKERS: [&str; 3] = ["/home/", "/apps/", "/sharing/rest/content/items/"];

/// What a user-supplied URL points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceUrl {
    /// A Feature/Map/Image Service root, e.g. `.../rest/services/Parks/FeatureServer`.
    Service { url: String },
    /// One layer of a service, e.g. `.../FeatureServer/3`.
    Layer { service_url: String, layer_id: String },
    /// A portal item: an item page, a map viewer link, or a REST item URL.
    Item { portal: String, item_id: String },
}

impl ResourceUrl {
    /// Classify `input`.
    ///
    /// ```
    /// use arcgis_converter::client::ResourceUrl;
    ///
    /// let url = ResourceUrl::parse("https://example.com/arcgis/rest/services/Parks/FeatureServer/2").unwrap();
    /// assert_eq!(
    ///     url,
    ///     ResourceUrl::Layer {
    ///         service_url: "https://example.com/arcgis/rest/services/Parks/FeatureServer".to_string(),
    ///         layer_id: "2".to_string(),
    ///     }
    /// );
    /// ```
    pub fn parse(input: &str) -> Result<Self> {
        let invalid = || {
            ArcGisError::InvalidUrl(format!(
                "{input} is not an ArcGIS service, layer or item URL"
            ))
        };

        let url = Url::parse(input.trim()).map_err(|_| invalid())?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid());
        }

        if let Some(item) = parse_item(&url) {
            return Ok(item);
        }

        let origin = url.origin().ascii_serialization();
        let segments: Vec<&str> = url
            .path_segments()
            .map(|segments| segments.filter(|s| !s.is_empty()).collect())
            .unwrap_or_default();

        match segments.as_slice() {
            [.., kind] if SERVICE_KINDS.contains(kind) => Ok(ResourceUrl::Service {
                url: join(&origin, &segments),
            }),
            [.., kind, id]
                if QUERYABLE_KINDS.contains(kind) && id.chars().all(|c| c.is_ascii_digit()) =>
            {
                Ok(ResourceUrl::Layer {
                    service_url: join(&origin, &segments[..segments.len() - 1]),
                    layer_id: id.to_string(),
                })
            }
            _ => Err(invalid()),
        }
    }

    /// The queryable layer URL, when this addresses a single layer.
    pub fn layer_url(&self) -> Option<String> {
        match self {
            ResourceUrl::Layer {
                service_url,
                layer_id,
            } => Some(format!("{service_url}/{layer_id}")),
            _ => None,
        }
    }
}

impl fmt::Display for ResourceUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceUrl::Service { url } => f.write_str(url),
            ResourceUrl::Layer {
                service_url,
                layer_id,
            } => write!(f, "{service_url}/{layer_id}"),
            ResourceUrl::Item { portal, item_id } => {
                write!(f, "{portal}/home/item.html?id={item_id}")
            }
        }
    }
}

fn join(origin: &str, segments: &[&str]) -> String {
    format!("{origin}/{}", segments.join("/"))
}

fn parse_item(url: &Url) -> Option<ResourceUrl> {
    let path = url.path();
    let (marker, start) = PORTAL_MARKERS
        .iter()
        .find_map(|marker| path.find(marker).map(|start| (*marker, start)))?;
    let portal = format!("{}{}", url.origin().ascii_serialization(), &path[..start]);

    let item_id = if marker == "/sharing/rest/content/items/" {
        path[start + marker.len()..]
            .split('/')
            .next()
            .map(str::to_string)
    } else {
        url.query_pairs()
            .find(|(key, _)| key == "id" || key == "webmap")
            .map(|(_, value)| value.into_owned())
    };

    item_id
        .filter(|id| !id.is_empty())
        .map(|item_id| ResourceUrl::Item { portal, item_id })
}
