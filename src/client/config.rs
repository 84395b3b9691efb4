/// Portal used for item lookups when none is configured.
pub const DEFAULT_PORTAL: &str = "https://www.arcgis.com";

/// Parameters of the `/query` request issued for every added layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOptions {
    /// SQL filter; the default selects every feature.
    pub where_clause: String,
    /// Comma-separated attribute names, or `*`.
    pub out_fields: String,
    pub return_geometry: bool,
    /// Output spatial reference WKID. The canonical model assumes 4326.
    pub out_sr: u32,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            where_clause: "1=1".to_string(),
            out_fields: "*".to_string(),
            return_geometry: true,
            out_sr: 4326,
        }
    }
}

impl QueryOptions {
    pub fn with_where(self, where_clause: impl Into<String>) -> Self {
        Self {
            where_clause: where_clause.into(),
            ..self
        }
    }

    pub fn with_out_fields(self, out_fields: impl Into<String>) -> Self {
        Self {
            out_fields: out_fields.into(),
            ..self
        }
    }

    pub(crate) fn params(&self) -> [(&'static str, String); 4] {
        [
            ("where", self.where_clause.clone()),
            ("outFields", self.out_fields.clone()),
            ("returnGeometry", self.return_geometry.to_string()),
            ("outSR", self.out_sr.to_string()),
        ]
    }
}

/// Settings shared by every request an [`ArcGisClient`](super::ArcGisClient) makes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Portal root used to look up items, e.g. `https://www.arcgis.com` or
    /// `https://gis.example.com/portal`.
    pub portal: String,
    /// Access token appended to every request.
    pub token: Option<String>,
    pub query: QueryOptions,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            portal: DEFAULT_PORTAL.to_string(),
            token: None,
            query: QueryOptions::default(),
        }
    }
}

impl ClientConfig {
    pub fn with_portal(self, portal: impl Into<String>) -> Self {
        Self {
            portal: portal.into(),
            ..self
        }
    }

    pub fn with_token(self, token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            ..self
        }
    }

    pub fn with_query(self, query: QueryOptions) -> Self {
        Self { query, ..self }
    }
}
