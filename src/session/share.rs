use url::Url;

use crate::io::ExportFormat;

/// Session state encoded in a shareable URL's query string.
///
/// `url` holds a single service or layer URL, `urls` several layer URLs (comma-joined on the
/// wire) and `export` the export format to run once the layers are loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShareState {
    pub url: Option<String>,
    pub urls: Vec<String>,
    pub export: Option<String>,
}

impl ShareState {
    pub fn from_url(url: &Url) -> Self {
        let mut state = Self::default();
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "url" => state.url = Some(value.into_owned()),
                "urls" => {
                    state.urls = value
                        .split(',')
                        .map(str::trim)
                        .filter(|url| !url.is_empty())
                        .map(str::to_string)
                        .collect()
                }
                "export" => state.export = Some(value.into_owned()),
                _ => {}
            }
        }
        state
    }

    /// `base` with its query replaced by this state.
    pub fn to_url(&self, base: &Url) -> Url {
        let mut url = base.clone();
        url.set_query(None);
        url.set_fragment(None);
        {
            let mut query = url.query_pairs_mut();
            if let Some(single) = &self.url {
                query.append_pair("url", single);
            }
            if !self.urls.is_empty() {
                query.append_pair("urls", &self.urls.join(","));
            }
            if let Some(export) = &self.export {
                query.append_pair("export", export);
            }
        }
        if url.query() == Some("") {
            url.set_query(None);
        }
        url
    }

    /// The URLs to open, in order. A single `url` wins over `urls`.
    pub fn targets(&self) -> Vec<&str> {
        match &self.url {
            Some(url) => vec![url.as_str()],
            None => self.urls.iter().map(String::as_str).collect(),
        }
    }

    /// The requested export format, if it names one this crate knows.
    pub fn export_format(&self) -> Option<ExportFormat> {
        self.export.as_deref()?.parse().ok()
    }
}
