//! Application state: the layers a user has added, and exporting them.

mod share;
mod sink;
mod store;

pub use share::ShareState;
pub use sink::{DirectorySink, ExportSink};
pub use store::{LayerRecord, LayerStore};

use tracing::{error, info, warn};

use crate::client::{ArcGisClient, JsonFetcher, ResourceUrl};
use crate::error::{ArcGisError, Result};
use crate::io::{export_file, ExportFormat};
use crate::layer::{LayerDescriptor, LayerResolver};

/// What opening a URL produced.
#[derive(Debug, Clone, PartialEq)]
pub enum OpenOutcome {
    /// The URL names a service or item; the caller picks which of these layers to add.
    SelectLayers(Vec<LayerDescriptor>),
    /// The URL names a single layer, which was added under this layer URL.
    Added(String),
}

/// Outcome of adding several layers.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Layer URLs of the layers that were added.
    pub added: Vec<String>,
    /// Layer names with the error that stopped each of them.
    pub failed: Vec<(String, ArcGisError)>,
}

/// One document that could not be produced or saved.
#[derive(Debug)]
pub struct ExportFailure {
    pub layer_url: String,
    pub format: ExportFormat,
    pub error: ArcGisError,
}

/// Outcome of [`Session::export`].
#[derive(Debug, Default)]
pub struct ExportReport {
    /// Filenames handed to the sink.
    pub exported: Vec<String>,
    pub failed: Vec<ExportFailure>,
}

impl ExportReport {
    pub fn is_success(&self) -> bool {
        !self.exported.is_empty()
    }
}

/// Added layers plus the service awaiting a layer selection.
///
/// All network access goes through the owned [`ArcGisClient`]; every request is awaited before
/// the next one starts.
#[derive(Debug)]
pub struct Session<F> {
    client: ArcGisClient<F>,
    layers: LayerStore,
    current_service: Option<String>,
}

impl<F: JsonFetcher> Session<F> {
    pub fn new(client: ArcGisClient<F>) -> Self {
        Self {
            client,
            layers: LayerStore::default(),
            current_service: None,
        }
    }

    pub fn client(&self) -> &ArcGisClient<F> {
        &self.client
    }

    pub fn layers(&self) -> &LayerStore {
        &self.layers
    }

    /// The service or item URL whose layers are awaiting selection.
    pub fn current_service(&self) -> Option<&str> {
        self.current_service.as_deref()
    }

    /// Open a service, layer or item URL.
    ///
    /// A layer URL is added right away. Services and items are resolved into descriptors and
    /// remembered as the current service until [`Session::add_descriptors`] runs.
    pub async fn open(&mut self, url: &str) -> Result<OpenOutcome> {
        info!(url, "fetching layer information");
        match ResourceUrl::parse(url)? {
            ResourceUrl::Layer {
                service_url,
                layer_id,
            } => {
                let layer_url = self.add_layer(&service_url, &layer_id).await?;
                Ok(OpenOutcome::Added(layer_url))
            }
            ResourceUrl::Service { url: service_url } => {
                let descriptors = LayerResolver::new(&self.client)
                    .resolve_service(&service_url)
                    .await?;
                self.current_service = Some(service_url);
                Ok(OpenOutcome::SelectLayers(descriptors))
            }
            ResourceUrl::Item { portal, item_id } => {
                let descriptors = LayerResolver::new(&self.client)
                    .with_portal(portal)
                    .resolve_item(&item_id)
                    .await?;
                self.current_service = Some(url.trim().to_string());
                Ok(OpenOutcome::SelectLayers(descriptors))
            }
        }
    }

    /// Fetch a layer's metadata and features and store them under its layer URL, replacing an
    /// earlier copy. Returns the layer URL.
    pub async fn add_layer(&mut self, service_url: &str, layer_id: &str) -> Result<String> {
        let service_url = service_url.trim_end_matches('/');
        let metadata = self.client.layer_info(service_url, layer_id).await?;
        let response = self.client.query(service_url, layer_id).await?;

        let layer_url = format!("{service_url}/{layer_id}");
        let record = LayerRecord::new(layer_url.clone(), metadata, response.features);
        info!(
            layer_url,
            name = record.name(),
            features = record.features.len(),
            "added layer"
        );
        self.layers.insert(record);
        Ok(layer_url)
    }

    /// Add the selected layers one after another.
    ///
    /// A failing layer is logged and reported; it does not stop the layers after it, and layers
    /// added before it stay. Clears the current service.
    pub async fn add_descriptors(&mut self, descriptors: &[LayerDescriptor]) -> BatchReport {
        info!(count = descriptors.len(), "adding layers");
        let mut report = BatchReport::default();

        for descriptor in descriptors {
            match self.add_descriptor(descriptor).await {
                Ok(layer_url) => report.added.push(layer_url),
                Err(err) => {
                    warn!(layer = %descriptor.name, "error adding layer: {err}");
                    report.failed.push((descriptor.name.clone(), err));
                }
            }
        }

        self.current_service = None;
        if report.failed.is_empty() {
            info!("successfully added {} layer(s)", report.added.len());
        }
        report
    }

    async fn add_descriptor(&mut self, descriptor: &LayerDescriptor) -> Result<String> {
        let address = descriptor
            .layer_url()
            .map(|url| ResourceUrl::parse(&url))
            .transpose()?;
        match address {
            Some(ResourceUrl::Layer {
                service_url,
                layer_id,
            }) => self.add_layer(&service_url, &layer_id).await,
            _ => Err(ArcGisError::Format(format!(
                "Layer {} has no queryable URL",
                descriptor.name
            ))),
        }
    }

    pub fn remove_layer(&mut self, layer_url: &str) -> Option<LayerRecord> {
        let removed = self.layers.remove(layer_url);
        if removed.is_some() {
            info!(layer_url, "removed layer");
        }
        removed
    }

    /// Render every stored layer in every requested format and hand the documents to `sink`.
    ///
    /// A failing format is logged and reported; the remaining formats and layers still run.
    /// Fails with [`ArcGisError::NoData`] when no layer has been added.
    pub fn export(&self, formats: &[ExportFormat], sink: &mut impl ExportSink) -> Result<ExportReport> {
        if self.layers.is_empty() {
            return Err(ArcGisError::NoData);
        }

        let mut report = ExportReport::default();
        for record in self.layers.iter() {
            let collection = record.collection();
            for &format in formats {
                info!(
                    layer = record.name(),
                    %format,
                    "converting layer"
                );
                let saved =
                    export_file(&collection, record.name(), format).and_then(|file| sink.save(file));
                match saved {
                    Ok(filename) => report.exported.push(filename),
                    Err(err) => {
                        warn!(
                            layer = record.name(),
                            %format,
                            "error exporting layer: {err}"
                        );
                        report.failed.push(ExportFailure {
                            layer_url: record.layer_url.clone(),
                            format,
                            error: err,
                        });
                    }
                }
            }
        }

        if report.is_success() {
            info!("exported {} file(s) successfully", report.exported.len());
        } else {
            error!("export failed");
        }
        Ok(report)
    }

    /// The state to encode in a shareable URL.
    ///
    /// A service awaiting selection is shared as `url`; otherwise one added layer is shared as
    /// `url` and several as `urls`. Only the first format is kept.
    pub fn share_state(&self, formats: &[ExportFormat]) -> ShareState {
        let mut state = ShareState {
            export: formats.first().map(|format| format.as_str().to_string()),
            ..Default::default()
        };

        if let Some(service) = &self.current_service {
            state.url = Some(service.clone());
        } else {
            let urls: Vec<String> = self.layers.urls().map(str::to_string).collect();
            match urls.len() {
                0 => {}
                1 => state.url = urls.into_iter().next(),
                _ => state.urls = urls,
            }
        }
        state
    }
}
