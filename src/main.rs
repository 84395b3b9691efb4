use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use arcgis_converter::client::{ArcGisClient, ClientConfig, HttpFetcher, QueryOptions, DEFAULT_PORTAL};
use arcgis_converter::esri::QueryResponse;
use arcgis_converter::io::{export_file, ExportFormat};
use arcgis_converter::layer::{group_by_category, LayerDescriptor, UNNAMED_LAYER};
use arcgis_converter::session::{DirectorySink, ExportSink, OpenOutcome, Session};
use arcgis_converter::worker::build_collection_in_background;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{info, warn};
use url::Url;

#[derive(Parser, Debug)]
#[command(name = "arcgis-converter", version, about = "Export ArcGIS layers to GeoJSON, KML and GPX")]
struct Cli {
    /// Portal used to look up item ids
    #[arg(long, global = true, env = "ARCGIS_PORTAL", default_value = DEFAULT_PORTAL)]
    portal: String,

    /// Access token appended to every request
    #[arg(long, global = true, env = "ARCGIS_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// SQL filter for feature queries
    #[arg(long = "where", global = true, default_value = "1=1")]
    where_clause: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum Output {
    Human,
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the layers behind a service, layer or item URL
    Layers {
        url: String,
        #[arg(short = 'o', long = "output", value_enum, default_value_t = Output::Human)]
        output: Output,
    },
    /// Add every feature layer reachable from the URLs and export them
    Export {
        #[arg(required = true)]
        urls: Vec<String>,
        /// Export format; repeat for several
        #[arg(short, long = "format", required = true, value_parser = ExportFormat::from_str)]
        formats: Vec<ExportFormat>,
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
        /// Print a shareable URL built on this base
        #[arg(long)]
        share: Option<Url>,
    },
    /// Export a saved query response without network access
    Convert {
        /// JSON file holding a `/query` response
        input: PathBuf,
        #[arg(long)]
        name: Option<String>,
        #[arg(short, long = "format", required = true, value_parser = ExportFormat::from_str)]
        formats: Vec<ExportFormat>,
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
}

fn init_tracing() {
    let env = std::env::var("ARCGIS_CONVERTER_LOG").unwrap_or_else(|_| "info".to_string());
    let filter = tracing_subscriber::EnvFilter::from_str(&env)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn print_layers(descriptors: &[LayerDescriptor], output: Output) -> Result<()> {
    match output {
        Output::Json => println!("{}", serde_json::to_string_pretty(descriptors)?),
        Output::Human => {
            for (category, layers) in group_by_category(descriptors) {
                println!("{category}");
                for layer in layers {
                    println!(
                        "  {} • {} • {}",
                        layer.display_path(),
                        layer.geometry_type.as_deref().unwrap_or("N/A"),
                        layer.layer_url().as_deref().unwrap_or("-"),
                    );
                }
            }
        }
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut config = ClientConfig::default()
        .with_portal(cli.portal)
        .with_query(QueryOptions::default().with_where(cli.where_clause));
    if let Some(token) = cli.token {
        config = config.with_token(token);
    }
    let client = ArcGisClient::with_config(HttpFetcher::default(), config);

    match cli.command {
        Commands::Layers { url, output } => {
            let mut session = Session::new(client);
            match session.open(&url).await? {
                OpenOutcome::SelectLayers(descriptors) => print_layers(&descriptors, output)?,
                OpenOutcome::Added(layer_url) => {
                    let record = session
                        .layers()
                        .get(&layer_url)
                        .context("added layer is missing")?;
                    println!(
                        "{} • {} feature(s) • {layer_url}",
                        record.name().unwrap_or(UNNAMED_LAYER),
                        record.features.len()
                    );
                }
            }
        }
        Commands::Export {
            urls,
            formats,
            out_dir,
            share,
        } => {
            let mut session = Session::new(client);
            for url in &urls {
                match session.open(url).await {
                    Ok(OpenOutcome::Added(_)) => {}
                    Ok(OpenOutcome::SelectLayers(descriptors)) => {
                        let queryable: Vec<_> = descriptors
                            .into_iter()
                            .filter(LayerDescriptor::is_queryable)
                            .collect();
                        let report = session.add_descriptors(&queryable).await;
                        for (name, err) in &report.failed {
                            warn!(layer = %name, "skipped: {err}");
                        }
                    }
                    Err(err) => warn!(url = %url, "error: {err}"),
                }
            }

            let mut sink = DirectorySink::new(&out_dir)?;
            let report = session.export(&formats, &mut sink)?;
            if !report.is_success() {
                bail!("export failed");
            }
            if let Some(base) = share {
                println!("{}", session.share_state(&formats).to_url(&base));
            }
        }
        Commands::Convert {
            input,
            name,
            formats,
            out_dir,
        } => {
            let text = std::fs::read_to_string(&input)
                .with_context(|| format!("reading {}", input.display()))?;
            let response: QueryResponse = serde_json::from_str(&text)
                .with_context(|| format!("decoding {}", input.display()))?;
            let collection = build_collection_in_background(response.features).await?;
            info!(features = collection.len(), "normalized query response");

            let layer_name = name.or_else(|| {
                input
                    .file_stem()
                    .map(|stem| stem.to_string_lossy().into_owned())
            });
            let mut sink = DirectorySink::new(&out_dir)?;
            for format in formats {
                let file = export_file(&collection, layer_name.as_deref(), format)?;
                let filename = sink.save(file)?;
                info!(%filename, "wrote export");
            }
        }
    }
    Ok(())
}
