//! Inspection report server
//!
//! Generates TREC property inspection reports over HTTP:
//!
//! - `POST /generate_trec` - detail report PDF
//! - `POST /generate_binsr_pdf` - buyer's inspection notice
//! - `POST /generate_trec_complete` - detail report behind a filled cover page
//! - `GET /generated/{filename}` - download a generated file
//!
//! Each request renders on the blocking pool under a timeout and writes to
//! its own uniquely named file in the output directory.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use clap::Parser;
use inspection_report::OutputConfig;
use report_assembly::{parse_ranges, CoverLayout};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::{info, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod api;
mod error;

use api::{handle_generate_binsr, handle_generate_trec, handle_generate_trec_complete, handle_health};

/// Command-line arguments for the report server
#[derive(Parser, Debug)]
#[command(name = "report-server")]
#[command(about = "HTTP service generating TREC inspection report PDFs")]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value = "5000")]
    port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Directory generated reports are written to
    #[arg(long, env = "REPORT_OUTPUT_DIR", default_value = "generated_files")]
    output_dir: PathBuf,

    /// Generation timeout in milliseconds
    #[arg(long, env = "REPORT_TIMEOUT_MS", default_value = "30000")]
    timeout_ms: u64,

    /// Blank form PDF whose first page becomes the cover of complete reports
    #[arg(long, env = "REPORT_COVER_TEMPLATE")]
    cover_template: Option<PathBuf>,

    /// Filled form PDF supplying the standard pages after the cover
    #[arg(long, env = "REPORT_SAMPLE_PAGES")]
    sample_pdf: Option<PathBuf>,

    /// Pages taken from the sample PDF
    #[arg(long, env = "REPORT_SAMPLE_RANGE", default_value = "2-4")]
    sample_range: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Cover template and sample pages loaded at startup
#[derive(Debug)]
pub struct CoverAssets {
    pub template: Vec<u8>,
    pub sample: Option<Vec<u8>>,
    pub sample_pages: Vec<u32>,
    pub layout: CoverLayout,
}

impl CoverAssets {
    fn load(args: &Args) -> anyhow::Result<Option<Self>> {
        let Some(template_path) = &args.cover_template else {
            return Ok(None);
        };

        let template = std::fs::read(template_path)
            .with_context(|| format!("reading cover template {}", template_path.display()))?;
        let sample = args
            .sample_pdf
            .as_ref()
            .map(|path| std::fs::read(path).with_context(|| format!("reading sample pages {}", path.display())))
            .transpose()?;
        let sample_pages = parse_ranges(&args.sample_range)?;

        Ok(Some(Self {
            template,
            sample,
            sample_pages,
            layout: CoverLayout::trec(),
        }))
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub output: OutputConfig,
    /// Generation timeout in milliseconds
    pub timeout_ms: u64,
    pub cover: Option<Arc<CoverAssets>>,
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let generated = ServeDir::new(state.output.output_dir());

    Router::new()
        .route("/health", get(handle_health))
        .route("/generate_trec", post(handle_generate_trec))
        .route("/generate_binsr_pdf", post(handle_generate_binsr))
        .route("/generate_trec_complete", post(handle_generate_trec_complete))
        .nest_service("/generated", generated)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(cors))
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting report server on {}:{}", args.host, args.port);

    std::fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("creating output directory {}", args.output_dir.display()))?;

    let cover = CoverAssets::load(&args)?.map(Arc::new);
    match &cover {
        Some(assets) => info!(
            sample = assets.sample.is_some(),
            pages = ?assets.sample_pages,
            "Complete reports enabled"
        ),
        None => info!("No cover template configured; /generate_trec_complete disabled"),
    }

    let state = AppState {
        output: OutputConfig::new(&args.output_dir),
        timeout_ms: args.timeout_ms,
        cover,
    };

    let app = router(state);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Server listening on http://{}", addr);
    info!("Output directory: {}", args.output_dir.display());
    info!("Generation timeout: {}ms", args.timeout_ms);

    axum::serve(listener, app).await?;

    Ok(())
}
