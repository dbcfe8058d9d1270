//! API handlers for the report server
//!
//! Bodies are taken as raw bytes and parsed here so that malformed JSON
//! produces the same `{error}` body as every other client error.

use std::path::{Path, PathBuf};
use std::time::Duration;

use axum::{body::Bytes, extract::State, Json};
use inspection_report::{parse_report, render_inspection_report, render_to_bytes, write_atomic, RenderOptions};
use report_assembly::{assemble_complete_report, AssemblyInputs};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::AppState;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Handler: GET /health
pub async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "report-server",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Location of a generated file
#[derive(Debug, Serialize)]
pub struct GeneratedResponse {
    pub filepath: String,
    pub filename: String,
}

impl GeneratedResponse {
    fn for_path(path: &Path) -> Self {
        Self {
            filepath: path.display().to_string(),
            filename: path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default(),
        }
    }
}

/// Handler: POST /generate_trec
pub async fn handle_generate_trec(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<GeneratedResponse>, ApiError> {
    generate(state, body, RenderOptions::trec()).await
}

/// Handler: POST /generate_binsr_pdf
pub async fn handle_generate_binsr(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<GeneratedResponse>, ApiError> {
    generate(state, body, RenderOptions::binsr()).await
}

async fn generate(state: AppState, body: Bytes, options: RenderOptions) -> Result<Json<GeneratedResponse>, ApiError> {
    let root = parse_body(&body)?;
    let destination = state.output.allocate(&options.form.file_prefix);
    debug!(path = %destination.display(), form = %options.form.file_prefix, "generating report");

    let path = run_blocking(state.timeout_ms, move || -> Result<PathBuf, ApiError> {
        let input = parse_report(&root)?;
        Ok(render_inspection_report(&input.sections, &input.metadata, &options, &destination)?)
    })
    .await?;

    Ok(Json(GeneratedResponse::for_path(&path)))
}

/// Handler: POST /generate_trec_complete
///
/// Detail report preceded by the configured form's filled cover page and
/// any sample pages.
pub async fn handle_generate_trec_complete(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<GeneratedResponse>, ApiError> {
    let assets = state.cover.clone().ok_or_else(|| {
        ApiError::NotImplemented("Complete reports require a configured cover template".to_string())
    })?;

    let root = parse_body(&body)?;
    let destination = state.output.allocate("trec_complete");

    let path = run_blocking(state.timeout_ms, move || -> Result<PathBuf, ApiError> {
        let input = parse_report(&root)?;
        let detail = render_to_bytes(&input.sections, &input.metadata, &RenderOptions::trec())?;

        let mut inputs = AssemblyInputs::new(&assets.template, &detail, &input.metadata, &assets.layout);
        if let Some(sample) = assets.sample.as_deref() {
            inputs = inputs.with_sample(sample, assets.sample_pages.clone());
        }
        let assembled = assemble_complete_report(&inputs)?;

        write_atomic(&destination, &assembled)?;
        Ok(destination)
    })
    .await?;

    info!(path = %path.display(), "generated complete report");
    Ok(Json(GeneratedResponse::for_path(&path)))
}

fn parse_body(body: &[u8]) -> Result<Value, ApiError> {
    if body.is_empty() {
        return Err(ApiError::InvalidRequest("Invalid or missing JSON body".to_string()));
    }
    serde_json::from_slice(body).map_err(|e| {
        debug!(error = %e, "rejected request body");
        ApiError::InvalidRequest("Invalid or missing JSON body".to_string())
    })
}

/// Run a generation job on the blocking pool with a deadline.
///
/// A job that misses the deadline keeps running in the background, but its
/// result is discarded.
pub async fn run_blocking<T, F>(timeout_ms: u64, job: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    let result = tokio::time::timeout(Duration::from_millis(timeout_ms), tokio::task::spawn_blocking(job)).await;

    match result {
        Ok(Ok(outcome)) => outcome,
        Ok(Err(join_error)) => Err(ApiError::Internal(format!("Generation task panicked: {}", join_error))),
        Err(_elapsed) => Err(ApiError::Timeout(timeout_ms)),
    }
}
