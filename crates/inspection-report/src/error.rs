use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Invalid report input: {0}")]
    Validation(String),

    #[error("PDF rendering backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("Failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("PDF generation failed: {0}")]
    Pdf(String),

    #[error("Malformed report JSON: {0}")]
    Input(#[from] serde_json::Error),
}

impl ReportError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ReportError::Io {
            path: path.into(),
            source,
        }
    }

    /// True for errors caused by the caller's input rather than generation itself
    pub fn is_client_error(&self) -> bool {
        matches!(self, ReportError::Validation(_) | ReportError::Input(_))
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;
