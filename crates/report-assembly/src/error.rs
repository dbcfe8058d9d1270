use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssemblyError {
    #[error("Failed to parse PDF: {0}")]
    ParseError(String),

    #[error("Invalid page range: {0}")]
    InvalidRange(String),

    #[error("PDF operation failed: {0}")]
    OperationError(String),

    #[error("Missing cover field: {0}")]
    MissingField(String),
}

pub type Result<T> = std::result::Result<T, AssemblyError>;
