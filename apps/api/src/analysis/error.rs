use thiserror::Error;

/// Failures raised by the CV scoring engine and its record conversions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnalysisError {
    /// The CV text was missing or not a string. Not retryable.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A persisted tier name no longer maps to a known tier.
    #[error("Unknown tier '{0}'")]
    UnknownTier(String),
}

/// Failures converting an uploaded document into plain text.
/// Raised before the engine is called; the engine never sees raw bytes.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("Document is not valid UTF-8 text")]
    InvalidEncoding(#[from] std::string::FromUtf8Error),

    #[error("PDF text extraction failed: {0}")]
    Pdf(String),
}
