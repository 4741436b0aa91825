use std::path::PathBuf;
use thiserror::Error;

use crate::data::DocumentFormat;

/// Result type for corpus operations
pub type Result<T> = std::result::Result<T, CorpusError>;

/// Errors raised while building a corpus
#[derive(Error, Debug)]
pub enum CorpusError {
    /// Source directory is missing
    #[error("Source directory does not exist: {0:?}")]
    MissingSource(PathBuf),

    /// Filename does not follow the `Title_Author.ext` convention
    #[error("Invalid corpus filename (expected Title_Author.ext): {0}")]
    InvalidFilename(String),

    /// Extension is not one of the supported document formats
    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),

    /// A format extractor could not read the document
    #[error("Failed to extract {format} document {source_id}: {reason}")]
    Extraction {
        format: DocumentFormat,
        source_id: String,
        reason: String,
    },

    /// Document bytes are not valid UTF-8
    #[error("Failed to decode {0} as UTF-8")]
    Decode(String),

    /// A cleaning pattern failed to compile
    #[error("Invalid cleaning pattern {pattern:?}: {reason}")]
    Pattern { pattern: String, reason: String },

    /// Network error while fetching a page
    #[error("Failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    /// Non-2xx HTTP response
    #[error("HTTP error {status} for {url}")]
    Http { url: String, status: u16 },

    /// Output encoding failed
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration rejected by validation
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Nothing was processed successfully
    #[error("No documents were processed")]
    EmptyBatch,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CorpusError {
    pub(crate) fn extraction(
        format: DocumentFormat,
        source_id: &str,
        reason: impl ToString,
    ) -> Self {
        CorpusError::Extraction {
            format,
            source_id: source_id.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl From<serde_json::Error> for CorpusError {
    fn from(err: serde_json::Error) -> Self {
        CorpusError::Serialization(err.to_string())
    }
}

impl From<quick_xml::Error> for CorpusError {
    fn from(err: quick_xml::Error) -> Self {
        CorpusError::Serialization(err.to_string())
    }
}

impl From<zip::result::ZipError> for CorpusError {
    fn from(err: zip::result::ZipError) -> Self {
        CorpusError::Serialization(err.to_string())
    }
}

impl From<tempfile::PersistError> for CorpusError {
    fn from(err: tempfile::PersistError) -> Self {
        CorpusError::Io(err.error)
    }
}
