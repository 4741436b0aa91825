use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

use crate::config::Language;
use crate::error::{CorpusError, Result};
use crate::utils::metadata::DocumentMetadata;

/// Supported source document formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentFormat {
    PlainText,
    Docx,
    Pdf,
    Html,
    Epub,
}

impl DocumentFormat {
    /// Detect the format from a file extension (case-insensitive)
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "txt" => Some(DocumentFormat::PlainText),
            "docx" => Some(DocumentFormat::Docx),
            "pdf" => Some(DocumentFormat::Pdf),
            "html" | "htm" => Some(DocumentFormat::Html),
            "epub" => Some(DocumentFormat::Epub),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DocumentFormat::PlainText => "TXT",
            DocumentFormat::Docx => "DOCX",
            DocumentFormat::Pdf => "PDF",
            DocumentFormat::Html => "HTML",
            DocumentFormat::Epub => "EPUB",
        };
        f.write_str(name)
    }
}

/// A source document as read from disk, before extraction
#[derive(Debug, Clone)]
pub struct RawDocument {
    format: DocumentFormat,
    source_id: String,
    bytes: Vec<u8>,
}

impl RawDocument {
    pub fn new(format: DocumentFormat, source_id: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            format,
            source_id: source_id.into(),
            bytes,
        }
    }

    /// Read a document from disk; the file name becomes the source identifier.
    pub fn from_path(path: &Path) -> Result<Self> {
        let format = DocumentFormat::from_path(path).ok_or_else(|| {
            CorpusError::UnsupportedFormat(path.to_string_lossy().into_owned())
        })?;
        let bytes = fs::read(path)?;
        let source_id = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());

        Ok(Self::new(format, source_id, bytes))
    }

    pub fn format(&self) -> DocumentFormat {
        self.format
    }

    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Decode the bytes as UTF-8 text
    pub fn text(&self) -> Result<&str> {
        std::str::from_utf8(&self.bytes).map_err(|_| CorpusError::Decode(self.source_id.clone()))
    }
}

/// Where a corpus unit came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    File,
    Web,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::File => f.write_str("file"),
            SourceKind::Web => f.write_str("web"),
        }
    }
}

/// One normalized corpus record
#[derive(Debug, Clone, PartialEq)]
pub struct CorpusUnit {
    pub title: String,
    pub author: String,
    /// Canonical language name, not the short code
    pub language: String,
    pub body: String,
    pub source: SourceKind,
    pub url: Option<String>,
}

impl CorpusUnit {
    pub fn from_file(metadata: DocumentMetadata, language: Language, body: String) -> Self {
        Self {
            title: metadata.title,
            author: metadata.author,
            language: language.name().to_string(),
            body,
            source: SourceKind::File,
            url: None,
        }
    }

    pub fn from_web(
        url: impl Into<String>,
        title: String,
        author: String,
        language: Language,
        body: String,
    ) -> Self {
        Self {
            title,
            author,
            language: language.name().to_string(),
            body,
            source: SourceKind::Web,
            url: Some(url.into()),
        }
    }
}

/// Ordered collection of units built during a single run
#[derive(Debug, Clone)]
pub struct CorpusBatch {
    kind: SourceKind,
    units: Vec<CorpusUnit>,
}

impl CorpusBatch {
    pub fn new(kind: SourceKind) -> Self {
        Self {
            kind,
            units: Vec::new(),
        }
    }

    pub fn push(&mut self, unit: CorpusUnit) {
        self.units.push(unit);
    }

    pub fn kind(&self) -> SourceKind {
        self.kind
    }

    pub fn units(&self) -> &[CorpusUnit] {
        &self.units
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

/// A document or page left out of the batch, and why
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedDocument {
    /// File name or URL
    pub source: String,
    pub reason: String,
}

/// Outcome of a pipeline run
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub batch: CorpusBatch,
    pub processed: Vec<String>,
    pub skipped: Vec<SkippedDocument>,
}

impl LoadReport {
    pub fn new(batch: CorpusBatch) -> Self {
        Self {
            batch,
            processed: Vec::new(),
            skipped: Vec::new(),
        }
    }
}
