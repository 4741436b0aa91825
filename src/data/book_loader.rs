use std::path::{Path, PathBuf};
use tracing::{debug, error, info, info_span, warn};
use walkdir::WalkDir;

use super::document::{
    CorpusBatch, CorpusUnit, DocumentFormat, LoadReport, RawDocument, SkippedDocument, SourceKind,
};
use crate::config::ExtractionOptions;
use crate::error::{CorpusError, Result};
use crate::utils::{extract_metadata, extract_raw_text, is_valid_corpus_filename, TextCleaner};

/// Builds a corpus batch from a directory of books
pub struct BookCorpusLoader {
    options: ExtractionOptions,
    cleaner: TextCleaner,
    recursive: bool,
}

impl BookCorpusLoader {
    pub fn new(options: ExtractionOptions) -> Result<Self> {
        let cleaner = TextCleaner::for_documents(&options)?;
        debug!("Document cleaner runs {} passes", cleaner.pass_count());

        Ok(Self {
            options,
            cleaner,
            recursive: false,
        })
    }

    /// Also descend into subdirectories
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn options(&self) -> &ExtractionOptions {
        &self.options
    }

    /// Supported files under `dir`, in file-name order
    pub fn discover(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        if !dir.is_dir() {
            return Err(CorpusError::MissingSource(dir.to_path_buf()));
        }

        let max_depth = if self.recursive { usize::MAX } else { 1 };
        let files = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(max_depth)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("Skipping unreadable entry under {:?}: {}", dir, e);
                    None
                }
            })
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .filter(|path| DocumentFormat::from_path(path).is_some())
            .collect();

        Ok(files)
    }

    /// Extract, clean and label one document
    pub fn process_document(&self, doc: &RawDocument) -> Result<CorpusUnit> {
        let raw_text = extract_raw_text(doc, &self.options)?;
        let body = self.cleaner.clean(&raw_text);
        if body.is_empty() {
            warn!("No text left after cleaning {}", doc.source_id());
        }

        let metadata = extract_metadata(doc.source_id());
        Ok(CorpusUnit::from_file(metadata, self.options.language, body))
    }

    pub fn process_file(&self, path: &Path) -> Result<CorpusUnit> {
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        if !is_valid_corpus_filename(&filename) {
            return Err(CorpusError::InvalidFilename(filename));
        }

        let doc = RawDocument::from_path(path)?;
        self.process_document(&doc)
    }

    /// Process every supported file in `dir`. Failed documents are skipped;
    /// the run fails only when nothing was processed.
    pub fn load_directory(&self, dir: &Path) -> Result<LoadReport> {
        info!("Loading books from directory: {:?}", dir);

        let files = self.discover(dir).map_err(|e| {
            error!("{}", e);
            e
        })?;
        info!("Found {} book files", files.len());

        let mut report = LoadReport::new(CorpusBatch::new(SourceKind::File));

        for (idx, path) in files.iter().enumerate() {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.to_string_lossy().into_owned());
            let _span = info_span!("book", file = %name).entered();

            info!("Processing {}/{}: {}", idx + 1, files.len(), name);

            match self.process_file(path) {
                Ok(unit) => {
                    report.batch.push(unit);
                    report.processed.push(name);
                }
                Err(e) => {
                    match &e {
                        CorpusError::InvalidFilename(_) => warn!("Skipping invalid filename: {}", name),
                        _ => error!("Failed to process {}: {}", name, e),
                    }
                    report.skipped.push(SkippedDocument {
                        source: name,
                        reason: e.to_string(),
                    });
                }
            }
        }

        if report.batch.is_empty() {
            error!("No books were processed in {:?}", dir);
            return Err(CorpusError::EmptyBatch);
        }

        info!(
            "Processed {} books, skipped {}",
            report.processed.len(),
            report.skipped.len()
        );

        Ok(report)
    }
}
