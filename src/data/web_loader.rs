use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;
use tracing::{debug, error, info, info_span, warn};

use super::document::{CorpusBatch, CorpusUnit, LoadReport, SkippedDocument, SourceKind};
use crate::config::{Language, WebCleanOptions};
use crate::error::{CorpusError, Result};
use crate::utils::main_content::{extract_author, extract_main_text, extract_title};
use crate::utils::TextCleaner;

pub const DEFAULT_TITLE: &str = "No Title";
pub const DEFAULT_AUTHOR: &str = "Unknown Author";
pub const ERROR_TITLE: &str = "Error";
pub const ERROR_AUTHOR: &str = "Unknown";

/// Raw response handed back by a fetcher
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub url: String,
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
}

/// Given a URL, return the page or fail with a fetch error
pub trait PageFetcher {
    fn fetch(&self, url: &str) -> Result<FetchedPage>;
}

/// Blocking HTTP fetcher with a fixed request timeout
pub struct ReqwestFetcher {
    client: Client,
}

impl ReqwestFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("corpus-builder/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CorpusError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

fn fetch_error(url: &str, err: reqwest::Error) -> CorpusError {
    let reason = if err.is_timeout() {
        format!("request timed out ({})", err)
    } else {
        err.to_string()
    };
    CorpusError::Fetch {
        url: url.to_string(),
        reason,
    }
}

impl PageFetcher for ReqwestFetcher {
    fn fetch(&self, url: &str) -> Result<FetchedPage> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| fetch_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CorpusError::Http {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(String::from);
        let body = response.text().map_err(|e| fetch_error(url, e))?;

        Ok(FetchedPage {
            url: url.to_string(),
            status: status.as_u16(),
            content_type,
            body,
        })
    }
}

/// Fetches a page, isolates its article text and reads title/author
pub struct WebContentExtractor {
    fetcher: Box<dyn PageFetcher>,
    cleaner: TextCleaner,
    language: Language,
}

impl WebContentExtractor {
    pub fn new(
        fetcher: Box<dyn PageFetcher>,
        language: Language,
        options: &WebCleanOptions,
        custom_patterns: &[String],
    ) -> Result<Self> {
        let cleaner = TextCleaner::for_web(language, options, custom_patterns)?;
        debug!("Web cleaner runs {} passes", cleaner.pass_count());

        Ok(Self {
            fetcher,
            cleaner,
            language,
        })
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn try_extract(&self, url: &str) -> Result<CorpusUnit> {
        let page = self.fetcher.fetch(url)?;
        if let Some(content_type) = &page.content_type {
            if !content_type.contains("html") {
                debug!("Unexpected content type {} for {}", content_type, url);
            }
        }

        let content = extract_main_text(&page.body).unwrap_or_else(|| {
            warn!("No main content found at {}", url);
            String::new()
        });
        let title = extract_title(&page.body).unwrap_or_else(|| DEFAULT_TITLE.to_string());
        let author = extract_author(&page.body).unwrap_or_else(|| DEFAULT_AUTHOR.to_string());

        Ok(CorpusUnit::from_web(
            url,
            self.cleaner.clean(&title),
            self.cleaner.clean(&author),
            self.language,
            self.cleaner.clean(&content),
        ))
    }

    /// Like `try_extract`, but a failure yields an error placeholder unit
    pub fn extract(&self, url: &str) -> CorpusUnit {
        self.try_extract(url).unwrap_or_else(|e| {
            warn!("Using error placeholder for {}: {}", url, e);
            self.placeholder(url)
        })
    }

    pub fn placeholder(&self, url: &str) -> CorpusUnit {
        CorpusUnit::from_web(
            url,
            ERROR_TITLE.to_string(),
            ERROR_AUTHOR.to_string(),
            self.language,
            String::new(),
        )
    }
}

/// Builds a corpus batch from a list of URLs
pub struct WebCorpusLoader {
    extractor: WebContentExtractor,
    keep_failed: bool,
}

impl WebCorpusLoader {
    pub fn new(extractor: WebContentExtractor) -> Self {
        Self {
            extractor,
            keep_failed: true,
        }
    }

    /// Keep an error placeholder for each failed URL instead of dropping it
    pub fn keep_failed(mut self, keep: bool) -> Self {
        self.keep_failed = keep;
        self
    }

    /// Fetch every URL in order. Fails only when no page was extracted.
    pub fn load_urls(&self, urls: &[String]) -> Result<LoadReport> {
        info!("Loading {} web pages", urls.len());

        let mut report = LoadReport::new(CorpusBatch::new(SourceKind::Web));

        for (idx, url) in urls.iter().enumerate() {
            let _span = info_span!("page", url = %url).entered();
            info!("Fetching {}/{}: {}", idx + 1, urls.len(), url);

            match self.extractor.try_extract(url) {
                Ok(unit) => {
                    report.batch.push(unit);
                    report.processed.push(url.clone());
                }
                Err(e) => {
                    if self.keep_failed {
                        warn!("Failed to extract {}: {}; keeping placeholder", url, e);
                        report.batch.push(self.extractor.placeholder(url));
                    } else {
                        error!("Failed to extract {}: {}", url, e);
                    }
                    report.skipped.push(SkippedDocument {
                        source: url.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        if report.processed.is_empty() {
            error!("No web pages were extracted");
            return Err(CorpusError::EmptyBatch);
        }

        info!(
            "Extracted {} pages, failed {}",
            report.processed.len(),
            report.skipped.len()
        );

        Ok(report)
    }
}
