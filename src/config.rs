use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use tracing::warn;

use crate::error::{CorpusError, Result};

/// Language rules applied by the cleaner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Language {
    English,
    Russian,
    Tajik,
}

impl Language {
    /// Map a short language code to its rules; unknown codes fall back to English.
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_lowercase().as_str() {
            "ru" | "russian" => Language::Russian,
            "tg" | "tj" | "tajik" => Language::Tajik,
            _ => Language::English,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Russian => "ru",
            Language::Tajik => "tg",
        }
    }

    /// Canonical language name stored in corpus units
    pub fn name(&self) -> &'static str {
        match self {
            Language::English => "english",
            Language::Russian => "russian",
            Language::Tajik => "tajik",
        }
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::Russian
    }
}

impl From<String> for Language {
    fn from(code: String) -> Self {
        Language::from_code(&code)
    }
}

impl From<Language> for String {
    fn from(language: Language) -> Self {
        language.code().to_string()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Output encoding of the corpus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OutputFormat {
    Txt,
    Json,
    Xml,
    /// Archive holding the txt, json and xml artifacts
    Zip,
}

impl OutputFormat {
    /// Parse a format name; unrecognized values fall back to `txt`.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "txt" => OutputFormat::Txt,
            "json" => OutputFormat::Json,
            "xml" => OutputFormat::Xml,
            "zip" => OutputFormat::Zip,
            other => {
                warn!("Unknown output format {:?}, falling back to txt", other);
                OutputFormat::Txt
            }
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Txt => "txt",
            OutputFormat::Json => "json",
            OutputFormat::Xml => "xml",
            OutputFormat::Zip => "zip",
        }
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        OutputFormat::Txt
    }
}

impl From<String> for OutputFormat {
    fn from(value: String) -> Self {
        OutputFormat::parse(&value)
    }
}

impl From<OutputFormat> for String {
    fn from(format: OutputFormat) -> Self {
        format.extension().to_string()
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Leading and trailing structural units (lines, paragraphs or pages) to drop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(usize, usize)", into = "(usize, usize)")]
pub struct SkipPages {
    pub head: usize,
    pub tail: usize,
}

impl SkipPages {
    pub fn new(head: usize, tail: usize) -> Self {
        Self { head, tail }
    }

    pub fn none() -> Self {
        Self::new(0, 0)
    }

    /// Apply the skip counts to a list of units. Yields an empty slice when
    /// the counts cover every unit.
    pub fn apply<'a, T>(&self, units: &'a [T]) -> &'a [T] {
        let start = self.head.min(units.len());
        let end = units.len().saturating_sub(self.tail).max(start);
        &units[start..end]
    }
}

impl Default for SkipPages {
    fn default() -> Self {
        Self::new(3, 3)
    }
}

impl From<(usize, usize)> for SkipPages {
    fn from((head, tail): (usize, usize)) -> Self {
        Self::new(head, tail)
    }
}

impl From<SkipPages> for (usize, usize) {
    fn from(skip: SkipPages) -> Self {
        (skip.head, skip.tail)
    }
}

/// Options shared by every format extractor and the document cleaner
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionOptions {
    pub skip_pages: SkipPages,
    pub ignore_footnotes: bool,
    pub ignore_links: bool,
    pub strip_digits: bool,
    pub language: Language,
    /// Appended after the built-in cleaning patterns, in order
    pub custom_patterns: Vec<String>,
}

impl Default for ExtractionOptions {
    fn default() -> Self {
        Self {
            skip_pages: SkipPages::default(),
            ignore_footnotes: true,
            ignore_links: true,
            strip_digits: true,
            language: Language::default(),
            custom_patterns: Vec::new(),
        }
    }
}

/// Switches of the web cleaner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebCleanOptions {
    pub clean_html: bool,
    pub remove_extra_spaces: bool,
    pub normalize_punctuation: bool,
}

impl Default for WebCleanOptions {
    fn default() -> Self {
        Self {
            clean_html: true,
            remove_extra_spaces: true,
            normalize_punctuation: true,
        }
    }
}

/// A remote source handed to the web pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SourceDescriptor {
    Web { url: String },
}

pub const DEFAULT_BOOKS_OUTPUT_BASE: &str = "Corpus_Books";
pub const DEFAULT_WEB_OUTPUT_BASE: &str = "news_corpus";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusConfig {
    pub books_folder: Option<PathBuf>,
    pub sources: Vec<SourceDescriptor>,
    pub recursive: bool,

    // Output
    pub output_base: String,
    pub output_format: OutputFormat,
    #[serde(alias = "rootPath")]
    pub output_dir: Option<PathBuf>,
    pub encoding: String,

    // Cleaning
    pub language: Language,
    pub skip_pages: SkipPages,
    pub ignore_footnotes: bool,
    pub ignore_links: bool,
    pub strip_digits: bool,
    pub custom_patterns: Vec<String>,

    // Web
    pub fetch_timeout_secs: u64,
    pub keep_failed_pages: bool,
    pub web_cleaning: WebCleanOptions,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            books_folder: None,
            sources: Vec::new(),
            recursive: false,
            output_base: DEFAULT_BOOKS_OUTPUT_BASE.to_string(),
            output_format: OutputFormat::default(),
            output_dir: None,
            encoding: "utf-8".to_string(),
            language: Language::default(),
            skip_pages: SkipPages::default(),
            ignore_footnotes: true,
            ignore_links: true,
            strip_digits: true,
            custom_patterns: Vec::new(),
            fetch_timeout_secs: 10,
            keep_failed_pages: true,
            web_cleaning: WebCleanOptions::default(),
        }
    }
}

impl CorpusConfig {
    pub fn validate(&self) -> Result<()> {
        if self.output_base.trim().is_empty() {
            return Err(CorpusError::Config("output_base must not be empty".into()));
        }
        if self.fetch_timeout_secs == 0 {
            return Err(CorpusError::Config("fetch_timeout_secs must be > 0".into()));
        }
        let encoding = self.encoding.trim().to_lowercase().replace('_', "-");
        if encoding != "utf-8" && encoding != "utf8" {
            return Err(CorpusError::Config(format!(
                "unsupported output encoding {:?} (only utf-8 is produced)",
                self.encoding
            )));
        }
        Ok(())
    }

    pub fn extraction_options(&self) -> ExtractionOptions {
        ExtractionOptions {
            skip_pages: self.skip_pages,
            ignore_footnotes: self.ignore_footnotes,
            ignore_links: self.ignore_links,
            strip_digits: self.strip_digits,
            language: self.language,
            custom_patterns: self.custom_patterns.clone(),
        }
    }

    /// URLs of all web sources, in order
    pub fn web_urls(&self) -> Vec<String> {
        self.sources
            .iter()
            .map(|source| match source {
                SourceDescriptor::Web { url } => url.clone(),
            })
            .collect()
    }
}

impl fmt::Display for CorpusConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_codes() {
        assert_eq!(Language::from_code("ru").name(), "russian");
        assert_eq!(Language::from_code("EN").name(), "english");
        assert_eq!(Language::from_code("tg"), Language::Tajik);
        assert_eq!(Language::from_code("tj"), Language::Tajik);
        assert_eq!(Language::from_code("fr"), Language::English);
    }

    #[test]
    fn test_unknown_format_falls_back_to_txt() {
        assert_eq!(OutputFormat::parse("ZIP"), OutputFormat::Zip);
        assert_eq!(OutputFormat::parse("rtf"), OutputFormat::Txt);
    }

    #[test]
    fn test_skip_pages_apply() {
        let lines = ["a", "b", "c", "d", "e"];
        assert_eq!(SkipPages::new(1, 1).apply(&lines), &["b", "c", "d"]);
        assert_eq!(SkipPages::new(0, 0).apply(&lines), &lines);
        assert!(SkipPages::new(3, 3).apply(&lines).is_empty());
        assert!(SkipPages::new(0, 10).apply(&lines).is_empty());
        assert!(SkipPages::new(10, 0).apply(&lines).is_empty());
    }

    #[test]
    fn test_config_from_json() {
        let json = r#"{
            "books_folder": "books",
            "output_format": "json",
            "language": "tg",
            "skip_pages": [0, 2],
            "rootPath": "/srv/out",
            "sources": [{"type": "web", "url": "https://example.com"}]
        }"#;
        let config: CorpusConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.output_format, OutputFormat::Json);
        assert_eq!(config.language, Language::Tajik);
        assert_eq!(config.skip_pages, SkipPages::new(0, 2));
        assert_eq!(config.output_dir, Some(PathBuf::from("/srv/out")));
        assert_eq!(config.web_urls(), vec!["https://example.com".to_string()]);
        assert!(config.ignore_footnotes);
        assert_eq!(config.output_base, DEFAULT_BOOKS_OUTPUT_BASE);
        config.validate().unwrap();
    }

    #[test]
    fn test_validate_rejects_other_encodings() {
        let config = CorpusConfig {
            encoding: "cp1251".into(),
            ..CorpusConfig::default()
        };
        assert!(matches!(config.validate(), Err(CorpusError::Config(_))));
    }
}
