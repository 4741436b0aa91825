// Library exports for use in the CLI and other hosts

pub mod config;
pub mod data;
pub mod error;
pub mod export;
pub mod utils;

// Re-export commonly used types
pub use config::{CorpusConfig, ExtractionOptions, Language, OutputFormat, SkipPages};
pub use data::{BookCorpusLoader, CorpusBatch, CorpusUnit, WebContentExtractor, WebCorpusLoader};
pub use error::{CorpusError, Result};
pub use export::CorpusWriter;
