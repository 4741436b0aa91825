mod book_loader;
pub mod document;
mod web_loader;

pub use book_loader::BookCorpusLoader;
pub use document::{
    CorpusBatch, CorpusUnit, DocumentFormat, LoadReport, RawDocument, SkippedDocument, SourceKind,
};
pub use web_loader::{
    FetchedPage, PageFetcher, ReqwestFetcher, WebContentExtractor, WebCorpusLoader,
};
