pub mod docx_parser;
pub mod epub_parser;
pub mod html_parser;
pub mod main_content;
pub mod metadata;
pub mod pdf_parser;
pub mod text_parser;
pub mod text_processor;

pub use docx_parser::extract_text_from_docx;
pub use epub_parser::extract_text_from_epub;
pub use html_parser::extract_text_from_html;
pub use metadata::{extract_metadata, is_valid_corpus_filename, DocumentMetadata};
pub use pdf_parser::extract_text_from_pdf;
pub use text_parser::extract_text_from_txt;
pub use text_processor::{clean_text, TextCleaner};

use crate::config::ExtractionOptions;
use crate::data::{DocumentFormat, RawDocument};
use crate::error::Result;

/// Run the extractor matching the document's format
pub fn extract_raw_text(doc: &RawDocument, options: &ExtractionOptions) -> Result<String> {
    match doc.format() {
        DocumentFormat::PlainText => extract_text_from_txt(doc, options),
        DocumentFormat::Docx => extract_text_from_docx(doc, options),
        DocumentFormat::Pdf => extract_text_from_pdf(doc, options),
        DocumentFormat::Html => extract_text_from_html(doc, options),
        DocumentFormat::Epub => extract_text_from_epub(doc, options),
    }
}
