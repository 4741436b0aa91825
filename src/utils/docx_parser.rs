use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{Cursor, Read};
use tracing::{debug, info};
use zip::ZipArchive;

use crate::config::ExtractionOptions;
use crate::data::{DocumentFormat, RawDocument};
use crate::error::{CorpusError, Result};

const DOCUMENT_PART: &str = "word/document.xml";

/// Paragraphs of `word/document.xml` in document order
fn parse_paragraphs(xml: &str) -> std::result::Result<Vec<String>, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs = Vec::new();
    // text boxes nest paragraphs inside runs
    let mut open: Vec<String> = Vec::new();
    let mut in_text = false;
    // tab stops in paragraph properties are also `w:tab`
    let mut run_depth = 0usize;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.name().as_ref() {
                b"w:p" => open.push(String::new()),
                b"w:r" => run_depth += 1,
                b"w:t" => in_text = true,
                _ => {}
            },
            Event::Empty(e) => {
                let ch = match e.name().as_ref() {
                    b"w:p" => {
                        paragraphs.push(String::new());
                        None
                    }
                    b"w:tab" if run_depth > 0 => Some('\t'),
                    b"w:br" | b"w:cr" if run_depth > 0 => Some('\n'),
                    _ => None,
                };
                if let (Some(ch), Some(current)) = (ch, open.last_mut()) {
                    current.push(ch);
                }
            }
            Event::End(e) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:r" => run_depth = run_depth.saturating_sub(1),
                b"w:p" => {
                    if let Some(paragraph) = open.pop() {
                        paragraphs.push(paragraph);
                    }
                }
                _ => {}
            },
            Event::Text(t) if in_text => {
                let text = t.unescape()?;
                if let Some(current) = open.last_mut() {
                    current.push_str(&text);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs)
}

/// Extract DOCX text. Paragraphs stand in for pages when skipping.
pub fn extract_text_from_docx(doc: &RawDocument, options: &ExtractionOptions) -> Result<String> {
    let fail = |reason: String| CorpusError::extraction(DocumentFormat::Docx, doc.source_id(), reason);

    let mut archive = ZipArchive::new(Cursor::new(doc.bytes())).map_err(|e| fail(e.to_string()))?;
    let mut xml = String::new();
    archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| fail(format!("{}: {}", DOCUMENT_PART, e)))?
        .read_to_string(&mut xml)
        .map_err(|e| fail(e.to_string()))?;

    let paragraphs = parse_paragraphs(&xml).map_err(|e| fail(e.to_string()))?;
    info!("Extracted {} paragraphs from DOCX {}", paragraphs.len(), doc.source_id());

    let kept = options.skip_pages.apply(&paragraphs);
    debug!("Keeping {} paragraphs after skip {:?}", kept.len(), options.skip_pages);

    Ok(kept.join("\n"))
}
