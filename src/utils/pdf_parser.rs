use std::ops::Range;
use std::panic;
use tracing::{info, warn};

use crate::config::{ExtractionOptions, SkipPages};
use crate::data::{DocumentFormat, RawDocument};
use crate::error::{CorpusError, Result};

/// Per-page text of a PDF
#[derive(Debug, Clone)]
pub struct PdfContent {
    pub pages: Vec<String>,
}

impl PdfContent {
    pub fn has_text(&self) -> bool {
        self.pages.iter().any(|page| !page.trim().is_empty())
    }
}

/// Pages kept after skipping. Never inverted, and never empty for a
/// non-empty document: at least one page survives any skip counts.
pub fn page_range(total: usize, skip: SkipPages) -> Range<usize> {
    if total == 0 {
        return 0..0;
    }
    let start = skip.head.min(total - 1);
    let end = total.saturating_sub(skip.tail).max(start + 1);
    start..end
}

/// Split a PDF into per-page text
pub fn read_pdf_pages(doc: &RawDocument) -> Result<PdfContent> {
    let bytes = doc.bytes();

    // pdf-extract panics on some malformed files
    let pages = panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(bytes))
        .map_err(|_| {
            CorpusError::extraction(DocumentFormat::Pdf, doc.source_id(), "PDF parser panicked")
        })?
        .map_err(|e| {
            CorpusError::extraction(DocumentFormat::Pdf, doc.source_id(), format!("{:?}", e))
        })?;

    let content = PdfContent { pages };
    if !content.has_text() {
        warn!("PDF appears to be scanned or has no extractable text: {}", doc.source_id());
    }

    Ok(content)
}

/// Extract text from a PDF, dropping the configured leading and trailing pages
pub fn extract_text_from_pdf(doc: &RawDocument, options: &ExtractionOptions) -> Result<String> {
    let content = read_pdf_pages(doc)?;
    let total = content.pages.len();
    let range = page_range(total, options.skip_pages);

    info!("Extracting pages {:?} of {} from PDF {}", range, total, doc.source_id());

    Ok(content.pages[range].join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_range_guard() {
        // 5 pages, skip (3, 3): the naive range 3..2 would be inverted
        let range = page_range(5, SkipPages::new(3, 3));
        assert_eq!(range, 3..4);
        assert!(range.start < range.end && range.end <= 5);
    }

    #[test]
    fn test_page_range_regular() {
        assert_eq!(page_range(10, SkipPages::new(2, 3)), 2..7);
        assert_eq!(page_range(10, SkipPages::none()), 0..10);
    }

    #[test]
    fn test_page_range_head_beyond_document() {
        assert_eq!(page_range(4, SkipPages::new(10, 0)), 3..4);
        assert_eq!(page_range(1, SkipPages::new(3, 3)), 0..1);
        assert_eq!(page_range(0, SkipPages::new(3, 3)), 0..0);
    }

    #[test]
    fn test_page_range_always_in_bounds() {
        for total in 1..8 {
            for head in 0..10 {
                for tail in 0..10 {
                    let range = page_range(total, SkipPages::new(head, tail));
                    assert!(range.start < range.end, "{total} {head} {tail}");
                    assert!(range.end <= total, "{total} {head} {tail}");
                }
            }
        }
    }

    /// Minimal PDF with one Helvetica line per page
    fn pdf_bytes(pages: &[&str]) -> Vec<u8> {
        let font_id = 3 + 2 * pages.len();
        let kids: Vec<String> = (0..pages.len()).map(|i| format!("{} 0 R", 3 + 2 * i)).collect();

        let mut objects = vec![
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            format!("<< /Type /Pages /Kids [{}] /Count {} >>", kids.join(" "), pages.len()),
        ];
        for (i, text) in pages.iter().enumerate() {
            let content = format!("BT /F1 24 Tf 72 700 Td ({}) Tj ET", text);
            objects.push(format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Resources << /Font << /F1 {} 0 R >> >> /Contents {} 0 R >>",
                font_id,
                4 + 2 * i
            ));
            objects.push(format!(
                "<< /Length {} >>\nstream\n{}\nendstream",
                content.len(),
                content
            ));
        }
        objects.push(
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
                .to_string(),
        );

        let mut out = String::from("%PDF-1.4\n");
        let mut offsets = Vec::with_capacity(objects.len());
        for (i, body) in objects.iter().enumerate() {
            offsets.push(out.len());
            out.push_str(&format!("{} 0 obj\n{}\nendobj\n", i + 1, body));
        }

        let xref_offset = out.len();
        out.push_str(&format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1));
        for offset in offsets {
            out.push_str(&format!("{:010} 00000 n \n", offset));
        }
        out.push_str(&format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            xref_offset
        ));
        out.into_bytes()
    }

    #[test]
    fn test_reads_pages_and_applies_skip() {
        let doc = RawDocument::new(
            DocumentFormat::Pdf,
            "Book_Author.pdf",
            pdf_bytes(&["Alpha", "Beta", "Gamma"]),
        );

        let content = read_pdf_pages(&doc).unwrap();
        assert_eq!(content.pages.len(), 3);
        assert!(content.has_text());

        let options = ExtractionOptions {
            skip_pages: SkipPages::new(1, 1),
            ..ExtractionOptions::default()
        };
        let text = extract_text_from_pdf(&doc, &options).unwrap();
        assert!(text.contains("Beta"));
        assert!(!text.contains("Alpha"));
        assert!(!text.contains("Gamma"));

        // skip counts covering the document still keep one page
        let text = extract_text_from_pdf(&doc, &ExtractionOptions::default()).unwrap();
        assert!(text.contains("Gamma"));
        assert!(!text.contains("Beta"));
    }

    #[test]
    fn test_malformed_pdf_is_an_error() {
        let doc = RawDocument::new(DocumentFormat::Pdf, "Bad_Doc.pdf", b"not a pdf".to_vec());
        let result = extract_text_from_pdf(&doc, &ExtractionOptions::default());
        assert!(matches!(
            result,
            Err(CorpusError::Extraction { format: DocumentFormat::Pdf, .. })
        ));
    }
}
