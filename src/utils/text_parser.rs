use crate::config::ExtractionOptions;
use crate::data::RawDocument;
use crate::error::Result;

/// Extract plain text, dropping the configured leading and trailing lines
pub fn extract_text_from_txt(doc: &RawDocument, options: &ExtractionOptions) -> Result<String> {
    let text = doc.text()?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    // keep line endings so the kept lines join back unchanged
    let lines: Vec<&str> = text.split_inclusive('\n').collect();

    Ok(options.skip_pages.apply(&lines).concat())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SkipPages;
    use crate::data::DocumentFormat;

    fn txt(content: &str) -> RawDocument {
        RawDocument::new(DocumentFormat::PlainText, "Book_Author.txt", content.as_bytes().to_vec())
    }

    fn skipping(head: usize, tail: usize) -> ExtractionOptions {
        ExtractionOptions {
            skip_pages: SkipPages::new(head, tail),
            ..ExtractionOptions::default()
        }
    }

    #[test]
    fn test_skips_head_and_tail_lines() {
        let doc = txt("cover\nline one\nline two\nline three\ncolophon\n");
        let text = extract_text_from_txt(&doc, &skipping(1, 1)).unwrap();
        assert_eq!(text, "line one\nline two\nline three\n");
    }

    #[test]
    fn test_no_skip_keeps_everything() {
        let doc = txt("a\nb");
        assert_eq!(extract_text_from_txt(&doc, &skipping(0, 0)).unwrap(), "a\nb");
    }

    #[test]
    fn test_tail_beyond_length_yields_empty() {
        let doc = txt("a\nb\nc\n");
        assert_eq!(extract_text_from_txt(&doc, &skipping(0, 10)).unwrap(), "");
        assert_eq!(extract_text_from_txt(&doc, &skipping(2, 2)).unwrap(), "");
    }

    #[test]
    fn test_strips_byte_order_mark() {
        let doc = txt("\u{feff}Салом\n");
        assert_eq!(extract_text_from_txt(&doc, &skipping(0, 0)).unwrap(), "Салом\n");
    }
}
