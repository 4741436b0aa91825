use epub::doc::EpubDoc;
use regex::Regex;
use scraper::Html;
use std::io::Cursor;
use tracing::{debug, info};

use crate::config::ExtractionOptions;
use crate::data::{DocumentFormat, RawDocument};
use crate::error::{CorpusError, Result};
use crate::utils::html_parser::element_text;

const FOOTNOTE_BLOCKS: [&str; 2] = [
    r"(?s)<epub:footnote.*?</epub:footnote>",
    r#"(?s)<aside\b[^>]*epub:type\s*=\s*["'](?:footnote|endnote|rearnote)s?["'][^>]*>.*?</aside>"#,
];
const LINK_BLOCK: &str = r"(?s)<a\s[^>]*?href=.*?</a>";

/// Remove footnote and link blocks from raw item markup
pub fn strip_markup_blocks(markup: &str, options: &ExtractionOptions) -> Result<String> {
    let mut patterns: Vec<&str> = Vec::new();
    if options.ignore_footnotes {
        patterns.extend(FOOTNOTE_BLOCKS);
    }
    if options.ignore_links {
        patterns.push(LINK_BLOCK);
    }

    let mut markup = markup.to_string();
    for pattern in patterns {
        let re = Regex::new(pattern).map_err(|e| CorpusError::Pattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
        markup = re.replace_all(&markup, " ").into_owned();
    }
    Ok(markup)
}

fn item_text(markup: &str) -> String {
    let document = Html::parse_document(markup);
    element_text(document.root_element(), &["script", "style"], "\n")
}

/// Extract the text of every document item, in reading order.
/// Skip counts do not apply to EPUB.
pub fn extract_text_from_epub(doc: &RawDocument, options: &ExtractionOptions) -> Result<String> {
    let mut book = EpubDoc::from_reader(Cursor::new(doc.bytes().to_vec())).map_err(|e| {
        CorpusError::extraction(DocumentFormat::Epub, doc.source_id(), format!("{:?}", e))
    })?;

    let spine_len = book.spine.len();
    let mut raw_text = String::new();
    let mut items = 0;

    for i in 0..spine_len {
        book.set_current_page(i);

        if let Some((markup, mime)) = book.get_current_str() {
            if !mime.contains("html") {
                debug!("Skipping non-document spine item {} ({})", i, mime);
                continue;
            }
            let markup = strip_markup_blocks(&markup, options)?;
            raw_text.push_str(&item_text(&markup));
            raw_text.push('\n');
            items += 1;
        }
    }

    info!("Extracted {} document items from EPUB {}", items, doc.source_id());

    Ok(raw_text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::{CompressionMethod, ZipWriter};

    const CONTAINER: &str = r#"<?xml version="1.0"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles>
    <rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/>
  </rootfiles>
</container>"#;

    const OPF: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<package xmlns="http://www.idpf.org/2007/opf" version="2.0" unique-identifier="bookid">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/">
    <dc:title>Test</dc:title>
    <dc:identifier id="bookid">test-book</dc:identifier>
    <dc:language>tg</dc:language>
  </metadata>
  <manifest>
    <item id="ncx" href="toc.ncx" media-type="application/x-dtbncx+xml"/>
    <item id="ch1" href="ch1.xhtml" media-type="application/xhtml+xml"/>
    <item id="ch2" href="ch2.xhtml" media-type="application/xhtml+xml"/>
  </manifest>
  <spine toc="ncx">
    <itemref idref="ch1"/>
    <itemref idref="ch2"/>
  </spine>
</package>"#;

    const NCX: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ncx xmlns="http://www.daisy.org/z3986/2005/ncx/" version="2005-1">
  <head><meta name="dtb:uid" content="test-book"/></head>
  <docTitle><text>Test</text></docTitle>
  <navMap>
    <navPoint id="p1" playOrder="1">
      <navLabel><text>One</text></navLabel>
      <content src="ch1.xhtml"/>
    </navPoint>
  </navMap>
</ncx>"#;

    const CH1: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<html xmlns="http://www.w3.org/1999/xhtml" xmlns:epub="http://www.idpf.org/2007/ops">
<head><title>One</title></head>
<body>
  <p>Аввал матн<epub:footnote>эзоҳи пинҳон</epub:footnote></p>
  <p>Бинед <a href="https://example.com">истинод</a> инҷо</p>
</body>
</html>"#;

    const CH2: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<html xmlns="http://www.w3.org/1999/xhtml">
<head><title>Two</title></head>
<body><p>Дуюм матн</p></body>
</html>"#;

    fn epub_bytes() -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        let files = [
            ("mimetype", "application/epub+zip"),
            ("META-INF/container.xml", CONTAINER),
            ("OEBPS/content.opf", OPF),
            ("OEBPS/toc.ncx", NCX),
            ("OEBPS/ch1.xhtml", CH1),
            ("OEBPS/ch2.xhtml", CH2),
        ];
        for (name, content) in files {
            writer.start_file(name, stored).unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_strip_markup_blocks() {
        let markup = r#"<p>Text<epub:footnote id="f1">note</epub:footnote> and <a href="x.html">link</a>.</p><aside epub:type="footnote"><p>aside note</p></aside>"#;

        let stripped = strip_markup_blocks(markup, &ExtractionOptions::default()).unwrap();
        assert!(!stripped.contains("note"));
        assert!(!stripped.contains("link"));
        assert!(stripped.contains("Text"));

        let options = ExtractionOptions {
            ignore_footnotes: false,
            ignore_links: false,
            ..ExtractionOptions::default()
        };
        assert_eq!(strip_markup_blocks(markup, &options).unwrap(), markup);
    }

    #[test]
    fn test_extracts_items_in_reading_order() {
        let doc = RawDocument::new(DocumentFormat::Epub, "Китоб_Муаллиф.epub", epub_bytes());
        let text = extract_text_from_epub(&doc, &ExtractionOptions::default()).unwrap();

        let first = text.find("Аввал матн").unwrap();
        let second = text.find("Дуюм матн").unwrap();
        assert!(first < second);
        assert!(text.contains("инҷо"));
        assert!(!text.contains("эзоҳи пинҳон"));
        assert!(!text.contains("истинод"));
    }

    #[test]
    fn test_not_an_epub() {
        let doc = RawDocument::new(DocumentFormat::Epub, "A_B.epub", b"garbage".to_vec());
        assert!(matches!(
            extract_text_from_epub(&doc, &ExtractionOptions::default()),
            Err(CorpusError::Extraction { format: DocumentFormat::Epub, .. })
        ));
    }
}
