//! HTML text extraction

use scraper::{ElementRef, Html};
use tracing::debug;

use crate::config::ExtractionOptions;
use crate::data::RawDocument;
use crate::error::Result;

const ALWAYS_SKIPPED: [&str; 2] = ["script", "style"];

/// Tags whose subtrees are dropped before text extraction
pub fn skipped_tags(options: &ExtractionOptions) -> Vec<&'static str> {
    let mut tags = ALWAYS_SKIPPED.to_vec();
    if options.ignore_footnotes {
        tags.push("sup");
    }
    if options.ignore_links {
        tags.push("a");
    }
    tags
}

fn collect_text<'a>(element: ElementRef<'a>, skip: &[&str], out: &mut Vec<&'a str>) {
    for node in element.children() {
        if let Some(child) = ElementRef::wrap(node) {
            if skip.contains(&child.value().name()) {
                continue;
            }
            collect_text(child, skip, out);
        } else if let Some(text) = node.value().as_text() {
            if !text.trim().is_empty() {
                out.push(text);
            }
        }
    }
}

/// Text of every node under `root` except the skipped subtrees, joined by `separator`
pub fn element_text(root: ElementRef<'_>, skip: &[&str], separator: &str) -> String {
    let mut parts = Vec::new();
    collect_text(root, skip, &mut parts);
    parts.join(separator)
}

/// Reduce a markup fragment to its text, dropping scripts and styles
pub fn markup_to_text(markup: &str, separator: &str) -> String {
    let fragment = Html::parse_fragment(markup);
    element_text(fragment.root_element(), &ALWAYS_SKIPPED, separator)
}

/// Extract the text of an HTML document, one text node per line
pub fn extract_text_from_html(doc: &RawDocument, options: &ExtractionOptions) -> Result<String> {
    let markup = doc.text()?;
    let document = Html::parse_document(markup);
    let skip = skipped_tags(options);

    debug!("Extracting HTML {} (skipping {:?})", doc.source_id(), skip);

    Ok(element_text(document.root_element(), &skip, "\n"))
}
