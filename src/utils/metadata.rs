use std::path::Path;

/// Author used when the filename carries no author part
pub const UNKNOWN_AUTHOR: &str = "Unknown";

/// Title and author derived from a `Title_Author.ext` filename
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentMetadata {
    pub title: String,
    pub author: String,
}

fn file_stem(filename: &str) -> &str {
    Path::new(filename)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(filename)
}

/// Split the filename stem on its first underscore into title and author.
pub fn extract_metadata(filename: &str) -> DocumentMetadata {
    let stem = file_stem(filename);

    match stem.split_once('_') {
        Some((title, author)) => DocumentMetadata {
            title: title.trim().to_string(),
            author: author.trim().to_string(),
        },
        None => DocumentMetadata {
            title: stem.trim().to_string(),
            author: UNKNOWN_AUTHOR.to_string(),
        },
    }
}

/// Files without a title/author separator are left out of the corpus.
pub fn is_valid_corpus_filename(filename: &str) -> bool {
    file_stem(filename).contains('_')
}
