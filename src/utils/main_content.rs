//! Main-article isolation for web pages

use scraper::{ElementRef, Html, Selector};

use crate::utils::html_parser::element_text;

/// Meta tag names searched for the author, first match wins
pub const AUTHOR_META_NAMES: [&str; 3] = ["author", "dc.creator", "dcterms.creator"];

const CANDIDATES: &str = "article, main, section, div";
const MIN_TEXT_CHARS: usize = 20;
const MAX_CANDIDATES: usize = 20_000;

const NON_CONTENT_TAGS: [&str; 9] = [
    "script", "style", "noscript", "nav", "header", "footer", "aside", "form", "template",
];

const BOILERPLATE_MARKERS: [&str; 14] = [
    "nav",
    "navbar",
    "menu",
    "sidebar",
    "footer",
    "header",
    "banner",
    "cookie",
    "consent",
    "ads",
    "advert",
    "promo",
    "subscribe",
    "newsletter",
];

/// Lowercased class and id tokens, split on whitespace, `-` and `_`
fn marker_tokens(el: &ElementRef<'_>) -> Vec<String> {
    let value = el.value();
    value
        .attr("class")
        .into_iter()
        .chain(value.attr("id"))
        .flat_map(|attr| attr.split(|c: char| c.is_whitespace() || c == '-' || c == '_'))
        .filter(|token| !token.is_empty())
        .map(|token| token.to_ascii_lowercase())
        .collect()
}

fn is_boilerplate_container(el: &ElementRef<'_>) -> bool {
    marker_tokens(el)
        .iter()
        .any(|token| BOILERPLATE_MARKERS.contains(&token.as_str()))
}

fn text_chars(el: &ElementRef<'_>) -> usize {
    element_text(*el, &NON_CONTENT_TAGS, " ").chars().count()
}

fn link_text_chars(el: &ElementRef<'_>, links: &Selector) -> usize {
    el.select(links)
        .map(|a| a.text().map(|t| t.chars().count()).sum::<usize>())
        .sum()
}

/// Text of the densest non-boilerplate block, preferring `article` and `main`.
/// Returns `None` when no block carries enough text.
pub fn extract_main_text(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let candidates = Selector::parse(CANDIDATES).ok()?;
    let links = Selector::parse("a").ok()?;

    let mut best_score: i64 = 0;
    let mut best: Option<ElementRef<'_>> = None;

    for el in document.select(&candidates).take(MAX_CANDIDATES) {
        if is_boilerplate_container(&el) {
            continue;
        }
        let txt = text_chars(&el);
        if txt < MIN_TEXT_CHARS {
            continue;
        }
        let link_txt = link_text_chars(&el, &links);

        let mut score = txt as i64 - 2 * link_txt as i64;
        match el.value().name() {
            "article" => score += 500,
            "main" => score += 300,
            _ => {}
        }
        if link_txt > txt / 2 {
            score -= 500;
        }
        if score > best_score {
            best_score = score;
            best = Some(el);
        }
    }

    best.map(|el| element_text(el, &NON_CONTENT_TAGS, "\n"))
        .filter(|text| !text.trim().is_empty())
}

/// Contents of `<title>`, trimmed
pub fn extract_title(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("title").ok()?;
    document
        .select(&selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|title| !title.is_empty())
}

/// Author from the first matching meta tag, in `AUTHOR_META_NAMES` order
pub fn extract_author(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("meta[name][content]").ok()?;
    let metas: Vec<(String, &str)> = document
        .select(&selector)
        .filter_map(|el| {
            let name = el.value().attr("name")?.trim().to_lowercase();
            let content = el.value().attr("content")?;
            Some((name, content))
        })
        .collect();

    AUTHOR_META_NAMES.iter().find_map(|wanted| {
        metas
            .iter()
            .find(|(name, content)| name == wanted && !content.trim().is_empty())
            .map(|(_, content)| content.trim().to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARTICLE_PAGE: &str = r#"
        <html>
        <head>
            <title> Daily News </title>
            <meta name="DC.creator" content="Second Choice">
            <meta name="author" content=" Jane Roe ">
        </head>
        <body>
            <div class="navbar"><a href="/">Home</a> <a href="/about">About us and more links</a></div>
            <article>
                <h1>Headline of the day</h1>
                <p>The main story body is long enough to win the scoring easily.</p>
                <script>track();</script>
            </article>
            <div id="footer">Copyright notice with plenty of characters in it</div>
        </body>
        </html>
    "#;

    #[test]
    fn test_picks_article_block() {
        let text = extract_main_text(ARTICLE_PAGE).unwrap();
        assert!(text.contains("Headline of the day"));
        assert!(text.contains("main story body"));
        assert!(!text.contains("About us"));
        assert!(!text.contains("Copyright"));
        assert!(!text.contains("track"));
    }

    #[test]
    fn test_boilerplate_markers_match_whole_tokens() {
        let page = r#"
            <html><body>
                <div class="site-nav">Home About Contact Archive Search Login</div>
                <div class="downloads threads canvas article-header">
                    <p>Forum threads about downloads are the real content of this page.</p>
                </div>
                <div id="cookie_consent">We use cookies to improve your experience here.</div>
            </body></html>
        "#;
        let text = extract_main_text(page).unwrap();
        assert!(text.contains("Forum threads"));
        assert!(!text.contains("Home About"));
        assert!(!text.contains("cookies"));
    }

    #[test]
    fn test_no_main_content() {
        assert_eq!(extract_main_text("<html><body><p>tiny</p></body></html>"), None);
    }

    #[test]
    fn test_title() {
        assert_eq!(extract_title(ARTICLE_PAGE), Some("Daily News".to_string()));
        assert_eq!(extract_title("<p>no title</p>"), None);
    }

    #[test]
    fn test_author_priority() {
        assert_eq!(extract_author(ARTICLE_PAGE), Some("Jane Roe".to_string()));

        let creator_only = r#"<head><meta name="dcterms.creator" content="C"><meta name="dc.creator" content="B"></head>"#;
        assert_eq!(extract_author(creator_only), Some("B".to_string()));
        assert_eq!(extract_author("<head></head>"), None);
    }
}
