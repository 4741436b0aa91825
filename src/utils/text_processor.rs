use regex::Regex;

use crate::config::{ExtractionOptions, Language, WebCleanOptions};
use crate::error::{CorpusError, Result};
use crate::utils::html_parser::markup_to_text;

/// Legacy code points and the Tajik letters they stand for
pub const LETTER_REMAP: [(char, char); 12] = [
    ('љ', 'ҷ'),
    ('ї', 'ӣ'),
    ('њ', 'ҳ'),
    ('ќ', 'қ'),
    ('ў', 'ӯ'),
    ('ѓ', 'ғ'),
    ('Љ', 'Ҷ'),
    ('Ї', 'Ӣ'),
    ('Њ', 'Ҳ'),
    ('Ќ', 'Қ'),
    ('Ў', 'Ӯ'),
    ('Ѓ', 'Ғ'),
];

const TAJIK_EXTRA_LETTERS: &str = "ҒғӢӣҚқӮӯҲҳҶҷ";

const PAGE_NUMBER_LINE: &str = r"(?m)^[^\S\n]*\d+[^\S\n]*$";
const HORIZONTAL_WHITESPACE: &str = r"[^\S\n]+";
const BLANK_LINES: &str = r"\n(?:[^\S\n]*\n)+";
const ANY_WHITESPACE: &str = r"\s+";
const TABS: &str = r"\t+";
const DOT_RUNS: &str = r"\.{2,}";
const HTML_TAG: &str = r"<.*?>";

const FOOTNOTE_PATTERNS: [&str; 5] = [
    // [1], [2]
    r"\[\d+\]",
    // ^1, ^note
    r"\^[a-zA-Z0-9]+",
    // "1. И-Зи кирдори бад бо љањон."
    r"(?m)^[^\S\n]*\d+\.[^\S\n]*(?:[А-ЯЁA-Za-z-]+\.)?.*$",
    // "6. И-б. 1331 нест."
    r"(?m)^[^\S\n]*\d+\.[^\S\n]*[А-ЯЁA-Za-z-]+\.[^\S\n]*\d+[^\S\n]+.*$",
    r"(?m)^[^\S\n]*\d+\..*$",
];

const LINK_PATTERNS: [&str; 2] = [
    r"https?://(?:[a-zA-Z]|[0-9]|[$-_@.&+]|[!*\(\),]|(?:%[0-9a-fA-F][0-9a-fA-F]))+",
    r"www\.[a-zA-Z0-9-]+\.[a-zA-Z]{2,}",
];

const PUNCTUATION_RUNS: [&str; 4] = [r"\.{2,}", r",{2,}", r"!{2,}", r"\?{2,}"];

const DIGITS: &str = r"\d+";

const DOCUMENT_QUOTES: &str = "«»“”";

fn disallowed_class(extra: &str) -> String {
    format!(r#"[^\w\s.,!?;:(){}'"\\/-]"#, extra)
}

/// Character class of everything the document cleaner drops. Quotes are kept
/// for every language; Tajik also lists its extra letters.
pub fn disallowed_chars_pattern(language: Language) -> String {
    match language {
        Language::Tajik => disallowed_class(&format!("{}{}", DOCUMENT_QUOTES, TAJIK_EXTRA_LETTERS)),
        Language::English | Language::Russian => disallowed_class(DOCUMENT_QUOTES),
    }
}

/// Character class the web cleaner drops. Only Russian keeps guillemets and
/// curly quotes.
pub fn web_disallowed_chars_pattern(language: Language) -> String {
    match language {
        Language::Russian => disallowed_class(DOCUMENT_QUOTES),
        Language::English | Language::Tajik => disallowed_class(""),
    }
}

/// Replace legacy letter variants with canonical Tajik letters
pub fn remap_letters(text: &str) -> String {
    text.chars()
        .map(|ch| {
            LETTER_REMAP
                .iter()
                .find(|(legacy, _)| *legacy == ch)
                .map(|(_, canonical)| *canonical)
                .unwrap_or(ch)
        })
        .collect()
}

struct Rule {
    regex: Regex,
    replacement: &'static str,
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| CorpusError::Pattern {
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Profile {
    Document,
    Web,
}

/// Ordered pattern substitutions followed by the canonical letter remap
pub struct TextCleaner {
    rules: Vec<Rule>,
    profile: Profile,
    strip_markup: bool,
    collapse_spaces: bool,
}

impl TextCleaner {
    /// Cleaner for extracted document text (file pipeline)
    pub fn for_documents(options: &ExtractionOptions) -> Result<Self> {
        let mut cleaner = Self {
            rules: Vec::new(),
            profile: Profile::Document,
            strip_markup: false,
            collapse_spaces: false,
        };

        cleaner.push(PAGE_NUMBER_LINE, " ")?;
        cleaner.push(&disallowed_chars_pattern(options.language), " ")?;
        cleaner.push(HORIZONTAL_WHITESPACE, " ")?;
        cleaner.push(BLANK_LINES, "\n")?;
        cleaner.push(TABS, " ")?;
        cleaner.push(DOT_RUNS, " ")?;
        cleaner.push(HTML_TAG, " ")?;

        if options.ignore_footnotes {
            for pattern in FOOTNOTE_PATTERNS {
                cleaner.push(pattern, " ")?;
            }
        }
        if options.ignore_links {
            for pattern in LINK_PATTERNS {
                cleaner.push(pattern, " ")?;
            }
        }
        cleaner.push_custom(&options.custom_patterns)?;

        if options.strip_digits {
            cleaner.push(DIGITS, " ")?;
        }

        Ok(cleaner)
    }

    /// Cleaner for fetched web content: no digit, footnote or link passes
    pub fn for_web(
        language: Language,
        options: &WebCleanOptions,
        custom_patterns: &[String],
    ) -> Result<Self> {
        let mut cleaner = Self {
            rules: Vec::new(),
            profile: Profile::Web,
            strip_markup: options.clean_html,
            collapse_spaces: options.remove_extra_spaces,
        };

        cleaner.push(PAGE_NUMBER_LINE, " ")?;
        cleaner.push(&web_disallowed_chars_pattern(language), " ")?;
        cleaner.push(ANY_WHITESPACE, " ")?;
        cleaner.push(TABS, " ")?;
        cleaner.push(DOT_RUNS, " ")?;
        if options.remove_extra_spaces {
            cleaner.push(ANY_WHITESPACE, " ")?;
        }
        if options.normalize_punctuation {
            for pattern in PUNCTUATION_RUNS {
                cleaner.push(pattern, " ")?;
            }
        }
        cleaner.push_custom(custom_patterns)?;

        Ok(cleaner)
    }

    fn push(&mut self, pattern: &str, replacement: &'static str) -> Result<()> {
        self.rules.push(Rule {
            regex: compile(pattern)?,
            replacement,
        });
        Ok(())
    }

    fn push_custom(&mut self, patterns: &[String]) -> Result<()> {
        for pattern in patterns {
            let regex = Regex::new(&format!("(?m){}", pattern)).map_err(|e| CorpusError::Pattern {
                pattern: pattern.clone(),
                reason: e.to_string(),
            })?;
            self.rules.push(Rule {
                regex,
                replacement: " ",
            });
        }
        Ok(())
    }

    /// Number of substitution passes this cleaner runs
    pub fn pass_count(&self) -> usize {
        self.rules.len()
    }

    pub fn clean(&self, text: &str) -> String {
        let mut text = text.replace("\r\n", "\n").replace('\r', "\n");

        if self.strip_markup {
            text = markup_to_text(&text, " ");
        }

        for rule in &self.rules {
            text = rule
                .regex
                .replace_all(&text, rule.replacement)
                .into_owned();
        }

        let text = remap_letters(&text);

        match self.profile {
            Profile::Document => tidy_lines(&text),
            Profile::Web if self.collapse_spaces => {
                text.split_whitespace().collect::<Vec<_>>().join(" ")
            }
            Profile::Web => text.trim().to_string(),
        }
    }
}

/// Collapse whitespace inside each line and drop the lines left empty
fn tidy_lines(text: &str) -> String {
    text.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Clean document text with a one-off cleaner
pub fn clean_text(text: &str, options: &ExtractionOptions) -> Result<String> {
    Ok(TextCleaner::for_documents(options)?.clean(text))
}
