//! Text predicates used by the structure classifier.
//!
//! All predicates take already-trimmed text unless noted otherwise.

use once_cell::sync::Lazy;
use regex::Regex;

/// Code fence marker.
pub const FENCE: &str = "```";

static LIST_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"^[0-9]+\.\s+",         // 1. 2. 3.
        r"^[•·▪▫‣⁃]\s+",        // bullet glyphs
        r"^[-*+]\s+",           // markdown bullets
        r"^[a-zA-Z]\.\s+",      // a. b. c.
        r"(?i)^[ivxlcdm]+\.\s+", // i. ii. iii.
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static MARKDOWN_LIST_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[-*+]|[0-9]+\.)\s+").unwrap()
});
static LEGACY_BULLET: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[•·▪▫‣⁃]\s*").unwrap());

static CODE_INDENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?:\s{4,}|\t)").unwrap());
static CODE_PUNCTUATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"[{}();]").unwrap());
static CODE_KEYWORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:function|class|import|export|const|let|var|if|for|while)\s").unwrap()
});
static STRIP_INDENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s{4}").unwrap());
static STRIP_TAB: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\t").unwrap());

static QUOTE_START: Lazy<Regex> = Lazy::new(|| Regex::new(r#"^(?:>\s+|["'“”‘’])"#).unwrap());
static QUOTE_ANGLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^>\s*").unwrap());
static QUOTE_MARK: Lazy<Regex> = Lazy::new(|| Regex::new(r#"^["'“”‘’]\s*"#).unwrap());

static COLUMN_GAP: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s{3,}").unwrap());

/// Whether the text starts like a list item.
pub fn is_list_item(text: &str) -> bool {
    LIST_PATTERNS.iter().any(|re| re.is_match(text))
}

/// Render one list line as a Markdown list item.
///
/// Lines already carrying a `-`/`*`/`+` or `N.` marker are kept verbatim;
/// everything else gets a `- ` bullet after dropping any legacy glyph.
pub fn to_list_item(text: &str) -> String {
    if MARKDOWN_LIST_MARKER.is_match(text) {
        return text.to_string();
    }
    format!("- {}", LEGACY_BULLET.replace(text, ""))
}

/// Whether the text starts with a code fence.
pub fn is_fence(text: &str) -> bool {
    text.starts_with(FENCE)
}

/// Whether the text looks like a line of code.
///
/// May be given raw (untrimmed) text, where leading indentation counts.
pub fn is_code_line(text: &str) -> bool {
    is_fence(text)
        || CODE_INDENT.is_match(text)
        || CODE_PUNCTUATION.is_match(text)
        || CODE_KEYWORD.is_match(text)
}

/// Remove one level of code indentation from a raw line.
pub fn strip_code_indent(text: &str) -> String {
    let text = STRIP_INDENT.replace(text, "");
    STRIP_TAB.replace(&text, "").into_owned()
}

/// Whether the text starts like a quotation.
pub fn is_quote(text: &str) -> bool {
    QUOTE_START.is_match(text)
}

/// Remove a leading `>` and a leading quote mark.
pub fn strip_quote_marker(text: &str) -> String {
    let text = QUOTE_ANGLE.replace(text, "");
    QUOTE_MARK.replace(&text, "").into_owned()
}

/// Split a line into columns separated by runs of three or more spaces.
pub fn table_columns(text: &str) -> Vec<&str> {
    COLUMN_GAP.split(text).map(str::trim).collect()
}

/// Whether the text splits into at least two columns.
pub fn is_table_row(text: &str) -> bool {
    COLUMN_GAP.is_match(text) && table_columns(text).len() >= 2
}
