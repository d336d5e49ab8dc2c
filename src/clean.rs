//! Link text normalization ahead of fuzzy matching

use regex::Regex;
use std::sync::LazyLock;

static NON_ASCII_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\x00-\x7F]+").expect("valid non-ascii pattern"));

static PDF_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\[\s*pdf\s*\]").expect("valid tag pattern"));

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

// (63KB), (1,024KB), 63KB, 1,024KB, 12MB
static FILE_SIZE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\([0-9]+(,[0-9]{3})?KB\)|[0-9]+(,[0-9]{3})?KB|[0-9]+MB")
        .expect("valid file size pattern")
});

/// Clean anchor text: non-ASCII runs become `'`, `[pdf]` tags and file sizes
/// are dropped, whitespace is collapsed and trailing apostrophes are stripped
/// from every word.
pub fn clean_text(text: &str) -> String {
    let text = NON_ASCII_RE.replace_all(text, "'");
    let text = PDF_TAG_RE.replace_all(&text, "");
    let text = WHITESPACE_RE.replace_all(&text, " ");
    let text = FILE_SIZE_RE.replace_all(&text, "");

    // A word that was only apostrophes still takes a slot in the join
    text.split_whitespace()
        .map(|word| word.trim_end_matches('\''))
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}
