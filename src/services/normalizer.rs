// src/services/normalizer.rs
//! Cleans up HTML fragments that the model sometimes emits, leaving the
//! markdown subset the widget renders.

use std::sync::LazyLock;

use regex::Regex;

static LIST_ITEM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<li>(.*?)</li>").unwrap());
static LIST_WRAPPER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)</?(ul|ol)>").unwrap());
static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<h[1-6]>(.*?)</h[1-6]>").unwrap());
static ANY_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());
// Whitespace is part of the run so a second pass has nothing left to strip.
static LEADING_QUESTION_MARKS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\s?]*").unwrap());

/// Order matters: the catch-all tag strip would otherwise eat list items and
/// headings before they are converted.
pub fn normalize(raw: &str) -> String {
    let text = LIST_ITEM.replace_all(raw, "\n- $1");
    let text = LIST_WRAPPER.replace_all(&text, "");
    let text = HEADING.replace_all(&text, "**$1**\n");
    let text = ANY_TAG.replace_all(&text, "");
    let text = LEADING_QUESTION_MARKS.replace(&text, "");
    text.trim().to_string()
}
