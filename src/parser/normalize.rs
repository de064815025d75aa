use std::sync::LazyLock;

use regex::Regex;

/// Anything that is not a letter, digit, whitespace or name punctuation.
static DISALLOWED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\p{L}\p{N}\s.,&@#'\-]").unwrap());

/// Single-character tokens that are real words and survive cleanup.
const KEPT_SINGLE_CHARS: &[char] = &['I', 'A'];

/// A cleaned OCR line and its position in the page's cleaned sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub index: usize,
    pub text: String,
}

/// Clean one raw OCR line into its canonical form.
///
/// Strips characters outside the allow-list, collapses whitespace and drops
/// lone single-character tokens (OCR specks) other than `I` and `A`.
pub fn normalize_line(raw: &str) -> String {
    let stripped = DISALLOWED_RE.replace_all(raw, "");
    stripped
        .split_whitespace()
        .filter(|token| !is_noise_token(token))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Split a page of raw OCR text into cleaned, indexed lines.
/// Lines that clean down to nothing are discarded before numbering.
pub fn clean_lines(raw: &str) -> Vec<Line> {
    raw.replace("\r\n", "\n")
        .split('\n')
        .map(normalize_line)
        .filter(|l| !l.is_empty())
        .enumerate()
        .map(|(index, text)| Line { index, text })
        .collect()
}

fn is_noise_token(token: &str) -> bool {
    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => !KEPT_SINGLE_CHARS.contains(&c),
        _ => false,
    }
}
