use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::document::{Block, BlockKind};

// @module: Per-block translation eligibility predicate

// @const: Ticker row shape: optional $, 2-5 caps, whitespace, signed number
static TICKER_LINE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\$?[A-Z]{2,5}\s+[+-]?\d+").unwrap());

/// Fraction of digit/currency/percent characters above which a list item is
/// treated as a data row rather than prose
const NUMERIC_DENSITY_THRESHOLD: f64 = 0.3;

/// Fraction of CJK ideographs above which text counts as already Chinese
const CJK_RATIO_THRESHOLD: f64 = 0.3;

/// Why a block was skipped by the translation pass. Purely informational;
/// skipping is never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Images carry no translatable text
    Image,
    /// Text is empty or all-whitespace
    Empty,
    /// Text is below the kind-dependent minimum length
    TooShort,
    /// Text is already predominantly Chinese
    AlreadyChinese,
    /// List item classified as a numeric/ticker data row
    NumericLine,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SkipReason::Image => "image",
            SkipReason::Empty => "empty",
            SkipReason::TooShort => "short",
            SkipReason::AlreadyChinese => "chinese",
            SkipReason::NumericLine => "numeric",
        };
        write!(f, "{}", s)
    }
}

/// Detect numeric/ticker data rows: either a leading ticker-and-number
/// shape, or a high density of digits and currency symbols.
pub fn is_numeric_line(text: &str) -> bool {
    let text = text.trim();
    if text.is_empty() {
        return false;
    }

    if TICKER_LINE_REGEX.is_match(text) {
        return true;
    }

    let total = text.chars().count();
    let numeric = text
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '$' | '%' | '+' | '-' | '.' | ','))
        .count();
    numeric as f64 / total as f64 > NUMERIC_DENSITY_THRESHOLD
}

/// Fraction of CJK ideographs in `text`
pub fn cjk_ratio(text: &str) -> f64 {
    let total = text.chars().count();
    if total == 0 {
        return 0.0;
    }
    let cjk = text
        .chars()
        .filter(|c| ('\u{4e00}'..='\u{9fff}').contains(c))
        .count();
    cjk as f64 / total as f64
}

/// Decide whether a block should be sent to the translation oracle.
///
/// Returns None when the block is eligible, otherwise the reason it was
/// skipped. The predicate inspects each block independently; it never looks
/// at document position or neighboring blocks.
pub fn skip_reason(block: &Block, min_text_len: usize, min_title_len: usize) -> Option<SkipReason> {
    let kind = block.kind();
    if kind == BlockKind::Image {
        return Some(SkipReason::Image);
    }

    let text = block.plain_text();
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Some(SkipReason::Empty);
    }

    let min_len = if kind.is_heading() { min_title_len } else { min_text_len };
    if trimmed.chars().count() < min_len {
        return Some(SkipReason::TooShort);
    }

    if cjk_ratio(&text) > CJK_RATIO_THRESHOLD {
        return Some(SkipReason::AlreadyChinese);
    }

    if matches!(kind, BlockKind::BulletItem | BlockKind::NumberItem) && is_numeric_line(&text) {
        return Some(SkipReason::NumericLine);
    }

    None
}
