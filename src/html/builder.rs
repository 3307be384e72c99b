use once_cell::sync::Lazy;
use regex::Regex;

use crate::document::Block;
use crate::html::inline::parse_inline_runs;
use crate::html::segment::RawSegment;

// @module: Block builder - raw segments to document blocks

// @const: Heading element with its level digit
static HEADING_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)^<h([1-6])[^>]*>(.*)</h[1-6]>$").unwrap());

// @const: Blockquote inner content
static QUOTE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<blockquote[^>]*>(.*)</blockquote>").unwrap());

// @const: List items inside a ul/ol element
static LIST_ITEM_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<li[^>]*>(.*?)</li>").unwrap());

/// Map one raw element's markup to zero or more blocks.
///
/// Lists explode into one block per `<li>`. An element whose inline content
/// produces no runs yields nothing - empty blocks are dropped here, at
/// build time, and never enter the document.
fn build_element(element: &str) -> Vec<Block> {
    if let Some(caps) = HEADING_REGEX.captures(element) {
        let level: u8 = caps[1].parse().unwrap_or(1);
        let runs = parse_inline_runs(&caps[2]);
        if runs.is_empty() {
            return Vec::new();
        }
        return vec![Block::heading(level, runs)];
    }

    let lower_prefix = element
        .get(..element.len().min(12))
        .unwrap_or_default()
        .to_lowercase();

    if lower_prefix.starts_with("<blockquote") {
        if let Some(caps) = QUOTE_REGEX.captures(element) {
            let runs = parse_inline_runs(&caps[1]);
            if !runs.is_empty() {
                return vec![Block::Quote { runs }];
            }
        }
        return Vec::new();
    }

    if lower_prefix.starts_with("<ul") || lower_prefix.starts_with("<ol") {
        let numbered = lower_prefix.starts_with("<ol");
        return LIST_ITEM_REGEX
            .captures_iter(element)
            .filter_map(|caps| {
                let runs = parse_inline_runs(&caps[1]);
                if runs.is_empty() {
                    None
                } else if numbered {
                    Some(Block::NumberItem { runs })
                } else {
                    Some(Block::BulletItem { runs })
                }
            })
            .collect();
    }

    // Paragraphs and anything else: the inline parser ignores the wrapping
    // tag itself, so the whole element can be handed over as a fragment.
    let runs = parse_inline_runs(element);
    if runs.iter().any(|r| !r.text.trim().is_empty()) {
        vec![Block::Paragraph { runs }]
    } else {
        Vec::new()
    }
}

/// Map an ordered segment stream into document blocks, preserving order.
pub fn build_blocks(segments: &[RawSegment]) -> Vec<Block> {
    let mut blocks = Vec::with_capacity(segments.len());
    for segment in segments {
        match segment {
            RawSegment::Element(element) => blocks.extend(build_element(element)),
            RawSegment::Image { url } => blocks.push(Block::Image { url: url.clone() }),
        }
    }
    blocks
}
