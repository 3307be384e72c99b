/*!
 * HTML newsletter body to block document conversion.
 *
 * The pipeline runs in fixed stages, each in its own submodule:
 *
 * - `entities`: HTML entity decoding and invisible-character stripping
 * - `inline`: inline run parser (tag token stream + formatting flag state)
 * - `segment`: block segmenter (element boundaries, offset-ordered images)
 * - `builder`: raw segments to document blocks
 * - `dedup`: intra-document duplicate-block removal
 */

// Re-export the pipeline stages
pub use self::builder::build_blocks;
pub use self::dedup::dedupe_blocks;
pub use self::inline::parse_inline_runs;
pub use self::segment::{segment_document, RawSegment};

// Submodules
pub mod builder;
pub mod dedup;
pub mod entities;
pub mod inline;
pub mod segment;

use crate::document::Block;

/// Convert a raw HTML newsletter body into an ordered, deduplicated block
/// document. This is the composition of the full pipeline; each stage is
/// also usable on its own.
pub fn html_to_blocks(html: &str) -> Vec<Block> {
    if html.is_empty() {
        return Vec::new();
    }
    let segments = segment_document(html);
    let blocks = build_blocks(&segments);
    dedupe_blocks(blocks)
}
