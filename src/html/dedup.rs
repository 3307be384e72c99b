use std::collections::HashSet;

use log::debug;

use crate::document::{Block, BlockKind};

// @module: Intra-document block deduplication

/// Number of text characters contributing to a fingerprint
const FINGERPRINT_PREFIX_LEN: usize = 100;

/// Kinds subject to deduplication. Images always pass through; list items
/// do too, since repeated rows are legitimate in data tables.
fn is_dedup_kind(kind: BlockKind) -> bool {
    matches!(
        kind,
        BlockKind::Paragraph
            | BlockKind::Heading1
            | BlockKind::Heading2
            | BlockKind::Heading3
            | BlockKind::Quote
    )
}

/// Normalized duplicate-detection key: kind plus a lowercased, trimmed text
/// prefix.
fn fingerprint(block: &Block) -> String {
    let text = block.plain_text();
    let prefix: String = text.chars().take(FINGERPRINT_PREFIX_LEN).collect();
    format!("{}:{}", block.kind().type_name(), prefix.to_lowercase().trim())
}

/// Single forward pass removing blocks whose fingerprint was already seen
/// earlier in the same document. First occurrence wins. Idempotent.
pub fn dedupe_blocks(blocks: Vec<Block>) -> Vec<Block> {
    let mut seen: HashSet<String> = HashSet::new();
    let before = blocks.len();

    let deduped: Vec<Block> = blocks
        .into_iter()
        .filter(|block| {
            if !is_dedup_kind(block.kind()) {
                return true;
            }
            seen.insert(fingerprint(block))
        })
        .collect();

    if deduped.len() < before {
        debug!("Dropped {} duplicate blocks", before - deduped.len());
    }
    deduped
}
