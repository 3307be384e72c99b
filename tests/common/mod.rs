/*!
 * Common test utilities for the lettersync test suite
 */

use lettersync::document::{Block, Run};


/// Build a paragraph block from plain text
pub fn paragraph(text: &str) -> Block {
    Block::Paragraph {
        runs: vec![Run::plain(text)],
    }
}

/// Build a bullet item block from plain text
pub fn bullet_item(text: &str) -> Block {
    Block::BulletItem {
        runs: vec![Run::plain(text)],
    }
}

/// Build a heading block from plain text
pub fn heading(level: u8, text: &str) -> Block {
    Block::heading(level, vec![Run::plain(text)])
}

/// A body sentence long enough to pass the translation length minimum
pub fn long_sentence(tag: &str) -> String {
    format!("{} revenue grew strongly this quarter across all segments.", tag)
}
