/*!
 * Batch translation processing.
 *
 * Collects eligible text units from a block document, packs them into
 * size-bounded batches, drives the oracle one batch at a time and merges
 * recovered translations back onto the originating blocks. Oracle failures
 * degrade the affected batch only; the document itself is never lost.
 */

use log::{debug, info, warn};
use std::time::Duration;

use crate::app_config::TranslationConfig;
use crate::document::Block;
use crate::providers::Provider;
use crate::translation::eligibility::skip_reason;
use crate::translation::markers::{parse_response, serialize_units};
use crate::translation::prompts::TRANSLATION_SYSTEM_PROMPT;

/// Ephemeral pairing of a block's position with its concatenated text,
/// alive only between collection and merge.
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationUnit {
    /// Index of the originating block in the document
    pub block_index: usize,
    /// Concatenated run text at collection time
    pub text: String,
}

/// Summary of one translation pass
#[derive(Debug, Default, Clone, Copy)]
pub struct TranslationStats {
    /// Units that passed the eligibility predicate
    pub eligible: usize,
    /// Units that received a translation
    pub translated: usize,
    /// Batches sent to the oracle
    pub batches: usize,
    /// Batches that failed at the transport level
    pub failed_batches: usize,
}

/// Batch translator driving an injected oracle provider
pub struct BatchTranslator<'a> {
    /// The oracle to call, one batch at a time
    provider: &'a dyn Provider,

    /// Batching limits and merge settings
    config: &'a TranslationConfig,
}

impl<'a> BatchTranslator<'a> {
    /// Create a new batch translator
    pub fn new(provider: &'a dyn Provider, config: &'a TranslationConfig) -> Self {
        Self { provider, config }
    }

    /// Collect the eligible units of a document, in document order
    pub fn collect_units(&self, blocks: &[Block]) -> Vec<TranslationUnit> {
        blocks
            .iter()
            .enumerate()
            .filter_map(|(i, block)| {
                match skip_reason(block, self.config.min_text_length, self.config.min_title_length) {
                    None => Some(TranslationUnit {
                        block_index: i,
                        text: block.plain_text(),
                    }),
                    Some(reason) => {
                        debug!("Block {} skipped for translation: {}", i, reason);
                        None
                    }
                }
            })
            .collect()
    }

    /// Greedily pack units into batches: a batch closes once its running
    /// character count exceeds the budget or its unit count reaches the
    /// ceiling, whichever triggers first; the final partial batch is always
    /// flushed. Units are never split or reordered.
    pub fn pack_batches(&self, units: Vec<TranslationUnit>) -> Vec<Vec<TranslationUnit>> {
        let max_chars = self.config.max_chars_per_batch.max(1);
        let max_units = self.config.max_units_per_batch.max(1);

        let mut batches = Vec::new();
        let mut current: Vec<TranslationUnit> = Vec::new();
        let mut char_count = 0usize;

        for unit in units {
            char_count += unit.text.chars().count();
            current.push(unit);
            if char_count > max_chars || current.len() >= max_units {
                batches.push(std::mem::take(&mut current));
                char_count = 0;
            }
        }
        if !current.is_empty() {
            batches.push(current);
        }
        batches
    }

    /// Translate a document in place.
    ///
    /// Appends a newline run plus an italic gray translation run to every
    /// block whose unit was recovered from an oracle response. Blocks whose
    /// unit was dropped by the oracle, and entire batches that failed at
    /// the transport level, are left untouched.
    pub async fn translate_document(&self, blocks: &mut [Block]) -> TranslationStats {
        let mut stats = TranslationStats::default();

        let units = self.collect_units(blocks);
        stats.eligible = units.len();
        if units.is_empty() {
            return stats;
        }

        let batches = self.pack_batches(units);
        stats.batches = batches.len();
        info!(
            "Translating {} blocks in {} batches",
            stats.eligible, stats.batches
        );

        for (batch_index, batch) in batches.iter().enumerate() {
            // Politeness delay between successive oracle calls, never
            // before the first
            if batch_index > 0 && self.config.rate_limit_delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.config.rate_limit_delay_ms)).await;
            }

            let texts: Vec<&str> = batch.iter().map(|u| u.text.as_str()).collect();
            let payload = serialize_units(&texts);

            let translations = match self
                .provider
                .complete(TRANSLATION_SYSTEM_PROMPT, &payload)
                .await
            {
                Ok(response) => parse_response(&response, batch.len()),
                Err(e) => {
                    warn!(
                        "Batch {} of {} failed, leaving {} blocks untranslated: {}",
                        batch_index + 1,
                        stats.batches,
                        batch.len(),
                        e
                    );
                    stats.failed_batches += 1;
                    continue;
                }
            };

            for (unit, translation) in batch.iter().zip(translations) {
                if let Some(text) = translation {
                    blocks[unit.block_index]
                        .append_translation(&text, self.config.max_translation_length);
                    stats.translated += 1;
                }
            }
        }

        info!(
            "Translation pass complete: {}/{} blocks translated ({} failed batches)",
            stats.translated, stats.eligible, stats.failed_batches
        );
        stats
    }
}
