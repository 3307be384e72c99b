/*!
 * Batched translation of block documents via an AI oracle.
 *
 * This module contains the eligibility predicate, the batching and
 * reassembly logic, and the oracle protocol. It is split into several
 * submodules:
 *
 * - `eligibility`: per-block translate-or-skip predicate
 * - `batch`: unit collection, greedy packing, oracle calls and merge
 * - `markers`: the numbered-marker payload/response protocol
 * - `prompts`: the fixed system instruction sent with every batch
 */

// Re-export main types for easier usage
pub use self::batch::{BatchTranslator, TranslationStats, TranslationUnit};
pub use self::eligibility::SkipReason;

// Submodules
pub mod batch;
pub mod eligibility;
pub mod markers;
pub mod prompts;
