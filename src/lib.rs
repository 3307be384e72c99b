/*!
 * # lettersync - Newsletter to block-store sync with AI translation
 *
 * A Rust library for converting HTML newsletter emails into structured
 * block documents and syncing them to a Notion database, with optional
 * AI-powered translation of every translatable text unit.
 *
 * ## Features
 *
 * - Convert newsletter HTML into an ordered block document (headings,
 *   paragraphs, quotes, list items, images)
 * - Inline formatting preserved as annotated text runs
 * - Images interleaved at their source position, tracking pixels excluded
 * - Intra-document duplicate-block removal
 * - Batched translation via DeepSeek with defensive reassembly
 * - Ticker extraction and content-fingerprint dedup against history
 * - Chunked persistence to one or two Notion databases
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `document`: Block/run document model
 * - `html`: HTML body to block conversion pipeline:
 *   - `html::inline`: Inline run parser
 *   - `html::segment`: Block segmenter with image interleave
 *   - `html::builder`: Raw segments to blocks
 *   - `html::dedup`: Duplicate-block removal
 * - `translation`: Batched AI translation:
 *   - `translation::eligibility`: Per-block translate predicate
 *   - `translation::batch`: Packing, oracle calls and merge
 *   - `translation::markers`: Numbered-marker oracle protocol
 * - `providers`: Translation oracle clients:
 *   - `providers::deepseek`: DeepSeek API client
 * - `email`: Message model, MIME decoding and header utilities
 * - `tickers`: Stock ticker extraction
 * - `notion`: Block store client and payload serialization
 * - `urls`: URL validation and image URL normalization
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod document;
pub mod email;
pub mod errors;
pub mod html;
pub mod notion;
pub mod providers;
pub mod tickers;
pub mod translation;
pub mod urls;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::Controller;
pub use document::{Annotations, Block, BlockKind, Run};
pub use errors::{AppError, ProviderError, StoreError, TranslationError};
pub use html::html_to_blocks;
pub use translation::BatchTranslator;
