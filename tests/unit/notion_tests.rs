/*!
 * Tests for block store payload construction
 */

use lettersync::document::{Annotations, Block, Run};
use lettersync::notion::{
    block_to_json, blocks_to_json, build_properties, chunk_document, sanitize_blocks,
    with_pending_status, PROP_STATUS, PROP_TICKERS, PROP_URL,
};
use serde_json::json;

/// Chunking issues one create batch plus ceil((n-100)/100) append batches,
/// preserving order
#[test]
fn test_chunk_document_withLargeDocument_shouldSplitInOrder() {
    let children: Vec<_> = (0..250).map(|i| json!({"i": i})).collect();
    let (initial, appends) = chunk_document(&children, 100);

    assert_eq!(initial.len(), 100);
    assert_eq!(appends.len(), 2);
    assert_eq!(appends[0].len(), 100);
    assert_eq!(appends[1].len(), 50);
    assert_eq!(initial[0]["i"], 0);
    assert_eq!(appends[0][0]["i"], 100);
    assert_eq!(appends[1][49]["i"], 249);
}

/// A document within the first batch needs no appends
#[test]
fn test_chunk_document_withSmallDocument_shouldNeedNoAppends() {
    let children: Vec<_> = (0..42).map(|i| json!({"i": i})).collect();
    let (initial, appends) = chunk_document(&children, 100);
    assert_eq!(initial.len(), 42);
    assert!(appends.is_empty());

    let (initial, appends) = chunk_document(&[], 100);
    assert!(initial.is_empty());
    assert!(appends.is_empty());
}

/// Text blocks serialize with rich_text and full annotations
#[test]
fn test_block_to_json_withAnnotatedRuns_shouldSerializeRichText() {
    let block = Block::Paragraph {
        runs: vec![
            Run::plain("plain "),
            Run::new(
                "linked",
                Annotations {
                    bold: true,
                    link: Some("https://example.com".to_string()),
                    ..Annotations::default()
                },
            ),
        ],
    };

    let value = block_to_json(&block);
    assert_eq!(value["type"], "paragraph");
    let rich_text = value["paragraph"]["rich_text"].as_array().unwrap();
    assert_eq!(rich_text.len(), 2);
    assert_eq!(rich_text[0]["text"]["content"], "plain ");
    assert_eq!(rich_text[1]["annotations"]["bold"], true);
    assert_eq!(rich_text[1]["text"]["link"]["url"], "https://example.com");
}

/// Images serialize as external image blocks
#[test]
fn test_block_to_json_withImage_shouldSerializeExternal() {
    let block = Block::Image {
        url: "https://cdn.example.com/a.png".to_string(),
    };
    let value = block_to_json(&block);
    assert_eq!(value["type"], "image");
    assert_eq!(value["image"]["external"]["url"], "https://cdn.example.com/a.png");
}

/// Heading levels map to their store type identifiers
#[test]
fn test_blocks_to_json_withHeadings_shouldUseLevelTypes() {
    let blocks = vec![
        Block::heading(1, vec![Run::plain("one")]),
        Block::heading(2, vec![Run::plain("two")]),
        Block::heading(9, vec![Run::plain("clamped")]),
    ];
    let values = blocks_to_json(&blocks);
    assert_eq!(values[0]["type"], "heading_1");
    assert_eq!(values[1]["type"], "heading_2");
    assert_eq!(values[2]["type"], "heading_3");
}

/// Sanitization drops non-http images and invalid links, keeping runs
#[test]
fn test_sanitize_blocks_withInvalidTargets_shouldCleanThem() {
    let blocks = vec![
        Block::Image {
            url: "cid:inline-attachment".to_string(),
        },
        Block::Paragraph {
            runs: vec![Run::new(
                "text",
                Annotations {
                    link: Some("not a url".to_string()),
                    ..Annotations::default()
                },
            )],
        },
    ];

    let sanitized = sanitize_blocks(blocks);
    assert_eq!(sanitized.len(), 1);
    let runs = sanitized[0].runs().unwrap();
    assert_eq!(runs[0].text, "text");
    assert_eq!(runs[0].annotations.link, None);
}

/// The property map carries title, date, sender and type, plus optional
/// URL and tickers
#[test]
fn test_build_properties_withFullMetadata_shouldIncludeAllProps() {
    let tickers = vec!["NVDA".to_string(), "TSM".to_string()];
    let properties = build_properties(
        "Q3 preview",
        "2026-08-07T09:30",
        "SemiAnalysis",
        "Article",
        Some("https://semianalysis.substack.com/p/q3"),
        &tickers,
    );

    assert_eq!(
        properties["Name"]["title"][0]["text"]["content"],
        "Q3 preview"
    );
    assert_eq!(properties["Date"]["date"]["start"], "2026-08-07T09:30");
    assert_eq!(properties["Sender"]["select"]["name"], "SemiAnalysis");
    assert_eq!(properties["Type"]["select"]["name"], "Article");
    assert_eq!(properties[PROP_URL]["url"], "https://semianalysis.substack.com/p/q3");
    assert_eq!(properties[PROP_TICKERS]["multi_select"].as_array().unwrap().len(), 2);
}

/// Invalid article URLs are omitted rather than stored
#[test]
fn test_build_properties_withInvalidUrl_shouldOmitUrlProp() {
    let properties = build_properties("Subject", "2026-08-07T09:30", "Oreo", "Article", Some("nope"), &[]);
    assert!(properties.get(PROP_URL).is_none());
    assert!(properties.get(PROP_TICKERS).is_none());
}

/// Only the primary database copy carries the pending status
#[test]
fn test_with_pending_status_shouldAddStatusSelect() {
    let properties = build_properties("Subject", "2026-08-07T09:30", "Oreo", "Article", None, &[]);
    assert!(properties.get(PROP_STATUS).is_none());

    let primary = with_pending_status(properties);
    assert_eq!(primary[PROP_STATUS]["select"]["name"], "Pending");
}

/// Long titles are truncated to the store's limit
#[test]
fn test_build_properties_withLongTitle_shouldTruncate() {
    let long_subject = "x".repeat(500);
    let properties = build_properties(&long_subject, "2026-08-07T09:30", "Oreo", "Article", None, &[]);
    let stored = properties["Name"]["title"][0]["text"]["content"].as_str().unwrap();
    assert_eq!(stored.chars().count(), 200);
}
