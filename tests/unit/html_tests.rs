/*!
 * Tests for the HTML conversion pipeline
 *
 * The html module is structured as follows:
 * - entities: entity decoding and invisible-character stripping
 * - inline: inline run parser
 * - segment: block segmenter with image interleave
 * - builder: raw segments to blocks
 * - dedup: duplicate-block removal
 */

use lettersync::document::{Block, BlockKind};
use lettersync::html::{self, html_to_blocks, parse_inline_runs};

/// Bold toggling splits a paragraph into three runs
#[test]
fn test_inline_parser_withBoldSpan_shouldSplitIntoThreeRuns() {
    let blocks = html_to_blocks("<p>Revenue <strong>rose</strong> 20%.</p>");
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].kind(), BlockKind::Paragraph);

    let runs = blocks[0].runs().unwrap();
    assert_eq!(runs.len(), 3);
    assert_eq!(runs[0].text, "Revenue ");
    assert!(!runs[0].annotations.bold);
    assert_eq!(runs[1].text, "rose");
    assert!(runs[1].annotations.bold);
    assert_eq!(runs[2].text, " 20%.");
    assert!(!runs[2].annotations.bold);
}

/// For well-balanced inline tags, concatenated run text equals the
/// fragment text with tags removed and entities decoded
#[test]
fn test_inline_parser_withBalancedTags_shouldPreserveAllText() {
    let fragment = "Margins <em>expanded</em> by <strong>150bps</strong> &amp; guidance was <u>raised</u>.";
    let runs = parse_inline_runs(fragment);
    let concatenated: String = runs.iter().map(|r| r.text.as_str()).collect();
    assert_eq!(concatenated, "Margins expanded by 150bps & guidance was raised.");
}

/// Opening a flag never relabels runs flushed before the toggle
#[test]
fn test_inline_parser_withLateToggle_shouldNotAlterEarlierRuns() {
    let runs = parse_inline_runs("before <strong>after");
    assert_eq!(runs.len(), 2);
    assert!(!runs[0].annotations.bold);
    assert!(runs[1].annotations.bold);
}

/// Nested flags combine on the inner run only
#[test]
fn test_inline_parser_withNestedTags_shouldCombineAnnotations() {
    let runs = parse_inline_runs("<strong>bold <em>both</em></strong> plain");
    assert_eq!(runs.len(), 3);
    assert!(runs[0].annotations.bold && !runs[0].annotations.italic);
    assert!(runs[1].annotations.bold && runs[1].annotations.italic);
    assert!(!runs[2].annotations.bold && !runs[2].annotations.italic);
}

/// Valid hrefs become link annotations; invalid ones silently yield none
#[test]
fn test_inline_parser_withAnchor_shouldValidateLink() {
    let runs = parse_inline_runs(r#"<a href="https://example.com/report">the report</a>"#);
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].annotations.link.as_deref(), Some("https://example.com/report"));

    let runs = parse_inline_runs(r#"<a href="not a url">broken</a>"#);
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].annotations.link, None);
}

/// Invisible characters are stripped from run text
#[test]
fn test_inline_parser_withZeroWidthChars_shouldStripThem() {
    let runs = parse_inline_runs("Reve\u{200b}nue gr\u{ad}ew");
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].text, "Revenue grew");
}

/// Heading levels above 3 are clamped at build time
#[test]
fn test_builder_withDeepHeading_shouldClampToLevelThree() {
    let blocks = html_to_blocks("<h6>Section</h6>");
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].kind(), BlockKind::Heading3);
}

/// A list expands to one sibling block per item
#[test]
fn test_builder_withOrderedList_shouldExplodeIntoItems() {
    let blocks = html_to_blocks("<ol><li>First point</li><li>Second point</li></ol>");
    assert_eq!(blocks.len(), 2);
    assert!(blocks.iter().all(|b| b.kind() == BlockKind::NumberItem));
    assert_eq!(blocks[0].plain_text(), "First point");
}

/// Blockquotes map to quote blocks
#[test]
fn test_builder_withBlockquote_shouldEmitQuote() {
    let blocks = html_to_blocks("<blockquote>Buy low, sell high.</blockquote>");
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].kind(), BlockKind::Quote);
}

/// Whitespace-only elements never become blocks
#[test]
fn test_builder_withEmptyParagraph_shouldEmitNothing() {
    assert!(html_to_blocks("<p>  \n </p>").is_empty());
    assert!(html_to_blocks("<p><span>&nbsp;</span></p>").is_empty());
}

/// Every non-denylisted image appears exactly once, at a block boundary
#[test]
fn test_segmenter_withEmbeddedImage_shouldPlaceItBetweenBlocks() {
    let html = concat!(
        "<p>Before the chart.</p>",
        r#"<img src="https://cdn.example.com/chart.png">"#,
        "<p>After the chart.</p>",
    );
    let blocks = html_to_blocks(html);
    assert_eq!(blocks.len(), 3);
    assert_eq!(blocks[1].kind(), BlockKind::Image);
    let Block::Image { url } = &blocks[1] else {
        panic!("expected image block");
    };
    assert_eq!(url, "https://cdn.example.com/chart.png");
}

/// Tracking pixels and spacers are excluded at segmentation time
#[test]
fn test_segmenter_withTrackingPixel_shouldExcludeIt() {
    let html = concat!(
        r#"<img src="https://open.example.com/tracking/o.gif">"#,
        r#"<img src="https://cdn.example.com/spacer.gif">"#,
        "<p>Body text.</p>",
    );
    let blocks = html_to_blocks(html);
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].kind(), BlockKind::Paragraph);
}

/// Images past the last block are flushed at the end, in offset order
#[test]
fn test_segmenter_withTrailingImages_shouldFlushInOrder() {
    let html = concat!(
        "<p>Text.</p>",
        r#"<img src="https://cdn.example.com/a.png">"#,
        r#"<img src="https://cdn.example.com/b.png">"#,
    );
    let blocks = html_to_blocks(html);
    assert_eq!(blocks.len(), 3);
    let urls: Vec<String> = blocks[1..]
        .iter()
        .map(|b| match b {
            Block::Image { url } => url.clone(),
            _ => panic!("expected image"),
        })
        .collect();
    assert_eq!(urls, vec![
        "https://cdn.example.com/a.png".to_string(),
        "https://cdn.example.com/b.png".to_string(),
    ]);
}

/// Beehiiv proxy URLs are normalized before the image becomes a block
#[test]
fn test_segmenter_withProxiedImageUrl_shouldRewriteIt() {
    let html = r#"<img src="https://media.beehiiv.com/cdn-cgi/image/fit=scale,format=auto/uploads/chart.png"><p>Text.</p>"#;
    let blocks = html_to_blocks(html);
    let Block::Image { url } = &blocks[0] else {
        panic!("expected image block");
    };
    assert_eq!(url, "https://media.beehiiv.com/uploads/chart.png");
}

/// Style, script and footer boilerplate never produce blocks
#[test]
fn test_segmenter_withBoilerplate_shouldStripIt() {
    let html = concat!(
        "<style>p { color: red; }</style>",
        "<p>Real content paragraph.</p>",
        "<script>track();</script>",
        r#"<div class="post-footer">Unsubscribe from this list</div>"#,
    );
    let blocks = html_to_blocks(html);
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].plain_text(), "Real content paragraph.");
}

/// Consecutive identical paragraphs collapse to one
#[test]
fn test_dedup_withRepeatedDisclaimer_shouldKeepFirstOnly() {
    let html = "<p>Disclaimer: not investment advice.</p><p>Disclaimer: not investment advice.</p>";
    let blocks = html_to_blocks(html);
    assert_eq!(blocks.len(), 1);
}

/// Deduplication is idempotent on its own output
#[test]
fn test_dedup_onOwnOutput_shouldBeIdempotent() {
    let blocks = html_to_blocks("<p>Same text here repeated.</p><p>Same text here repeated.</p><p>Other text.</p>");
    let again = html::dedupe_blocks(blocks.clone());
    assert_eq!(blocks, again);
}

/// Quoted-printable soft breaks are decoded before segmentation
#[test]
fn test_preprocess_withQuotedPrintable_shouldDecodeBeforeScanning() {
    let html = "<p>Revenue grew by 20=\r\n% this quarter.</p>";
    let blocks = html_to_blocks(html);
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].plain_text(), "Revenue grew by 20% this quarter.");
}
