use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::email::decode_quoted_printable;
use crate::html::entities::{decode_entities, strip_invisible};
use crate::urls;

// @module: Block segmenter - locates block elements and interleaves images by offset

// @const: Style and script elements are stripped wholesale
static STYLE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<style[^>]*>.*?</style>").unwrap());
static SCRIPT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<script[^>]*>.*?</script>").unwrap());

// @const: Sending-platform preview text container
static PREVIEW_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?is)<div[^>]*class="preview"[^>]*>.*?</div>"#).unwrap());

// @const: Footer/unsubscribe boilerplate. Spans are bounded and non-greedy
// so a match can never swallow article content.
static FOOTER_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r#"(?is)<div[^>]*class="[^"]*footer[^"]*"[^>]*>.*?</div>"#).unwrap(),
        Regex::new(r"(?i)Forwarded this email\?[^<]{0,200}").unwrap(),
        Regex::new(r"(?i)Unsubscribe[^<]{0,500}").unwrap(),
    ]
});

// @const: Image tags and their src attribute
static IMG_TAG_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<img[^>]+>").unwrap());
static IMG_SRC_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)src=["']([^"']+)["']"#).unwrap());

// @const: Block-level element alternation, in priority order. First match
// wins at each position; matches never overlap.
static BLOCK_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?is)(<h[1-6][^>]*>.*?</h[1-6]>)|(<blockquote[^>]*>.*?</blockquote>)|(<ul[^>]*>.*?</ul>)|(<ol[^>]*>.*?</ol>)|(<p[^>]*>.*?</p>)",
    )
    .unwrap()
});

/// A raw segment emitted by the scanner: either one block-level element's
/// full markup, or an image resolved to its final URL.
#[derive(Debug, Clone, PartialEq)]
pub enum RawSegment {
    Element(String),
    Image { url: String },
}

/// Preprocess a raw HTML body: decode the content-transfer encoding and
/// entities, then strip styles, scripts, preview text and footer
/// boilerplate. Idempotent, so double-decoded input is harmless.
pub fn preprocess(html: &str) -> String {
    let decoded = decode_quoted_printable(html);
    let decoded = strip_invisible(&decode_entities(&decoded));

    let without_style = STYLE_REGEX.replace_all(&decoded, "");
    let without_script = SCRIPT_REGEX.replace_all(&without_style, "");
    let mut cleaned = PREVIEW_REGEX.replace_all(&without_script, "").into_owned();
    for pattern in FOOTER_PATTERNS.iter() {
        cleaned = pattern.replace_all(&cleaned, "").into_owned();
    }
    cleaned
}

/// Scan the preprocessed document once for image tags, recording each
/// surviving image as (byte offset, canonical URL). Tracking pixels and
/// non-http sources are excluded here and never become blocks.
fn discover_images(html: &str) -> Vec<(usize, String)> {
    let mut images = Vec::new();
    for tag in IMG_TAG_REGEX.find_iter(html) {
        let Some(caps) = IMG_SRC_REGEX.captures(tag.as_str()) else {
            continue;
        };
        let src = decode_entities(&caps[1]);
        if !src.starts_with("http") || urls::is_tracking_pixel(&src) {
            continue;
        }
        images.push((tag.start(), urls::rewrite_image_url(&src)));
    }
    images
}

/// Segment a full HTML document body into an ordered sequence of raw block
/// descriptors with images interleaved at their correct offsets.
///
/// Each recorded image is flushed at the first block boundary at or past
/// its offset, in ascending offset order; images past the last block are
/// flushed at the end. An image that falls inside a matched block's span is
/// therefore deferred to the boundary after that block rather than
/// splitting it.
pub fn segment_document(html: &str) -> Vec<RawSegment> {
    if html.is_empty() {
        return Vec::new();
    }

    let cleaned = preprocess(html);
    let images = discover_images(&cleaned);
    let mut next_image = 0;

    let mut segments = Vec::new();
    for m in BLOCK_REGEX.find_iter(&cleaned) {
        while next_image < images.len() && images[next_image].0 < m.start() {
            segments.push(RawSegment::Image {
                url: images[next_image].1.clone(),
            });
            next_image += 1;
        }
        segments.push(RawSegment::Element(m.as_str().to_string()));
    }

    while next_image < images.len() {
        segments.push(RawSegment::Image {
            url: images[next_image].1.clone(),
        });
        next_image += 1;
    }

    debug!(
        "Segmented document: {} segments ({} images)",
        segments.len(),
        images.len()
    );
    segments
}
