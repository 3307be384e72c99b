use once_cell::sync::Lazy;
use regex::Regex;

use crate::document::{Annotations, Run, MAX_RUN_TEXT_LEN};
use crate::html::entities::{decode_entities, strip_invisible};
use crate::urls;

// @module: Inline run parser - HTML fragment to annotated text runs

// @const: Tag boundary splitter, keeps tags as their own tokens
static TAG_SPLIT_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(<[^>]+>)").unwrap());

// @const: Line break tags become literal newlines before tokenization
static BR_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<br\s*/?>").unwrap());

// @const: Tag name at the start of an open or close tag
static TAG_NAME_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^</?([a-zA-Z][a-zA-Z0-9]*)").unwrap());

// @const: href attribute inside an anchor open tag
static HREF_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)href=["']([^"']+)["']"#).unwrap());

/// One token of an inline HTML fragment.
#[derive(Debug, Clone, PartialEq)]
enum Token<'a> {
    /// An opening tag: lowercased name plus the raw tag text (for attributes)
    TagOpen { name: String, raw: &'a str },
    /// A closing tag: lowercased name
    TagClose { name: String },
    /// Literal text between tags
    Text(&'a str),
}

/// Split a fragment into an ordered token stream. Tags that don't parse as
/// tags (no recognizable name) are dropped; their absence never loses text.
fn tokenize(fragment: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut last = 0;
    for m in TAG_SPLIT_REGEX.find_iter(fragment) {
        if m.start() > last {
            tokens.push(Token::Text(&fragment[last..m.start()]));
        }
        let raw = m.as_str();
        if let Some(caps) = TAG_NAME_REGEX.captures(raw) {
            let name = caps[1].to_lowercase();
            if raw.starts_with("</") {
                tokens.push(Token::TagClose { name });
            } else {
                tokens.push(Token::TagOpen { name, raw });
            }
        }
        last = m.end();
    }
    if last < fragment.len() {
        tokens.push(Token::Text(&fragment[last..]));
    }
    tokens
}

/// Accumulates text under the current annotation state and flushes a
/// completed run on every state transition, so each run's annotations are
/// uniform for its entire span and already-emitted runs are never relabeled.
#[derive(Debug, Default)]
struct InlineState {
    bold: bool,
    italic: bool,
    underline: bool,
    code: bool,
    link: Option<String>,
    buffer: String,
    runs: Vec<Run>,
}

impl InlineState {
    /// Flush the accumulated text as one run carrying the pre-transition state
    fn flush(&mut self) {
        if self.buffer.is_empty() {
            return;
        }
        let text = strip_invisible(&decode_entities(&self.buffer));
        self.buffer.clear();
        if text.is_empty() {
            return;
        }
        let annotations = Annotations {
            bold: self.bold,
            italic: self.italic,
            underline: self.underline,
            code: self.code,
            link: self.link.clone(),
            ..Annotations::default()
        };
        self.runs.push(Run::new(text, annotations));
    }

    fn on_open(&mut self, name: &str, raw: &str) {
        match name {
            "strong" | "b" => {
                self.flush();
                self.bold = true;
            }
            "em" | "i" => {
                self.flush();
                self.italic = true;
            }
            "u" => {
                self.flush();
                self.underline = true;
            }
            "code" => {
                self.flush();
                self.code = true;
            }
            "a" => {
                self.flush();
                // An invalid href yields a run with no link, not an error
                self.link = HREF_REGEX
                    .captures(raw)
                    .and_then(|caps| urls::validate_url(&decode_entities(&caps[1])));
            }
            _ => {}
        }
    }

    fn on_close(&mut self, name: &str) {
        // A close tag is only actionable when the matching flag is set;
        // stray closers are tolerated without flushing.
        match name {
            "strong" | "b" if self.bold => {
                self.flush();
                self.bold = false;
            }
            "em" | "i" if self.italic => {
                self.flush();
                self.italic = false;
            }
            "u" if self.underline => {
                self.flush();
                self.underline = false;
            }
            "code" if self.code => {
                self.flush();
                self.code = false;
            }
            "a" if self.link.is_some() => {
                self.flush();
                self.link = None;
            }
            _ => {}
        }
    }
}

/// Parse the inner content of one block-level element into an ordered list
/// of annotated runs.
///
/// Unbalanced markup degrades gracefully: unknown tags are ignored, unclosed
/// flags simply run to the end of the fragment, and runs that are empty
/// after entity decoding and trimming are dropped.
pub fn parse_inline_runs(fragment: &str) -> Vec<Run> {
    if fragment.is_empty() {
        return Vec::new();
    }

    let fragment = BR_REGEX.replace_all(fragment, "\n");

    let mut state = InlineState::default();
    for token in tokenize(&fragment) {
        match token {
            Token::Text(text) => {
                // Truncation happens at flush; cap the buffer so a pathological
                // fragment can't accumulate unbounded text between tags.
                if state.buffer.len() < MAX_RUN_TEXT_LEN * 4 {
                    state.buffer.push_str(text);
                }
            }
            Token::TagOpen { name, raw } => state.on_open(&name, raw),
            Token::TagClose { name } => state.on_close(&name),
        }
    }
    state.flush();

    state
        .runs
        .into_iter()
        .filter(|run| !run.text.trim().is_empty())
        .collect()
}
