use anyhow::{Context, Result};
use async_trait::async_trait;
use base64::Engine;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::PathBuf;

use crate::html::entities::{decode_entities, strip_invisible};
use crate::urls;

// @module: Email message model and header/body utilities

/// Known newsletter addresses mapped to their display names. Anything not
/// listed falls back to the address local part.
const SOURCE_MAPPING: [(&str, &str); 16] = [
    ("lobwedge@substack.com", "LW Research"),
    ("robonomics@substack.com", "Robonomics"),
    ("purpledrink@substack.com", "Purple Drinks"),
    ("nathanbancroft@substack.com", "Nathan"),
    ("jamesbulltard@substack.com", "Bulltrad"),
    ("globalsemiresearch@substack.com", "GlobalSemiresearch"),
    ("wukong123@substack.com", "Wukong"),
    ("robs@substack.com", "Robs"),
    ("oreo521@substack.com", "Oreo"),
    ("franktrading@substack.com", "Frank"),
    ("tmtbreakout@substack.com", "TMTB"),
    ("semianalysis@substack.com", "SemiAnalysis"),
    ("capitalflows@substack.com", "CapitalFlows"),
    ("sleepysol@substack.com", "SleepySol"),
    ("globaltechresearch@substack.com", "GlobalTechResearch"),
    ("citrini@substack.com", "Citrini"),
];

// @const: Quoted-printable soft line breaks
static SOFT_BREAK_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"=\r?\n").unwrap());

// @const: Address inside angle brackets of a From header
static ANGLE_ADDR_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"<([^>]+)>").unwrap());

// @const: Local part of an email address
static LOCAL_PART_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([^@]+)@").unwrap());

// @const: Article URL extraction patterns, tried in order. The first three
// capture the URL in group 1; the rest match the URL outright.
static ARTICLE_URL_PATTERNS: Lazy<Vec<(Regex, bool)>> = Lazy::new(|| {
    vec![
        (Regex::new(r"(?i)View in browser\s*\(\s*(https://[^\s)]+)").unwrap(), true),
        (Regex::new(r"(?i)x-newsletter:\s*(https://\S+)").unwrap(), true),
        (Regex::new(r#"(?i)View this post on the web at\s+(https://[^\s<>"]+)"#).unwrap(), true),
        (Regex::new(r"https://[a-zA-Z0-9-]+\.substack\.com/p/[a-zA-Z0-9-]+").unwrap(), false),
        (Regex::new(r"https://newsletter\.[a-zA-Z0-9-]+\.com/p/[a-zA-Z0-9-]+").unwrap(), false),
    ]
});

/// One MIME part of a message payload, as delivered by the mail provider:
/// optional base64url body data plus nested parts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MimePart {
    #[serde(default)]
    pub mime_type: String,
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default)]
    pub parts: Vec<MimePart>,
}

/// A raw message as fetched from the provider, body still encoded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawMessage {
    pub id: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub date: String,
    /// Provider-side receive timestamp in epoch milliseconds
    #[serde(default)]
    pub internal_date: Option<i64>,
    #[serde(default)]
    pub payload: MimePart,
}

/// A decoded email message ready for the pipeline.
#[derive(Debug, Clone)]
pub struct EmailMessage {
    pub id: String,
    pub subject: String,
    pub from: String,
    pub date: String,
    pub internal_date: Option<i64>,
    pub body_text: String,
    pub body_html: String,
}

impl EmailMessage {
    /// Decode a raw message: walk the MIME tree and pick out the first
    /// text/plain and text/html bodies. Undecodable part data is skipped,
    /// never fatal.
    pub fn from_raw(raw: RawMessage) -> Self {
        let mut body_text = String::new();
        let mut body_html = String::new();
        extract_parts(&raw.payload, &mut body_text, &mut body_html);

        EmailMessage {
            id: raw.id,
            subject: strip_invisible(&decode_entities(&raw.subject)),
            from: raw.from,
            date: raw.date,
            internal_date: raw.internal_date,
            body_text,
            body_html,
        }
    }
}

fn extract_parts(part: &MimePart, body_text: &mut String, body_html: &mut String) {
    if let Some(data) = &part.data {
        if let Ok(bytes) = base64::engine::general_purpose::URL_SAFE.decode(data.as_bytes()) {
            let decoded = String::from_utf8_lossy(&bytes);
            match part.mime_type.as_str() {
                "text/plain" => *body_text = decoded.into_owned(),
                "text/html" => *body_html = decoded.into_owned(),
                _ => {}
            }
        }
    }
    for child in &part.parts {
        extract_parts(child, body_text, body_html);
    }
}

/// Decode quoted-printable content: remove soft line breaks, then decode
/// `=XX` hex escapes. Malformed escapes pass through as literal text.
pub fn decode_quoted_printable(input: &str) -> String {
    let cleaned = SOFT_BREAK_REGEX.replace_all(input, "");
    if !cleaned.contains('=') {
        return cleaned.into_owned();
    }

    fn hex_val(b: u8) -> Option<u8> {
        match b {
            b'0'..=b'9' => Some(b - b'0'),
            b'A'..=b'F' => Some(b - b'A' + 10),
            b'a'..=b'f' => Some(b - b'a' + 10),
            _ => None,
        }
    }

    let bytes = cleaned.as_bytes();
    let mut out: Vec<u8> = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'=' && i + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex_val(bytes[i + 1]), hex_val(bytes[i + 2])) {
                out.push((hi << 4) | lo);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// Extract a sender tag from a From header: mapping table first, then the
/// address local part with any plus-suffix stripped.
pub fn extract_sender_tag(from: &str) -> String {
    if from.is_empty() {
        return "unknown".to_string();
    }

    let addr = ANGLE_ADDR_REGEX
        .captures(from)
        .map(|caps| caps[1].to_string())
        .unwrap_or_else(|| from.to_string());
    let addr_lower = addr.to_lowercase();

    for (email, display) in SOURCE_MAPPING {
        if addr_lower.contains(email) {
            return display.to_string();
        }
    }

    if let Some(caps) = LOCAL_PART_REGEX.captures(&addr) {
        let tag = caps[1].to_lowercase();
        return tag.split('+').next().unwrap_or(&tag).to_string();
    }

    "unknown".to_string()
}

/// Content fingerprint for dedup against history: a truncated SHA-256 over
/// subject, sender tag and the day portion of the date. Stable across runs.
pub fn content_fingerprint(subject: &str, sender_tag: &str, date_str: &str) -> String {
    let day = date_str.get(..10).unwrap_or(date_str);
    let mut hasher = Sha256::new();
    hasher.update(format!("{}|{}|{}", subject, sender_tag, day).as_bytes());
    let digest = hasher.finalize();
    let hex: String = digest.iter().map(|b| format!("{:02x}", b)).collect();
    hex[..16].to_string()
}

/// Find the canonical article URL in a message body, query string stripped.
pub fn extract_article_url(text: &str) -> Option<String> {
    for (pattern, grouped) in ARTICLE_URL_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(text) {
            let url = if *grouped {
                caps.get(1).map(|m| m.as_str())?
            } else {
                caps.get(0).map(|m| m.as_str())?
            };
            return Some(urls::strip_query(url));
        }
    }
    None
}

/// Platform welcome emails are never synced
pub fn is_welcome_email(subject: &str) -> bool {
    subject.to_lowercase().starts_with("welcome to ")
}

/// Chat threads get a distinct type tag in the store
pub fn is_chat_thread(subject: &str, article_url: Option<&str>) -> bool {
    subject.to_lowercase().contains("new thread from")
        || article_url.is_some_and(|url| url.contains("/chat/"))
}

/// Boundary to the message provider. Retrieval itself (OAuth, provider
/// queries) stays outside this repo; the pipeline only needs something that
/// yields decoded messages.
#[async_trait]
pub trait MessageSource: Send + Sync {
    /// Fetch up to `max` messages, newest first
    async fn fetch(&self, max: usize) -> Result<Vec<EmailMessage>>;
}

/// File-backed message source: a JSON array of raw messages with their
/// bodies still base64url-encoded, as exported from the provider.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileSource { path: path.into() }
    }
}

#[async_trait]
impl MessageSource for FileSource {
    async fn fetch(&self, max: usize) -> Result<Vec<EmailMessage>> {
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read message file: {}", self.path.display()))?;
        let raw: Vec<RawMessage> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse message file: {}", self.path.display()))?;
        Ok(raw
            .into_iter()
            .take(max)
            .map(EmailMessage::from_raw)
            .collect())
    }
}
