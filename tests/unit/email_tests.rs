/*!
 * Tests for email message utilities
 */

use lettersync::email::{
    content_fingerprint, decode_quoted_printable, extract_article_url, extract_sender_tag,
    is_chat_thread, is_welcome_email, EmailMessage, FileSource, MessageSource, MimePart,
    RawMessage,
};

use base64::Engine;
use tempfile::TempDir;

/// Test sender tag resolution through the mapping table
#[test]
fn test_extract_sender_tag_withKnownSender_shouldUseMappedName() {
    assert_eq!(
        extract_sender_tag("SemiAnalysis <semianalysis@substack.com>"),
        "SemiAnalysis"
    );
    assert_eq!(extract_sender_tag("citrini@substack.com"), "Citrini");
}

/// Unknown senders fall back to the address local part
#[test]
fn test_extract_sender_tag_withUnknownSender_shouldUseLocalPart() {
    assert_eq!(
        extract_sender_tag("Some Writer <newsletter@example.com>"),
        "newsletter"
    );
    assert_eq!(
        extract_sender_tag("writer+digest@example.com"),
        "writer"
    );
    assert_eq!(extract_sender_tag(""), "unknown");
}

/// Fingerprints are stable and depend on subject, sender and day
#[test]
fn test_content_fingerprint_withSameInputs_shouldBeStable() {
    let a = content_fingerprint("Weekly wrap", "Citrini", "2026-08-07T09:30");
    let b = content_fingerprint("Weekly wrap", "Citrini", "2026-08-07T18:00");
    assert_eq!(a, b, "time of day must not change the fingerprint");
    assert_eq!(a.len(), 16);

    let c = content_fingerprint("Weekly wrap", "Citrini", "2026-08-08T09:30");
    assert_ne!(a, c, "a different day must change the fingerprint");
    let d = content_fingerprint("Weekly wrap", "Oreo", "2026-08-07T09:30");
    assert_ne!(a, d, "a different sender must change the fingerprint");
}

/// Quoted-printable hex escapes and soft breaks decode correctly
#[test]
fn test_decode_quoted_printable_withEscapes_shouldDecode() {
    assert_eq!(decode_quoted_printable("a=20b"), "a b");
    assert_eq!(decode_quoted_printable("one=\r\ntwo"), "onetwo");
    assert_eq!(decode_quoted_printable("50=25 off"), "50% off");
    // Malformed escapes pass through
    assert_eq!(decode_quoted_printable("a=zzb"), "a=zzb");
}

/// Article URLs are found via the browser-view phrasing, query stripped
#[test]
fn test_extract_article_url_withViewInBrowser_shouldCaptureUrl() {
    let body = "View in browser (https://example.substack.com/p/the-post?utm=email)";
    assert_eq!(
        extract_article_url(body).as_deref(),
        Some("https://example.substack.com/p/the-post")
    );
}

/// Bare substack post URLs are matched directly
#[test]
fn test_extract_article_url_withBareSubstackUrl_shouldMatch() {
    let body = "Read it at https://semianalysis.substack.com/p/q3-earnings-preview today";
    assert_eq!(
        extract_article_url(body).as_deref(),
        Some("https://semianalysis.substack.com/p/q3-earnings-preview")
    );
    assert_eq!(extract_article_url("no links here"), None);
}

/// Welcome emails and chat threads are classified correctly
#[test]
fn test_message_classification_withSpecialSubjects_shouldDetect() {
    assert!(is_welcome_email("Welcome to SemiAnalysis!"));
    assert!(!is_welcome_email("Weekly: welcome to the new regime"));

    assert!(is_chat_thread("New thread from Citrini", None));
    assert!(is_chat_thread("Reply", Some("https://x.substack.com/chat/123")));
    assert!(!is_chat_thread("Q3 earnings", Some("https://x.substack.com/p/q3")));
}

/// The MIME part walk finds text/plain and text/html bodies at any depth
#[test]
fn test_email_from_raw_withNestedParts_shouldDecodeBodies() {
    let engine = base64::engine::general_purpose::URL_SAFE;
    let raw = RawMessage {
        id: "m1".to_string(),
        subject: "Test".to_string(),
        from: "a@b.com".to_string(),
        date: String::new(),
        internal_date: None,
        payload: MimePart {
            mime_type: "multipart/alternative".to_string(),
            data: None,
            parts: vec![
                MimePart {
                    mime_type: "text/plain".to_string(),
                    data: Some(engine.encode("plain body")),
                    parts: vec![],
                },
                MimePart {
                    mime_type: "text/html".to_string(),
                    data: Some(engine.encode("<p>html body</p>")),
                    parts: vec![],
                },
            ],
        },
    };

    let message = EmailMessage::from_raw(raw);
    assert_eq!(message.body_text, "plain body");
    assert_eq!(message.body_html, "<p>html body</p>");
}

/// The file source reads a JSON export and honors the fetch limit
#[tokio::test]
async fn test_file_source_withJsonExport_shouldDecodeMessages() {
    let engine = base64::engine::general_purpose::URL_SAFE;
    let html = engine.encode("<p>Hello world paragraph.</p>");
    let content = format!(
        r#"[
            {{"id": "m1", "subject": "First", "from": "citrini@substack.com",
              "payload": {{"mime_type": "text/html", "data": "{html}"}}}},
            {{"id": "m2", "subject": "Second", "from": "oreo521@substack.com",
              "payload": {{"mime_type": "text/html", "data": "{html}"}}}}
        ]"#
    );

    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("messages.json");
    std::fs::write(&path, content).expect("write messages");

    let source = FileSource::new(&path);
    let messages = source.fetch(1).await.expect("fetch");
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].subject, "First");
    assert_eq!(messages[0].body_html, "<p>Hello world paragraph.</p>");
}
