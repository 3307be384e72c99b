use once_cell::sync::Lazy;
use regex::Regex;

// @module: Numbered-marker oracle protocol - serialize and defensive parse

// @const: A [Pk] marker anywhere in an oracle response
static MARKER_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[P(\d+)\]").unwrap());

/// Serialize a batch of unit texts as a numbered payload:
/// `[P1] <text1>\n[P2] <text2>\n...`. Numbering is 1-indexed and stable
/// within the batch only.
pub fn serialize_units<S: AsRef<str>>(texts: &[S]) -> String {
    texts
        .iter()
        .enumerate()
        .map(|(i, t)| format!("[P{}] {}", i + 1, t.as_ref()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parse an oracle response against a batch of `count` units.
///
/// The response is free-form: markers may be missing, duplicated, out of
/// range or reordered. Each `[Pk]` with `1 <= k <= count` claims the text up
/// to the next marker (or end of response); the first occurrence of a
/// marker wins. Units with no recoverable marker resolve to None - partial
/// success is the normal outcome, never an error.
pub fn parse_response(response: &str, count: usize) -> Vec<Option<String>> {
    let mut translations: Vec<Option<String>> = vec![None; count];
    if response.is_empty() || count == 0 {
        return translations;
    }

    let markers: Vec<(usize, usize, usize)> = MARKER_REGEX
        .captures_iter(response)
        .filter_map(|caps| {
            let m = caps.get(0)?;
            let k: usize = caps[1].parse().ok()?;
            Some((m.start(), m.end(), k))
        })
        .collect();

    for (i, &(_, content_start, k)) in markers.iter().enumerate() {
        if k == 0 || k > count {
            continue;
        }
        let content_end = markers
            .get(i + 1)
            .map(|&(next_start, _, _)| next_start)
            .unwrap_or(response.len());
        let content = response[content_start..content_end].trim();
        if content.is_empty() {
            continue;
        }
        let slot = &mut translations[k - 1];
        if slot.is_none() {
            *slot = Some(content.to_string());
        }
    }

    translations
}
