//! HTML entity decoding and invisible-character stripping.
//!
//! Newsletter HTML only uses a bounded vocabulary of entities, so this is a
//! small hand-rolled decoder rather than a full HTML5 named-reference table.
//! Numeric references (decimal and hex) are decoded in full.

/// Named entities seen in newsletter markup. Unknown names pass through
/// unchanged rather than being dropped.
fn named_entity(name: &str) -> Option<&'static str> {
    let decoded = match name {
        "amp" => "&",
        "lt" => "<",
        "gt" => ">",
        "quot" => "\"",
        "apos" => "'",
        "nbsp" => "\u{a0}",
        "ndash" => "\u{2013}",
        "mdash" => "\u{2014}",
        "lsquo" => "\u{2018}",
        "rsquo" => "\u{2019}",
        "ldquo" => "\u{201c}",
        "rdquo" => "\u{201d}",
        "hellip" => "\u{2026}",
        "bull" => "\u{2022}",
        "middot" => "\u{b7}",
        "copy" => "\u{a9}",
        "reg" => "\u{ae}",
        "trade" => "\u{2122}",
        "deg" => "\u{b0}",
        "plusmn" => "\u{b1}",
        "times" => "\u{d7}",
        "divide" => "\u{f7}",
        "frac12" => "\u{bd}",
        "frac14" => "\u{bc}",
        "cent" => "\u{a2}",
        "pound" => "\u{a3}",
        "euro" => "\u{20ac}",
        "yen" => "\u{a5}",
        "sect" => "\u{a7}",
        "para" => "\u{b6}",
        "dagger" => "\u{2020}",
        "Dagger" => "\u{2021}",
        "permil" => "\u{2030}",
        "prime" => "\u{2032}",
        "Prime" => "\u{2033}",
        "larr" => "\u{2190}",
        "uarr" => "\u{2191}",
        "rarr" => "\u{2192}",
        "darr" => "\u{2193}",
        "zwnj" => "\u{200c}",
        "zwj" => "\u{200d}",
        "shy" => "\u{ad}",
        _ => return None,
    };
    Some(decoded)
}

/// Decode a numeric character reference body ("#65" or "#x41")
fn numeric_entity(body: &str) -> Option<char> {
    let digits = body.strip_prefix('#')?;
    let code = if let Some(hex) = digits.strip_prefix('x').or_else(|| digits.strip_prefix('X')) {
        u32::from_str_radix(hex, 16).ok()?
    } else {
        digits.parse::<u32>().ok()?
    };
    char::from_u32(code)
}

/// Decode HTML entities in `input`.
///
/// Malformed references (no terminating `;` within a short span, unknown
/// names, invalid code points) are left as literal text.
pub fn decode_entities(input: &str) -> String {
    if !input.contains('&') {
        return input.to_string();
    }

    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        // An entity body is short; cap the scan so stray ampersands in prose
        // never swallow large spans.
        match tail.find(';') {
            Some(end) if end > 1 && end <= 11 => {
                let body = &tail[1..end];
                if let Some(ch) = numeric_entity(body) {
                    out.push(ch);
                    rest = &tail[end + 1..];
                } else if let Some(s) = named_entity(body) {
                    out.push_str(s);
                    rest = &tail[end + 1..];
                } else {
                    out.push('&');
                    rest = &tail[1..];
                }
            }
            _ => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Whether `c` is an invisible formatting character that must never survive
/// into run text: zero-width spaces and joiners, soft hyphen, word joiner,
/// BOM, combining grapheme joiner, and the bidi/format controls.
pub fn is_invisible(c: char) -> bool {
    matches!(
        c,
        '\u{ad}'            // soft hyphen
        | '\u{34f}'         // combining grapheme joiner
        | '\u{200b}'..='\u{200f}' // zero-width space/joiners, bidi marks
        | '\u{2028}'..='\u{202f}' // line/para separators, bidi embeddings
        | '\u{205f}'..='\u{206f}' // math space, word joiner, invisible operators
        | '\u{feff}'        // BOM
    )
}

/// Strip invisible formatting characters from `input`.
pub fn strip_invisible(input: &str) -> String {
    if input.chars().any(is_invisible) {
        input.chars().filter(|c| !is_invisible(*c)).collect()
    } else {
        input.to_string()
    }
}
