/*!
 * Tests for ticker extraction
 */

use lettersync::tickers::{extract_tickers, match_company_to_ticker};

/// Cashtags in the known-symbol set are extracted, sorted and deduplicated
#[test]
fn test_extract_tickers_withCashtags_shouldExtractKnownSymbols() {
    let tickers = extract_tickers(
        "$NVDA earnings preview",
        "<p>We stay long $NVDA and $TSM into the print.</p>",
    );
    assert_eq!(tickers, vec!["NVDA".to_string(), "TSM".to_string()]);
}

/// Acronym noise and unknown symbols never match
#[test]
fn test_extract_tickers_withAcronyms_shouldExcludeThem() {
    let tickers = extract_tickers(
        "The $CEO question and $GDP trends",
        "<p>$AI spending, $ZZZZ is not a symbol.</p>",
    );
    assert!(tickers.is_empty());
}

/// The Research|XXXX: subject convention contributes a ticker
#[test]
fn test_extract_tickers_withResearchSubject_shouldCaptureSymbol() {
    let tickers = extract_tickers("Research|ANET: Q3 deep dive", "");
    assert_eq!(tickers, vec!["ANET".to_string()]);
}

/// Company display names map to their primary ticker
#[test]
fn test_match_company_to_ticker_withKnownNames_shouldResolve() {
    assert_eq!(match_company_to_ticker("Nvidia"), Some("NVDA"));
    assert_eq!(match_company_to_ticker("  taiwan semiconductor "), Some("TSM"));
    assert_eq!(match_company_to_ticker("Unknown Corp"), None);
}
