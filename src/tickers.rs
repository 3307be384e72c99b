use std::collections::{BTreeSet, HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;

// @module: Stock ticker extraction from subjects and bodies

// @const: Known tradable symbols; cashtags outside this set are ignored
static STOCK_TICKERS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "AAPL", "MSFT", "GOOGL", "GOOG", "AMZN", "META", "TSLA", "NFLX", "NVDA", "AMD", "INTC",
        "TSM", "ASML", "AVGO", "QCOM", "AMAT", "LRCX", "KLAC", "MRVL", "ADI", "NXPI",
        "TXN", "MCHP", "TER", "SNPS", "CDNS", "ARM", "SWKS", "MPWR",
        "COHR", "LITE", "CIEN", "ANET", "CSCO", "KEYS", "FFIV", "JNPR",
        "SMCI", "DELL", "HPE", "HPQ", "IBM", "NTAP", "WDC", "STX",
        "CRM", "ORCL", "NOW", "SNOW", "PLTR", "PATH", "WDAY", "ADBE", "INTU", "PANW", "CRWD",
        "FTNT", "NET", "MDB", "DDOG", "TEAM", "VEEV", "AKAM", "EPAM", "CTSH",
        "ACN", "GDDY", "VRSN", "CSGP", "MSCI", "FICO", "PAYC", "PAYX", "ADP",
        "FDS", "JKHY", "FIS", "FISV", "GPN", "CPAY",
        "APP", "UBER", "ABNB", "BKNG", "EXPE", "DASH", "EBAY", "ETSY", "PYPL", "COIN",
        "HOOD", "TTD", "ROKU", "SPOT", "PINS", "SNAP", "MTCH", "TTWO", "RBLX",
        "BABA", "PDD", "BIDU", "NIO", "XPEV", "BILI", "TME", "NTES",
        "RIVN", "LCID", "APTV",
        "LLY", "UNH", "JNJ", "MRK", "ABBV", "PFE", "BMY", "AMGN", "GILD", "VRTX", "REGN",
        "JPM", "BAC", "WFC", "BLK", "KKR", "APO", "ARES", "SCHW",
        "GEV", "HON", "CAT", "RTX", "LMT", "NOC", "LHX", "HII",
        "XOM", "CVX", "COP", "OXY", "EOG", "DVN", "FANG", "MPC", "VLO", "PSX", "SLB",
        "NEE", "DUK", "AEP", "EXC", "SRE", "PCG", "XEL", "WEC", "VST", "CEG",
        "LIN", "APD", "SHW", "ECL", "DOW", "PPG", "NUE", "STLD", "VMC", "MLM",
        "KO", "PEP", "COST", "WMT", "TGT", "LOW", "DLTR",
        "AMT", "CCI", "SBAC", "PLD", "EQIX", "DLR", "PSA", "EXR", "SPG", "VICI",
        "DIS", "CMCSA", "CHTR", "WBD", "PARA", "FOX", "FOXA", "NWS", "NWSA", "LYV", "TKO",
    ]
    .into_iter()
    .collect()
});

// @const: All-caps tokens that look like cashtags but never are
static EXCLUDED_ACRONYMS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "CEO", "CFO", "COO", "CTO", "IPO", "GDP", "CPI", "PPI",
        "ETF", "USD", "EUR", "JPY", "GBP", "CNY", "API", "AI",
        "YTD", "QOQ", "YOY", "MOM", "BPS", "EPS", "ROE", "ROA",
        "SEC", "FED", "ECB", "BOJ", "PMI", "ISM", "FOMC",
        "BUY", "SELL", "HOLD", "NEW", "THE", "AND", "FOR",
        "GPU", "CPU", "TPU", "RAM", "SSD", "LLM", "NLP",
        "OIL", "GAS", "GOLD", "COAL", "CES", "USA", "UK", "EU",
    ]
    .into_iter()
    .collect()
});

// @const: Lowercased company names mapped to their primary ticker
static COMPANY_MAPPINGS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    [
        ("apple", "AAPL"), ("microsoft", "MSFT"), ("google", "GOOGL"), ("alphabet", "GOOGL"),
        ("amazon", "AMZN"), ("meta", "META"), ("facebook", "META"), ("nvidia", "NVDA"),
        ("tesla", "TSLA"), ("netflix", "NFLX"), ("adobe", "ADBE"), ("salesforce", "CRM"),
        ("oracle", "ORCL"), ("intel", "INTC"), ("amd", "AMD"), ("advanced micro devices", "AMD"),
        ("qualcomm", "QCOM"), ("broadcom", "AVGO"), ("cisco", "CSCO"), ("ibm", "IBM"),
        ("asml", "ASML"), ("tsmc", "TSM"), ("taiwan semiconductor", "TSM"),
        ("micron", "MU"), ("applied materials", "AMAT"), ("lam research", "LRCX"),
        ("marvell", "MRVL"), ("arm", "ARM"), ("synopsys", "SNPS"), ("cadence", "CDNS"),
        ("jpmorgan", "JPM"), ("jp morgan", "JPM"), ("goldman", "GS"), ("goldman sachs", "GS"),
        ("morgan stanley", "MS"), ("bank of america", "BAC"), ("citigroup", "C"),
        ("wells fargo", "WFC"), ("blackrock", "BLK"), ("visa", "V"), ("mastercard", "MA"),
        ("disney", "DIS"), ("warner", "WBD"), ("comcast", "CMCSA"), ("spotify", "SPOT"),
        ("walmart", "WMT"), ("costco", "COST"), ("target", "TGT"), ("home depot", "HD"),
        ("starbucks", "SBUX"), ("mcdonald", "MCD"), ("nike", "NKE"), ("lululemon", "LULU"),
        ("alibaba", "BABA"), ("tencent", "TCEHY"), ("baidu", "BIDU"), ("pinduoduo", "PDD"),
        ("palantir", "PLTR"), ("snowflake", "SNOW"), ("datadog", "DDOG"), ("crowdstrike", "CRWD"),
        ("airbnb", "ABNB"), ("uber", "UBER"), ("doordash", "DASH"), ("applovin", "APP"),
    ]
    .into_iter()
    .collect()
});

// @const: $-prefixed cashtag
static CASHTAG_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$([A-Z]{2,6})\b").unwrap());

// @const: "Research|XXXX:" subject convention used by some publishers
static RESEARCH_SUBJECT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Research\|([A-Z]{2,6}):").unwrap());

/// Look up a company display name's primary ticker
pub fn match_company_to_ticker(name: &str) -> Option<&'static str> {
    COMPANY_MAPPINGS.get(name.trim().to_lowercase().as_str()).copied()
}

/// Extract mentioned tickers from a subject line and HTML body: cashtags
/// checked against the known-symbol set (minus acronym noise) plus the
/// Research-subject convention. Sorted and deduplicated.
pub fn extract_tickers(subject: &str, html_body: &str) -> Vec<String> {
    let mut found: BTreeSet<String> = BTreeSet::new();
    let haystack = format!("{} {}", subject, html_body);

    for caps in CASHTAG_REGEX.captures_iter(&haystack) {
        let ticker = &caps[1];
        if !EXCLUDED_ACRONYMS.contains(ticker) && STOCK_TICKERS.contains(ticker) {
            found.insert(ticker.to_string());
        }
    }

    if let Some(caps) = RESEARCH_SUBJECT_REGEX.captures(subject) {
        let ticker = &caps[1];
        if !EXCLUDED_ACRONYMS.contains(ticker) {
            found.insert(ticker.to_string());
        }
    }

    found.into_iter().collect()
}
