//! Symbol classification over static tables. Pure and total: every input
//! symbol gets exactly one type, sector, and region.

use crate::types::{AssetClassification, AssetType, Region};

/// Base crypto tickers recognized without a quote-currency suffix.
const CRYPTO_BASES: &[&str] = &["BTC", "ETH", "BNB"];

/// Fixed ETF allow-list.
const ETF_SYMBOLS: &[&str] = &["SPY", "VOO", "QQQ", "IWM", "DIA"];

/// US-listed symbols for the region breakdown.
const US_SYMBOLS: &[&str] = &["AAPL", "MSFT", "NVDA", "GOOGL", "AMZN", "TSLA", "SPY"];

/// Provider sector name -> display sector name.
const SECTOR_SYNONYMS: &[(&str, &str)] = &[
    ("Technology", "Technology"),
    ("Consumer Cyclical", "Consumer Discretionary"),
    ("Financial Services", "Financials"),
    ("Healthcare", "Healthcare"),
    ("Energy", "Energy"),
    ("Consumer Defensive", "Consumer Staples"),
    ("Industrials", "Industrials"),
    ("Real Estate", "Real Estate"),
    ("Utilities", "Utilities"),
    ("Communication Services", "Communications"),
    ("Basic Materials", "Materials"),
];

/// Per-symbol sector fallback when the provider has nothing.
const SECTOR_FALLBACK: &[(&str, &str)] = &[
    ("AAPL", "Technology"),
    ("MSFT", "Technology"),
    ("NVDA", "Technology"),
    ("GOOGL", "Technology"),
    ("AMZN", "Consumer Discretionary"),
    ("TSLA", "Automotive"),
    ("SPY", "ETF"),
    ("BTC-USD", "Crypto"),
];

/// Sector bucket for symbols in no table at all.
pub const SECTOR_OTHER: &str = "Other";

pub fn is_crypto(symbol: &str) -> bool {
    symbol.contains("-USD") || CRYPTO_BASES.contains(&symbol)
}

pub fn is_etf(symbol: &str) -> bool {
    ETF_SYMBOLS.contains(&symbol)
}

/// Classify a symbol's asset type. Crypto wins over ETF, ETF over Stock.
pub fn asset_type(symbol: &str) -> AssetType {
    if is_crypto(symbol) {
        AssetType::Cryptocurrency
    } else if is_etf(symbol) {
        AssetType::Etf
    } else {
        AssetType::Stock
    }
}

/// Resolve a display sector. The provider sector (when present) is
/// translated through the synonym table, passing through verbatim when
/// unmapped; otherwise the static per-symbol table applies; otherwise the
/// generic "Other" bucket. Never fails.
pub fn sector(symbol: &str, provider_sector: Option<&str>) -> String {
    if let Some(raw) = provider_sector {
        return SECTOR_SYNONYMS
            .iter()
            .find(|(provider, _)| *provider == raw)
            .map(|(_, display)| (*display).to_string())
            .unwrap_or_else(|| raw.to_string());
    }
    SECTOR_FALLBACK
        .iter()
        .find(|(s, _)| *s == symbol)
        .map(|(_, sec)| (*sec).to_string())
        .unwrap_or_else(|| SECTOR_OTHER.to_string())
}

/// Region bucket for a symbol. Crypto and unrecognized symbols both land
/// in Other.
pub fn region(symbol: &str) -> Region {
    if US_SYMBOLS.contains(&symbol) {
        Region::US
    } else {
        Region::Other
    }
}

/// Full classification for a symbol, with an optional provider sector
/// for enrichment.
pub fn classify(symbol: &str, provider_sector: Option<&str>) -> AssetClassification {
    AssetClassification {
        asset_type: asset_type(symbol),
        sector: sector(symbol, provider_sector),
        region: region(symbol),
    }
}
