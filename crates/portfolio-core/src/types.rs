use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Broad asset class of a ticker symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetType {
    Stock,
    Etf,
    Cryptocurrency,
}

impl AssetType {
    /// Get human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            AssetType::Stock => "Stock",
            AssetType::Etf => "ETF",
            AssetType::Cryptocurrency => "Cryptocurrency",
        }
    }
}

/// Home-region bucket for allocation breakdowns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    US,
    Europe,
    Asia,
    Other,
}

impl Region {
    pub fn name(&self) -> &'static str {
        match self {
            Region::US => "US",
            Region::Europe => "Europe",
            Region::Asia => "Asia",
            Region::Other => "Other",
        }
    }
}

/// Derived classification of a symbol. Computed on demand, never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetClassification {
    pub asset_type: AssetType,
    pub sector: String,
    pub region: Region,
}

/// Single position in a portfolio: a symbol and its percentage weight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Holding {
    pub symbol: String,
    pub weight: f64,
}

/// Named collection of holdings. Insertion order is preserved for display;
/// symbol uniqueness is enforced by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Portfolio {
    pub name: String,
    pub holdings: Vec<Holding>,
}

impl Portfolio {
    pub fn new(name: impl Into<String>, holdings: Vec<Holding>) -> Self {
        Self {
            name: name.into(),
            holdings,
        }
    }

    pub fn symbols(&self) -> Vec<String> {
        self.holdings.iter().map(|h| h.symbol.clone()).collect()
    }

    pub fn weight_of(&self, symbol: &str) -> Option<f64> {
        self.holdings
            .iter()
            .find(|h| h.symbol == symbol)
            .map(|h| h.weight)
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.holdings.iter().any(|h| h.symbol == symbol)
    }

    pub fn total_weight(&self) -> f64 {
        self.holdings.iter().map(|h| h.weight).sum()
    }
}

/// Per-symbol risk and valuation figures. Always fully populated: every
/// field falls back to a static default when the provider omits it.
/// Market cap is expressed in hundred-millions of dollars; dividend yield
/// is a percentage.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RiskMetrics {
    pub beta: f64,
    pub pe: f64,
    pub market_cap: f64,
    pub dividend_yield: f64,
}

/// Metadata record from the market-data provider. Fields are present or
/// absent unpredictably on the wire, so every consumer must default each
/// field explicitly rather than assume presence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SymbolInfo {
    pub symbol: Option<String>,
    pub short_name: Option<String>,
    pub sector: Option<String>,
    pub beta: Option<f64>,
    pub trailing_pe: Option<f64>,
    pub market_cap: Option<f64>,
    pub dividend_yield: Option<f64>,
    pub regular_market_price: Option<f64>,
    pub regular_market_previous_close: Option<f64>,
}

/// OHLCV bar data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Latest price snapshot: last close versus the previous close.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    pub symbol: String,
    pub short_name: Option<String>,
    pub price: f64,
    pub change: f64,
    pub change_percent: f64,
}

/// One aggregated news article, matched back to a held symbol where the
/// title allows it ("OTHER" otherwise).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub date: String,
    pub symbol: String,
    pub asset_type: Option<AssetType>,
    pub title: String,
    pub author: String,
    pub content: String,
    pub url: String,
}

/// One page of news results with the provider's total match count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsPage {
    pub items: Vec<NewsItem>,
    pub total: u64,
}
