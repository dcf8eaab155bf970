//! Consolidated static fallback tables for the risk/valuation resolver.
//! One table per metric, injected at construction so tests can substitute
//! their own values.

use std::collections::HashMap;

/// Fallback constants for every metric the provider may fail to supply.
/// Market caps are in hundred-millions of dollars; dividend yields are
/// percentages.
#[derive(Debug, Clone)]
pub struct MetricDefaults {
    beta: HashMap<String, f64>,
    pe: HashMap<String, f64>,
    market_cap: HashMap<String, f64>,
    dividend_yield: HashMap<String, f64>,
    pub global_beta: f64,
    pub global_pe: f64,
    pub global_market_cap: f64,
    pub global_dividend_yield: f64,
}

fn table(entries: &[(&str, f64)]) -> HashMap<String, f64> {
    entries
        .iter()
        .map(|(s, v)| (s.to_string(), *v))
        .collect()
}

impl Default for MetricDefaults {
    fn default() -> Self {
        Self {
            beta: table(&[
                ("AAPL", 1.2),
                ("MSFT", 1.1),
                ("NVDA", 2.27),
                ("GOOGL", 1.0),
                ("AMZN", 1.3),
                ("TSLA", 1.8),
                ("BTC-USD", 1.39),
            ]),
            pe: table(&[
                ("AAPL", 39.95),
                ("MSFT", 32.1),
                ("NVDA", 53.01),
                ("GOOGL", 28.7),
                ("AMZN", 41.2),
                ("TSLA", 70.5),
            ]),
            market_cap: table(&[
                ("AAPL", 30000.0),
                ("MSFT", 25000.0),
                ("NVDA", 15000.0),
                ("GOOGL", 18000.0),
                ("AMZN", 17000.0),
                ("TSLA", 8000.0),
                ("BTC-USD", 9000.0),
            ]),
            dividend_yield: table(&[
                ("AAPL", 0.6),
                ("MSFT", 0.8),
                ("NVDA", 0.1),
                ("GOOGL", 0.0),
                ("AMZN", 0.0),
                ("TSLA", 0.0),
            ]),
            global_beta: 1.0,
            global_pe: 20.0,
            global_market_cap: 5000.0,
            global_dividend_yield: 0.0,
        }
    }
}

impl MetricDefaults {
    /// Build a custom table set (for tests or alternative configs).
    pub fn new(
        beta: HashMap<String, f64>,
        pe: HashMap<String, f64>,
        market_cap: HashMap<String, f64>,
        dividend_yield: HashMap<String, f64>,
    ) -> Self {
        Self {
            beta,
            pe,
            market_cap,
            dividend_yield,
            ..Self::default()
        }
    }

    pub fn beta_for(&self, symbol: &str) -> f64 {
        self.beta.get(symbol).copied().unwrap_or(self.global_beta)
    }

    pub fn pe_for(&self, symbol: &str) -> f64 {
        self.pe.get(symbol).copied().unwrap_or(self.global_pe)
    }

    pub fn market_cap_for(&self, symbol: &str) -> f64 {
        self.market_cap
            .get(symbol)
            .copied()
            .unwrap_or(self.global_market_cap)
    }

    pub fn dividend_yield_for(&self, symbol: &str) -> f64 {
        self.dividend_yield
            .get(symbol)
            .copied()
            .unwrap_or(self.global_dividend_yield)
    }
}
