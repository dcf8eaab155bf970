//! Risk/valuation resolution: one provider lookup per symbol, with every
//! field independently defaulted from the static tables when the provider
//! omits it or the call fails. Total — never returns an error.

use crate::MarketClient;
use portfolio_core::{is_crypto, is_etf, MetricDefaults, RiskMetrics, SymbolInfo};

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

pub struct RiskFetcher {
    client: MarketClient,
    defaults: MetricDefaults,
}

impl RiskFetcher {
    pub fn new(client: MarketClient, defaults: MetricDefaults) -> Self {
        Self { client, defaults }
    }

    /// Fetch metrics for a symbol: single round trip, no retry. A provider
    /// failure is logged and resolved against the fallback tables.
    pub async fn fetch(&self, symbol: &str) -> RiskMetrics {
        match self.client.info(symbol).await {
            Ok(info) => self.resolve(symbol, Some(&info)),
            Err(e) => {
                tracing::warn!("Failed to get information for {}: {}", symbol, e);
                self.resolve(symbol, None)
            }
        }
    }

    /// Resolve metrics from an already-fetched info record. Each field is
    /// resolved on its own: a record that carries beta but no P/E takes the
    /// provider beta and the table P/E.
    pub fn resolve(&self, symbol: &str, info: Option<&SymbolInfo>) -> RiskMetrics {
        let crypto = is_crypto(symbol);
        let etf = is_etf(symbol);

        let beta = info
            .and_then(|i| i.beta)
            .map(round2)
            .unwrap_or_else(|| self.defaults.beta_for(symbol));

        // Crypto has no earnings, so P/E is 0 by definition
        let pe = if crypto {
            0.0
        } else {
            info.and_then(|i| i.trailing_pe)
                .map(round2)
                .unwrap_or_else(|| self.defaults.pe_for(symbol))
        };

        // Hundred-millions units
        let market_cap = info
            .and_then(|i| i.market_cap)
            .map(|v| round1(v / 1e8))
            .unwrap_or_else(|| self.defaults.market_cap_for(symbol));

        // Neither crypto nor ETFs pay dividends here
        let dividend_yield = if crypto || etf {
            0.0
        } else {
            info.and_then(|i| i.dividend_yield)
                .map(|v| round2(v * 100.0))
                .unwrap_or_else(|| self.defaults.dividend_yield_for(symbol))
        };

        RiskMetrics {
            beta,
            pe,
            market_cap,
            dividend_yield,
        }
    }
}
