//! Allocation breakdowns and the portfolio-level risk summary, all in
//! units of portfolio weight (percent).

use crate::weights::{weighted_aggregate, weighted_aggregate_contributing};
use portfolio_core::{asset_type, is_crypto, region, AssetType, Holding, Region, RiskMetrics};
use serde::Serialize;
use std::collections::HashMap;

/// Weight-sum buckets per asset type.
pub fn by_asset_type(holdings: &[Holding]) -> HashMap<AssetType, f64> {
    let mut buckets: HashMap<AssetType, f64> = HashMap::new();
    for h in holdings {
        *buckets.entry(asset_type(&h.symbol)).or_insert(0.0) += h.weight;
    }
    buckets
}

/// Weight-sum buckets per sector. ETFs and crypto are excluded: they have
/// no meaningful single sector.
pub fn by_sector<F>(holdings: &[Holding], sector_of: F) -> HashMap<String, f64>
where
    F: Fn(&str) -> String,
{
    let mut buckets: HashMap<String, f64> = HashMap::new();
    for h in holdings {
        if asset_type(&h.symbol) == AssetType::Etf || is_crypto(&h.symbol) {
            continue;
        }
        *buckets.entry(sector_of(&h.symbol)).or_insert(0.0) += h.weight;
    }
    buckets
}

/// Weight-sum buckets per region. All four buckets are always present.
pub fn by_region(holdings: &[Holding]) -> HashMap<Region, f64> {
    let mut buckets: HashMap<Region, f64> = HashMap::new();
    for r in [Region::US, Region::Europe, Region::Asia, Region::Other] {
        buckets.insert(r, 0.0);
    }
    for h in holdings {
        *buckets.entry(region(&h.symbol)).or_insert(0.0) += h.weight;
    }
    buckets
}

/// Qualitative band for a portfolio beta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskBand {
    Low,
    Medium,
    Elevated,
}

impl RiskBand {
    pub fn from_beta(beta: f64) -> Self {
        if beta < 0.8 {
            RiskBand::Low
        } else if beta < 1.2 {
            RiskBand::Medium
        } else {
            RiskBand::Elevated
        }
    }
}

/// Portfolio-level weighted risk figures plus sorted per-symbol tables.
#[derive(Debug, Clone, Serialize)]
pub struct RiskSummary {
    pub portfolio_beta: f64,
    /// None when no holding contributes a P/E (all-crypto portfolio).
    pub portfolio_pe: Option<f64>,
    pub portfolio_dividend_yield: f64,
    pub risk_band: RiskBand,
    /// (symbol, beta), descending.
    pub betas: Vec<(String, f64)>,
    /// (symbol, pe), descending; zero-P/E symbols omitted.
    pub pes: Vec<(String, f64)>,
}

/// Aggregate per-symbol metrics into the portfolio view. Beta and
/// dividend yield average over every holding (missing values are already
/// zero-defaulted in `RiskMetrics`); P/E averages over contributing
/// holdings only, renormalized by their weight.
pub fn risk_summary(holdings: &[Holding], metrics: &HashMap<String, RiskMetrics>) -> RiskSummary {
    let beta_of = |s: &str| metrics.get(s).map(|m| m.beta).unwrap_or(0.0);
    let dividend_of = |s: &str| metrics.get(s).map(|m| m.dividend_yield).unwrap_or(0.0);
    let pe_of = |s: &str| {
        metrics
            .get(s)
            .map(|m| m.pe)
            .filter(|pe| *pe > 0.0)
    };

    let portfolio_beta = weighted_aggregate(holdings, beta_of);
    let portfolio_pe = weighted_aggregate_contributing(holdings, pe_of);
    let portfolio_dividend_yield = weighted_aggregate(holdings, dividend_of);

    let mut betas: Vec<(String, f64)> = holdings
        .iter()
        .map(|h| (h.symbol.clone(), beta_of(&h.symbol)))
        .collect();
    betas.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    let mut pes: Vec<(String, f64)> = holdings
        .iter()
        .filter_map(|h| pe_of(&h.symbol).map(|pe| (h.symbol.clone(), pe)))
        .collect();
    pes.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    RiskSummary {
        portfolio_beta,
        portfolio_pe,
        portfolio_dividend_yield,
        risk_band: RiskBand::from_beta(portfolio_beta),
        betas,
        pes,
    }
}
