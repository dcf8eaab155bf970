//! Weight reconciliation and weighted aggregation.
//! Stateless functions — no store, no async, no external dependencies.

use portfolio_core::Holding;
use serde::Serialize;

/// Allowed deviation of the weight sum from 100%.
pub const WEIGHT_TOLERANCE: f64 = 0.1;

/// Result of validating a holdings set's weights.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct WeightCheck {
    pub valid: bool,
    pub total: f64,
}

/// Validate that weights sum to 100 within tolerance. Never blocks:
/// callers warn on `valid == false` and proceed.
pub fn reconcile(holdings: &[Holding]) -> WeightCheck {
    let total: f64 = holdings.iter().map(|h| h.weight).sum();
    WeightCheck {
        valid: (total - 100.0).abs() <= WEIGHT_TOLERANCE,
        total,
    }
}

/// Weighted sum of a per-symbol metric over every holding, weight taken
/// as percentage / 100. Missing values must be mapped to 0 by the metric
/// function (beta and dividend-yield behave this way).
pub fn weighted_aggregate<F>(holdings: &[Holding], metric: F) -> f64
where
    F: Fn(&str) -> f64,
{
    holdings
        .iter()
        .map(|h| metric(&h.symbol) * h.weight / 100.0)
        .sum()
}

/// Weighted average over only the holdings whose metric is defined,
/// renormalized by the contributing weight sum rather than the full 100%.
/// Used for portfolio P/E, where crypto holdings are excluded from both
/// numerator and denominator. Returns None when nothing contributes.
pub fn weighted_aggregate_contributing<F>(holdings: &[Holding], metric: F) -> Option<f64>
where
    F: Fn(&str) -> Option<f64>,
{
    let mut numerator = 0.0;
    let mut contributing_weight = 0.0;
    for h in holdings {
        if let Some(v) = metric(&h.symbol) {
            numerator += v * h.weight;
            contributing_weight += h.weight;
        }
    }
    if contributing_weight == 0.0 {
        None
    } else {
        Some(numerator / contributing_weight)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn holdings(entries: &[(&str, f64)]) -> Vec<Holding> {
        entries
            .iter()
            .map(|(s, w)| Holding {
                symbol: s.to_string(),
                weight: *w,
            })
            .collect()
    }

    #[test]
    fn test_reconcile_valid_at_exactly_100() {
        let check = reconcile(&holdings(&[("AAPL", 60.0), ("MSFT", 40.0)]));
        assert!(check.valid);
        assert_eq!(check.total, 100.0);
    }

    #[test]
    fn test_reconcile_valid_within_tolerance() {
        assert!(reconcile(&holdings(&[("AAPL", 50.05), ("MSFT", 50.0)])).valid);
        assert!(!reconcile(&holdings(&[("AAPL", 50.2), ("MSFT", 50.0)])).valid);
        assert!(!reconcile(&holdings(&[("AAPL", 30.0)])).valid);
    }

    #[test]
    fn test_reconcile_empty_is_invalid() {
        let check = reconcile(&[]);
        assert!(!check.valid);
        assert_eq!(check.total, 0.0);
    }

    #[test]
    fn test_weighted_average_identity() {
        // Equal weights, constant metric: the aggregate is the constant
        let h = holdings(&[("A", 25.0), ("B", 25.0), ("C", 25.0), ("D", 25.0)]);
        let agg = weighted_aggregate(&h, |_| 1.5);
        assert!((agg - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_weighted_aggregate_includes_zero_defaults() {
        // Dividend-style aggregate: crypto contributes 0 but stays in the
        // denominator (weights divide by the full 100)
        let h = holdings(&[("AAPL", 50.0), ("BTC-USD", 50.0)]);
        let agg = weighted_aggregate(&h, |s| if s == "AAPL" { 0.6 } else { 0.0 });
        assert!((agg - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_contributing_aggregate_renormalizes() {
        // P/E-style aggregate: crypto leaves numerator and denominator
        let h = holdings(&[("AAPL", 50.0), ("BTC-USD", 50.0)]);
        let agg = weighted_aggregate_contributing(&h, |s| {
            if s == "AAPL" {
                Some(40.0)
            } else {
                None
            }
        });
        assert_eq!(agg, Some(40.0));
    }

    #[test]
    fn test_contributing_aggregate_mixed_weights() {
        let h = holdings(&[("A", 60.0), ("B", 20.0), ("C", 20.0)]);
        let agg = weighted_aggregate_contributing(&h, |s| match s {
            "A" => Some(10.0),
            "B" => Some(30.0),
            _ => None,
        });
        // (10*60 + 30*20) / (60 + 20) = 1200 / 80
        assert_eq!(agg, Some(15.0));
    }

    #[test]
    fn test_contributing_aggregate_none_when_empty() {
        let h = holdings(&[("BTC-USD", 100.0)]);
        assert_eq!(weighted_aggregate_contributing(&h, |_| None), None);
    }
}
