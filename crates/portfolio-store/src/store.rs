//! In-memory portfolio store. Portfolios live for the process lifetime;
//! "current" is a name back-reference, never an owning pointer.

use crate::weights::reconcile;
use portfolio_core::{Holding, Portfolio, StoreError};

/// Holdings of the broker-sync stub, 20% each.
const BROKER_DEMO_HOLDINGS: &[&str] = &["AAPL", "MSFT", "GOOGL", "AMZN", "TSLA"];

#[derive(Debug, Default, Clone)]
pub struct PortfolioStore {
    portfolios: Vec<Portfolio>,
    current: Option<String>,
}

impl PortfolioStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn portfolios(&self) -> &[Portfolio] {
        &self.portfolios
    }

    pub fn get(&self, name: &str) -> Option<&Portfolio> {
        self.portfolios.iter().find(|p| p.name == name)
    }

    /// Name of the currently selected portfolio, if any.
    pub fn current_name(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// The currently selected portfolio. None when nothing is selected or
    /// the selection points at a deleted portfolio.
    pub fn current(&self) -> Option<&Portfolio> {
        self.current.as_deref().and_then(|name| self.get(name))
    }

    /// Create a portfolio and make it current. Blank names and empty
    /// holdings are rejected without touching state. A weight sum off 100
    /// warns but does not block.
    pub fn create(&mut self, name: &str, holdings: Vec<Holding>) -> Result<(), StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::BlankName);
        }
        if holdings.is_empty() {
            return Err(StoreError::EmptyHoldings);
        }

        let check = reconcile(&holdings);
        if !check.valid {
            tracing::warn!(
                "Total weight is {:.1}%, please adjust to 100%",
                check.total
            );
        }

        // Same-name portfolios are replaced rather than duplicated
        self.portfolios.retain(|p| p.name != name);
        self.portfolios.push(Portfolio::new(name, holdings));
        self.current = Some(name.to_string());
        Ok(())
    }

    /// Insert an already-built portfolio (import, broker sync) and make it
    /// current.
    pub fn insert(&mut self, portfolio: Portfolio) {
        self.current = Some(portfolio.name.clone());
        self.portfolios.retain(|p| p.name != portfolio.name);
        self.portfolios.push(portfolio);
    }

    /// Delete a portfolio. Deleting the current one reverts the selection
    /// to unset; the caller re-selects.
    pub fn delete(&mut self, name: &str) -> Result<(), StoreError> {
        let before = self.portfolios.len();
        self.portfolios.retain(|p| p.name != name);
        if self.portfolios.len() == before {
            return Err(StoreError::NotFound(name.to_string()));
        }
        if self.current.as_deref() == Some(name) {
            self.current = None;
        }
        Ok(())
    }

    pub fn switch(&mut self, name: &str) -> Result<(), StoreError> {
        if self.get(name).is_none() {
            return Err(StoreError::NotFound(name.to_string()));
        }
        self.current = Some(name.to_string());
        Ok(())
    }

    /// Add a holding to a portfolio. Re-adding an existing symbol is a
    /// warned no-op; the weight is clamped so the total cannot exceed 100,
    /// and a fully allocated portfolio rejects the add outright.
    pub fn add_holding(
        &mut self,
        name: &str,
        symbol: &str,
        weight: f64,
    ) -> Result<(), StoreError> {
        if weight <= 0.0 || weight > 100.0 {
            return Err(StoreError::InvalidWeight(weight));
        }
        let portfolio = self
            .portfolios
            .iter_mut()
            .find(|p| p.name == name)
            .ok_or_else(|| StoreError::NotFound(name.to_string()))?;

        if portfolio.contains(symbol) {
            tracing::warn!("Asset already added: {}", symbol);
            return Err(StoreError::DuplicateSymbol(symbol.to_string()));
        }

        let remaining = 100.0 - portfolio.total_weight();
        if remaining <= 0.0 {
            tracing::warn!("Portfolio is already fully allocated");
            return Err(StoreError::InvalidWeight(weight));
        }
        let mut weight = weight;
        if weight > remaining {
            tracing::warn!("Weight adjusted to maximum available: {:.1}%", remaining);
            weight = remaining;
        }

        portfolio.holdings.push(Holding {
            symbol: symbol.to_string(),
            weight,
        });
        Ok(())
    }

    pub fn remove_holding(&mut self, name: &str, symbol: &str) -> Result<(), StoreError> {
        let portfolio = self
            .portfolios
            .iter_mut()
            .find(|p| p.name == name)
            .ok_or_else(|| StoreError::NotFound(name.to_string()))?;
        portfolio.holdings.retain(|h| h.symbol != symbol);
        Ok(())
    }

    /// Broker sync stub: returns the same fixed demo portfolio for every
    /// broker. No real brokerage integration exists or is intended.
    pub fn sync_from_broker(&mut self, broker: &str) -> Portfolio {
        let holdings = BROKER_DEMO_HOLDINGS
            .iter()
            .map(|s| Holding {
                symbol: s.to_string(),
                weight: 20.0,
            })
            .collect();
        let portfolio = Portfolio::new(format!("{broker} Synced Portfolio"), holdings);
        self.insert(portfolio.clone());
        portfolio
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
    fn test_create_sets_current() {
        let mut store = PortfolioStore::new();
        store
            .create("Growth", holdings(&[("AAPL", 60.0), ("MSFT", 40.0)]))
            .unwrap();
        assert_eq!(store.current_name(), Some("Growth"));
        assert_eq!(store.get("Growth").unwrap().holdings.len(), 2);
    }

    #[test]
    fn test_create_rejects_blank_name_and_empty_holdings() {
        let mut store = PortfolioStore::new();
        assert!(matches!(
            store.create("  ", holdings(&[("AAPL", 100.0)])),
            Err(StoreError::BlankName)
        ));
        assert!(matches!(
            store.create("Growth", vec![]),
            Err(StoreError::EmptyHoldings)
        ));
        assert!(store.portfolios().is_empty());
        assert!(store.current().is_none());
    }

    #[test]
    fn test_create_allows_invalid_weights_with_warning() {
        let mut store = PortfolioStore::new();
        // Warns but stores: the invariant is advisory
        store
            .create("Lopsided", holdings(&[("AAPL", 30.0)]))
            .unwrap();
        assert!(store.get("Lopsided").is_some());
    }

    #[test]
    fn test_delete_active_unsets_current() {
        let mut store = PortfolioStore::new();
        store
            .create("Growth", holdings(&[("AAPL", 100.0)]))
            .unwrap();
        store.delete("Growth").unwrap();
        assert!(store.current().is_none());
        assert!(store.current_name().is_none());
        assert!(store.portfolios().is_empty());
    }

    #[test]
    fn test_delete_inactive_keeps_current() {
        let mut store = PortfolioStore::new();
        store.create("A", holdings(&[("AAPL", 100.0)])).unwrap();
        store.create("B", holdings(&[("MSFT", 100.0)])).unwrap();
        store.delete("A").unwrap();
        assert_eq!(store.current_name(), Some("B"));
    }

    #[test]
    fn test_delete_missing_is_not_found() {
        let mut store = PortfolioStore::new();
        assert!(matches!(
            store.delete("Nope"),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn test_switch() {
        let mut store = PortfolioStore::new();
        store.create("A", holdings(&[("AAPL", 100.0)])).unwrap();
        store.create("B", holdings(&[("MSFT", 100.0)])).unwrap();
        store.switch("A").unwrap();
        assert_eq!(store.current_name(), Some("A"));
        assert!(matches!(store.switch("C"), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_add_holding_duplicate_is_noop() {
        let mut store = PortfolioStore::new();
        store.create("A", holdings(&[("AAPL", 50.0)])).unwrap();
        let err = store.add_holding("A", "AAPL", 10.0).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateSymbol(_)));
        assert_eq!(store.get("A").unwrap().holdings.len(), 1);
        assert_eq!(store.get("A").unwrap().weight_of("AAPL"), Some(50.0));
    }

    #[test]
    fn test_add_holding_clamps_to_remaining() {
        let mut store = PortfolioStore::new();
        store.create("A", holdings(&[("AAPL", 80.0)])).unwrap();
        store.add_holding("A", "MSFT", 50.0).unwrap();
        assert_eq!(store.get("A").unwrap().weight_of("MSFT"), Some(20.0));
    }

    #[test]
    fn test_add_holding_to_full_portfolio_rejected() {
        let mut store = PortfolioStore::new();
        store
            .create("Full", holdings(&[("AAPL", 60.0), ("MSFT", 40.0)]))
            .unwrap();
        assert!(matches!(
            store.add_holding("Full", "NVDA", 10.0),
            Err(StoreError::InvalidWeight(_))
        ));
        let p = store.get("Full").unwrap();
        assert_eq!(p.holdings.len(), 2);
        assert_eq!(p.total_weight(), 100.0);
    }

    #[test]
    fn test_add_holding_rejects_out_of_range_weight() {
        let mut store = PortfolioStore::new();
        store.create("A", holdings(&[("AAPL", 50.0)])).unwrap();
        assert!(matches!(
            store.add_holding("A", "MSFT", 0.0),
            Err(StoreError::InvalidWeight(_))
        ));
        assert!(matches!(
            store.add_holding("A", "MSFT", 120.0),
            Err(StoreError::InvalidWeight(_))
        ));
    }

    #[test]
    fn test_sync_from_broker_is_fixed_demo() {
        let mut store = PortfolioStore::new();
        let p = store.sync_from_broker("Fidelity");
        assert_eq!(p.name, "Fidelity Synced Portfolio");
        assert_eq!(p.holdings.len(), 5);
        assert!(p.holdings.iter().all(|h| h.weight == 20.0));
        assert_eq!(store.current_name(), Some("Fidelity Synced Portfolio"));

        // Broker identity only changes the name
        let q = store.sync_from_broker("Robinhood");
        assert_eq!(q.symbols(), p.symbols());
    }
}
