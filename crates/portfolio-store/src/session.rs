//! Explicit application-state struct replacing the original's process-wide
//! session dict. Constructed once at process start with the documented
//! defaults, mutated only through named operations, torn down with the
//! process (no persistence).

use crate::store::PortfolioStore;
use crate::weights::reconcile;
use portfolio_core::{Holding, NewsItem, StoreError};
use std::collections::HashMap;

/// Quick-add shortcut list shown on the create page.
pub const POPULAR_ASSETS: &[&str] = &["AAPL", "NVDA", "MSFT", "SPY", "BTC-USD"];

/// Symbols used for news when no portfolio is active.
pub const DEFAULT_NEWS_SYMBOLS: &[&str] = &["AAPL", "MSFT", "NVDA"];

const DEFAULT_FONT_SIZE: u32 = 12;
const MIN_FONT_SIZE: u32 = 8;

#[derive(Debug, Clone)]
pub struct Session {
    /// Symbols picked on the create page, not yet a portfolio.
    pub picks: Vec<String>,
    /// Draft weights for the picks.
    pub pick_weights: HashMap<String, f64>,
    pub store: PortfolioStore,
    /// Transient focus pointer held by value, not identity.
    pub selected_news: Option<NewsItem>,
    pub font_size: u32,
    pub news_page: u32,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            picks: Vec::new(),
            pick_weights: HashMap::new(),
            store: PortfolioStore::new(),
            selected_news: None,
            font_size: DEFAULT_FONT_SIZE,
            news_page: 1,
        }
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a symbol to the pick list. Duplicates are a warned no-op.
    pub fn add_pick(&mut self, symbol: &str) -> Result<(), StoreError> {
        if self.picks.iter().any(|s| s == symbol) {
            tracing::warn!("Asset already added: {}", symbol);
            return Err(StoreError::DuplicateSymbol(symbol.to_string()));
        }
        self.picks.push(symbol.to_string());
        Ok(())
    }

    pub fn remove_pick(&mut self, symbol: &str) {
        self.picks.retain(|s| s != symbol);
        self.pick_weights.remove(symbol);
    }

    /// Replace the draft weights. A total off 100 warns but is kept; the
    /// create step re-checks.
    pub fn set_pick_weights(&mut self, weights: HashMap<String, f64>) {
        let total: f64 = weights.values().sum();
        if (total - 100.0).abs() > crate::weights::WEIGHT_TOLERANCE {
            tracing::warn!("Total weight is {:.1}%, please adjust to 100%", total);
        }
        self.pick_weights = weights;
    }

    /// Turn the pick list into a stored portfolio. Picks without a draft
    /// weight get the equal share 100/N. On success the pick list and
    /// draft weights are cleared and the new portfolio becomes current.
    pub fn create_from_picks(&mut self, name: &str) -> Result<(), StoreError> {
        if self.picks.is_empty() {
            return Err(StoreError::EmptyHoldings);
        }
        let equal = 100.0 / self.picks.len() as f64;
        let holdings: Vec<Holding> = self
            .picks
            .iter()
            .map(|s| Holding {
                symbol: s.clone(),
                weight: self.pick_weights.get(s).copied().unwrap_or(equal),
            })
            .collect();

        let check = reconcile(&holdings);
        if !check.valid {
            tracing::warn!(
                "Total weight is {:.1}%, please adjust to 100%",
                check.total
            );
        }

        self.store.create(name, holdings)?;
        self.picks.clear();
        self.pick_weights.clear();
        Ok(())
    }

    /// Symbols the news aggregator should search for: the active
    /// portfolio's holdings, or the fixed demo list.
    pub fn news_symbols(&self) -> Vec<String> {
        self.store
            .current()
            .map(|p| p.symbols())
            .unwrap_or_else(|| DEFAULT_NEWS_SYMBOLS.iter().map(|s| s.to_string()).collect())
    }

    pub fn increase_font(&mut self) {
        self.font_size = self.font_size.saturating_add(2);
    }

    pub fn decrease_font(&mut self) {
        self.font_size = self.font_size.saturating_sub(2).max(MIN_FONT_SIZE);
    }

    pub fn next_news_page(&mut self) {
        self.news_page += 1;
    }

    pub fn prev_news_page(&mut self) {
        self.news_page = self.news_page.saturating_sub(1).max(1);
    }
}
