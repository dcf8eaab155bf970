//! News aggregation keyed off the active portfolio's symbols: OR-combined
//! keyword search, best-effort title-to-symbol matching, asset-type
//! filtering, and a fixed demo fallback so the news panel is never empty.

pub mod client;

pub use client::NewsClient;

use chrono::Utc;
use portfolio_core::{asset_type, AssetType, NewsItem, NewsPage};

/// Crypto pairs search better under their common names.
const CRYPTO_KEYWORDS: &[(&str, &str)] = &[("BTC-USD", "Bitcoin"), ("ETH-USD", "Ethereum")];

/// Asset-type filter applied client-side to matched articles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AssetFilter {
    #[default]
    All,
    Stocks,
    Etfs,
    Cryptocurrencies,
}

impl AssetFilter {
    pub fn parse(s: &str) -> Self {
        match s {
            "Stocks" => AssetFilter::Stocks,
            "ETFs" => AssetFilter::Etfs,
            "Cryptocurrencies" => AssetFilter::Cryptocurrencies,
            _ => AssetFilter::All,
        }
    }

    fn matches(&self, asset_type: Option<AssetType>) -> bool {
        match self {
            AssetFilter::All => true,
            AssetFilter::Stocks => asset_type == Some(AssetType::Stock),
            AssetFilter::Etfs => asset_type == Some(AssetType::Etf),
            AssetFilter::Cryptocurrencies => asset_type == Some(AssetType::Cryptocurrency),
        }
    }
}

pub struct NewsAggregator {
    client: NewsClient,
}

impl NewsAggregator {
    pub fn new(client: NewsClient) -> Self {
        Self { client }
    }

    /// Search news for a symbol list. An explicit keyword overrides the
    /// OR-combined symbol query. Pagination is server-driven: every page
    /// turn is a new request, there is no local cache. Any failure
    /// degrades to the demo placeholder list.
    pub async fn search(
        &self,
        symbols: &[String],
        page: u32,
        page_size: u32,
        keyword: Option<&str>,
        filter: AssetFilter,
    ) -> NewsPage {
        let query = match keyword {
            Some(k) if !k.trim().is_empty() => k.to_string(),
            _ => build_query(symbols),
        };

        match self.client.search(&query, page.max(1), page_size).await {
            Ok(response) => {
                let items: Vec<NewsItem> = response
                    .news
                    .into_iter()
                    .map(|article| {
                        let symbol = match_symbol(&article.title, symbols);
                        let matched_type = if symbol == "OTHER" {
                            None
                        } else {
                            Some(asset_type(&symbol))
                        };
                        NewsItem {
                            date: article.publish_date,
                            symbol,
                            asset_type: matched_type,
                            title: article.title,
                            author: article.authors.join(", "),
                            content: article.text,
                            url: article.url,
                        }
                    })
                    .filter(|item| filter.matches(item.asset_type))
                    .collect();

                NewsPage {
                    items,
                    total: response.total_results,
                }
            }
            Err(e) => {
                tracing::warn!("News API unavailable, showing demo data: {}", e);
                demo_page(symbols)
            }
        }
    }
}

/// OR-joined query over the symbol list, with crypto pairs rewritten to
/// their common names.
pub fn build_query(symbols: &[String]) -> String {
    symbols
        .iter()
        .map(|s| {
            CRYPTO_KEYWORDS
                .iter()
                .find(|(pair, _)| pair == s)
                .map(|(_, name)| (*name).to_string())
                .unwrap_or_else(|| s.clone())
        })
        .collect::<Vec<_>>()
        .join(" OR ")
}

/// Match an article back to a held symbol by substring search over the
/// title. First symbol in input order wins; crypto pairs also match with
/// the quote-currency suffix stripped (BTC-USD matches "BTC"). No match
/// yields "OTHER".
pub fn match_symbol(title: &str, symbols: &[String]) -> String {
    let title_lower = title.to_lowercase();
    for symbol in symbols {
        let stripped = symbol.replace("-USD", "");
        if title_lower.contains(&symbol.to_lowercase())
            || title_lower.contains(&stripped.to_lowercase())
        {
            return symbol.clone();
        }
    }
    "OTHER".to_string()
}

/// Fixed placeholder articles shown whenever the provider is unavailable.
pub fn demo_page(symbols: &[String]) -> NewsPage {
    let today = Utc::now().format("%Y-%m-%d").to_string();
    let first = symbols.first().map(String::as_str).unwrap_or("AAPL");
    let second = symbols.get(1).map(String::as_str).unwrap_or("MSFT");

    let items = vec![
        NewsItem {
            date: today.clone(),
            symbol: first.to_string(),
            asset_type: Some(asset_type(first)),
            title: "[Demo] Market News Example 1".to_string(),
            author: "Demo Author".to_string(),
            content: "This is demo news content. Displayed when API is unavailable."
                .to_string(),
            url: "https://example.com/news1".to_string(),
        },
        NewsItem {
            date: today,
            symbol: second.to_string(),
            asset_type: Some(asset_type(second)),
            title: "[Demo] Market News Example 2".to_string(),
            author: "Demo Author".to_string(),
            content: "Second demo news content. Displayed when API is unavailable."
                .to_string(),
            url: "https://example.com/news2".to_string(),
        },
    ];

    NewsPage { total: items.len() as u64, items }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn syms(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_build_query_joins_with_or() {
        assert_eq!(build_query(&syms(&["AAPL", "MSFT"])), "AAPL OR MSFT");
    }

    #[test]
    fn test_build_query_rewrites_crypto_pairs() {
        assert_eq!(
            build_query(&syms(&["BTC-USD", "ETH-USD", "NVDA"])),
            "Bitcoin OR Ethereum OR NVDA"
        );
    }

    #[test]
    fn test_match_symbol_first_wins() {
        let symbols = syms(&["AAPL", "MSFT"]);
        // Both appear; input order decides
        assert_eq!(match_symbol("MSFT and AAPL rally", &symbols), "AAPL");
    }

    #[test]
    fn test_match_symbol_is_case_insensitive() {
        let symbols = syms(&["AAPL"]);
        assert_eq!(match_symbol("aapl hits new high", &symbols), "AAPL");
    }

    #[test]
    fn test_match_symbol_strips_currency_suffix() {
        let symbols = syms(&["BTC-USD"]);
        assert_eq!(match_symbol("BTC rallies past 100k", &symbols), "BTC-USD");
    }

    #[test]
    fn test_match_symbol_other_when_unmatched() {
        let symbols = syms(&["AAPL"]);
        assert_eq!(match_symbol("Oil prices slide", &symbols), "OTHER");
    }

    #[test]
    fn test_demo_page_uses_input_symbols() {
        let page = demo_page(&syms(&["NVDA", "BTC-USD"]));
        assert_eq!(page.total, 2);
        assert_eq!(page.items[0].symbol, "NVDA");
        assert_eq!(page.items[0].asset_type, Some(AssetType::Stock));
        assert_eq!(page.items[1].symbol, "BTC-USD");
        assert_eq!(page.items[1].asset_type, Some(AssetType::Cryptocurrency));
    }

    #[test]
    fn test_demo_page_defaults_when_list_short() {
        let page = demo_page(&[]);
        assert_eq!(page.items[0].symbol, "AAPL");
        assert_eq!(page.items[1].symbol, "MSFT");
    }

    #[test]
    fn test_filter_matches() {
        assert!(AssetFilter::All.matches(None));
        assert!(AssetFilter::Stocks.matches(Some(AssetType::Stock)));
        assert!(!AssetFilter::Stocks.matches(Some(AssetType::Etf)));
        assert!(!AssetFilter::Cryptocurrencies.matches(None));
        assert_eq!(AssetFilter::parse("ETFs"), AssetFilter::Etfs);
        assert_eq!(AssetFilter::parse("All Holdings"), AssetFilter::All);
    }

    #[tokio::test]
    async fn test_search_falls_back_to_demo_on_failure() {
        let aggregator = NewsAggregator::new(NewsClient::with_base_url(
            "key".into(),
            "http://127.0.0.1:1",
        ));
        let symbols = syms(&["AAPL", "BTC-USD"]);
        let page = aggregator
            .search(&symbols, 1, 10, None, AssetFilter::All)
            .await;
        assert_eq!(page.total, 2);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].title, "[Demo] Market News Example 1");
        assert_eq!(page.items[1].symbol, "BTC-USD");
    }
}
