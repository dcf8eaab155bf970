pub mod metrics;

pub use metrics::RiskFetcher;

use chrono::DateTime;
use portfolio_core::{Bar, ProviderError, Quote, SymbolInfo};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

const BASE_URL: &str = "https://query1.finance.yahoo.com";

/// History window accepted by the chart endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryRange {
    OneDay,
    FiveDays,
    OneMonth,
    ThreeMonths,
    SixMonths,
    YearToDate,
    OneYear,
    FiveYears,
}

impl HistoryRange {
    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryRange::OneDay => "1d",
            HistoryRange::FiveDays => "5d",
            HistoryRange::OneMonth => "1mo",
            HistoryRange::ThreeMonths => "3mo",
            HistoryRange::SixMonths => "6mo",
            HistoryRange::YearToDate => "ytd",
            HistoryRange::OneYear => "1y",
            HistoryRange::FiveYears => "5y",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "1d" => Some(HistoryRange::OneDay),
            "5d" => Some(HistoryRange::FiveDays),
            "1mo" => Some(HistoryRange::OneMonth),
            "3mo" => Some(HistoryRange::ThreeMonths),
            "6mo" => Some(HistoryRange::SixMonths),
            "ytd" => Some(HistoryRange::YearToDate),
            "1y" => Some(HistoryRange::OneYear),
            "5y" => Some(HistoryRange::FiveYears),
            _ => None,
        }
    }
}

/// Bar spacing accepted by the chart endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interval {
    FiveMinutes,
    OneHour,
    Daily,
}

impl Interval {
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::FiveMinutes => "5m",
            Interval::OneHour => "1h",
            Interval::Daily => "1d",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "5m" => Some(Interval::FiveMinutes),
            "1h" => Some(Interval::OneHour),
            "1d" => Some(Interval::Daily),
            _ => None,
        }
    }
}

/// Client for the per-symbol market-data provider: one metadata lookup and
/// one OHLCV history endpoint. No batching, no retry.
#[derive(Clone)]
pub struct MarketClient {
    client: Client,
    base_url: String,
}

impl Default for MarketClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MarketClient {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: BASE_URL.to_string(),
        }
    }

    /// Point the client at a different base URL (tests, proxies).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let mut c = Self::new();
        c.base_url = base_url.into();
        c
    }

    /// Fetch the symbol's metadata/info record. Every field in the result
    /// is optional; callers must default explicitly.
    pub async fn info(&self, symbol: &str) -> Result<SymbolInfo, ProviderError> {
        let url = format!("{}/v10/finance/quoteSummary/{}", self.base_url, symbol);

        let response = self
            .client
            .get(&url)
            .query(&[("modules", "summaryProfile,summaryDetail,price")])
            .send()
            .await
            .map_err(|e| ProviderError::Http(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ProviderError::Status {
                status: response.status().as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        let summary: QuoteSummaryResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Malformed(e.to_string()))?;

        let result = summary
            .quote_summary
            .and_then(|qs| qs.result.into_iter().flatten().next())
            .ok_or_else(|| ProviderError::NoData(symbol.to_string()))?;

        let profile = result.summary_profile.unwrap_or_default();
        let detail = result.summary_detail.unwrap_or_default();
        let price = result.price.unwrap_or_default();

        Ok(SymbolInfo {
            symbol: price.symbol,
            short_name: price.short_name,
            sector: profile.sector,
            beta: detail.beta.and_then(|v| v.raw),
            trailing_pe: detail.trailing_pe.and_then(|v| v.raw),
            market_cap: detail.market_cap.and_then(|v| v.raw),
            dividend_yield: detail.dividend_yield.and_then(|v| v.raw),
            regular_market_price: price.regular_market_price.and_then(|v| v.raw),
            regular_market_previous_close: price
                .regular_market_previous_close
                .and_then(|v| v.raw),
        })
    }

    /// Fetch OHLCV history for a symbol over the given range/interval.
    /// Rows with missing price points are skipped.
    pub async fn history(
        &self,
        symbol: &str,
        range: HistoryRange,
        interval: Interval,
    ) -> Result<Vec<Bar>, ProviderError> {
        let url = format!("{}/v8/finance/chart/{}", self.base_url, symbol);

        let response = self
            .client
            .get(&url)
            .query(&[("range", range.as_str()), ("interval", interval.as_str())])
            .send()
            .await
            .map_err(|e| ProviderError::Http(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ProviderError::Status {
                status: response.status().as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        let chart: ChartResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Malformed(e.to_string()))?;

        let result = chart
            .chart
            .and_then(|c| c.result.into_iter().flatten().next())
            .ok_or_else(|| ProviderError::NoData(symbol.to_string()))?;

        let timestamps = result.timestamp.unwrap_or_default();
        let quote = result
            .indicators
            .and_then(|i| i.quote.into_iter().next())
            .unwrap_or_default();

        let mut bars = Vec::with_capacity(timestamps.len());
        for (i, ts) in timestamps.iter().enumerate() {
            let (open, high, low, close) = match (
                quote.open.get(i).copied().flatten(),
                quote.high.get(i).copied().flatten(),
                quote.low.get(i).copied().flatten(),
                quote.close.get(i).copied().flatten(),
            ) {
                (Some(o), Some(h), Some(l), Some(c)) => (o, h, l, c),
                _ => continue,
            };
            let Some(timestamp) = DateTime::from_timestamp(*ts, 0) else {
                continue;
            };
            bars.push(Bar {
                timestamp,
                open,
                high,
                low,
                close,
                volume: quote.volume.get(i).copied().flatten().unwrap_or(0.0),
            });
        }

        Ok(bars)
    }

    /// Latest price snapshot from a 5-day daily history: last close versus
    /// the previous close.
    pub async fn quote(&self, symbol: &str) -> Result<Quote, ProviderError> {
        let bars = self
            .history(symbol, HistoryRange::FiveDays, Interval::Daily)
            .await?;

        let last = bars
            .last()
            .ok_or_else(|| ProviderError::NoData(symbol.to_string()))?;
        let prev_close = if bars.len() > 1 {
            bars[bars.len() - 2].close
        } else {
            last.close
        };

        let change = last.close - prev_close;
        let change_percent = if prev_close != 0.0 {
            change / prev_close * 100.0
        } else {
            0.0
        };

        let short_name = self.info(symbol).await.ok().and_then(|i| i.short_name);

        Ok(Quote {
            symbol: symbol.to_string(),
            short_name,
            price: last.close,
            change,
            change_percent,
        })
    }
}

// ---- Wire types ----

#[derive(Debug, Deserialize)]
struct QuoteSummaryResponse {
    #[serde(rename = "quoteSummary")]
    quote_summary: Option<QuoteSummary>,
}

#[derive(Debug, Deserialize)]
struct QuoteSummary {
    #[serde(default)]
    result: Option<Vec<QuoteSummaryResult>>,
}

#[derive(Debug, Deserialize)]
struct QuoteSummaryResult {
    #[serde(rename = "summaryProfile")]
    summary_profile: Option<WireProfile>,
    #[serde(rename = "summaryDetail")]
    summary_detail: Option<WireDetail>,
    price: Option<WirePrice>,
}

#[derive(Debug, Default, Deserialize)]
struct WireProfile {
    sector: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct WireDetail {
    beta: Option<WireValue>,
    #[serde(rename = "trailingPE")]
    trailing_pe: Option<WireValue>,
    #[serde(rename = "marketCap")]
    market_cap: Option<WireValue>,
    #[serde(rename = "dividendYield")]
    dividend_yield: Option<WireValue>,
}

#[derive(Debug, Default, Deserialize)]
struct WirePrice {
    symbol: Option<String>,
    #[serde(rename = "shortName")]
    short_name: Option<String>,
    #[serde(rename = "regularMarketPrice")]
    regular_market_price: Option<WireValue>,
    #[serde(rename = "regularMarketPreviousClose")]
    regular_market_previous_close: Option<WireValue>,
}

/// The provider wraps numbers in `{ "raw": .., "fmt": ".." }` objects.
#[derive(Debug, Deserialize)]
struct WireValue {
    raw: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Option<Chart>,
}

#[derive(Debug, Deserialize)]
struct Chart {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    timestamp: Option<Vec<i64>>,
    indicators: Option<Indicators>,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<WireOhlcv>,
}

#[derive(Debug, Default, Deserialize)]
struct WireOhlcv {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_and_interval_round_trip() {
        for r in [
            HistoryRange::OneDay,
            HistoryRange::FiveDays,
            HistoryRange::OneMonth,
            HistoryRange::ThreeMonths,
            HistoryRange::SixMonths,
            HistoryRange::YearToDate,
            HistoryRange::OneYear,
            HistoryRange::FiveYears,
        ] {
            assert_eq!(HistoryRange::parse(r.as_str()), Some(r));
        }
        assert_eq!(HistoryRange::parse("2w"), None);
        assert_eq!(Interval::parse("1d"), Some(Interval::Daily));
        assert_eq!(Interval::parse("3s"), None);
    }

    #[test]
    fn test_chart_parsing_skips_null_rows() {
        let body = r#"{
            "chart": {"result": [{
                "timestamp": [1700000000, 1700086400, 1700172800],
                "indicators": {"quote": [{
                    "open":   [1.0, null, 3.0],
                    "high":   [1.5, 2.5, 3.5],
                    "low":    [0.5, 1.5, 2.5],
                    "close":  [1.2, 2.2, 3.2],
                    "volume": [100.0, 200.0, null]
                }]}
            }]}
        }"#;
        let parsed: ChartResponse = serde_json::from_str(body).unwrap();
        let result = parsed.chart.unwrap().result.unwrap().remove(0);
        assert_eq!(result.timestamp.as_ref().unwrap().len(), 3);
        let quote = &result.indicators.as_ref().unwrap().quote[0];
        assert_eq!(quote.open[1], None);
    }

    #[test]
    fn test_quote_summary_parsing_with_missing_modules() {
        let body = r#"{
            "quoteSummary": {"result": [{
                "price": {
                    "symbol": "AAPL",
                    "shortName": "Apple Inc.",
                    "regularMarketPrice": {"raw": 210.5, "fmt": "210.50"}
                }
            }]}
        }"#;
        let parsed: QuoteSummaryResponse = serde_json::from_str(body).unwrap();
        let result = parsed
            .quote_summary
            .unwrap()
            .result
            .unwrap()
            .remove(0);
        assert!(result.summary_detail.is_none());
        let price = result.price.unwrap();
        assert_eq!(price.symbol.as_deref(), Some("AAPL"));
        assert_eq!(price.regular_market_price.unwrap().raw, Some(210.5));
    }

    #[tokio::test]
    async fn test_info_error_on_unreachable_provider() {
        let client = MarketClient::with_base_url("http://127.0.0.1:1");
        let err = client.info("AAPL").await.unwrap_err();
        assert!(matches!(err, portfolio_core::ProviderError::Http(_)));
    }
}
