//! Raw HTTP client for the news search API. One paginated GET per call;
//! errors are typed and left for the aggregator to absorb.

use chrono::{Duration, Utc};
use portfolio_core::ProviderError;
use reqwest::Client;
use serde::Deserialize;

const BASE_URL: &str = "https://api.worldnewsapi.com";

/// Only articles published in the last N days are requested.
const LOOKBACK_DAYS: i64 = 30;

#[derive(Clone)]
pub struct NewsClient {
    api_key: String,
    client: Client,
    base_url: String,
}

impl NewsClient {
    pub fn new(api_key: String) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            api_key,
            client,
            base_url: BASE_URL.to_string(),
        }
    }

    /// Point the client at a different base URL (tests, proxies).
    pub fn with_base_url(api_key: String, base_url: impl Into<String>) -> Self {
        let mut c = Self::new(api_key);
        c.base_url = base_url.into();
        c
    }

    /// Issue one search request. The publish-date lower bound restricts
    /// results server-side to the last 30 days.
    pub async fn search(
        &self,
        query: &str,
        page: u32,
        page_size: u32,
    ) -> Result<SearchResponse, ProviderError> {
        let url = format!("{}/search-news", self.base_url);
        let earliest = (Utc::now() - Duration::days(LOOKBACK_DAYS))
            .format("%Y-%m-%dT%H:%M:%S")
            .to_string();

        let response = self
            .client
            .get(&url)
            .header("x-api-key", &self.api_key)
            .query(&[
                ("q", query),
                ("language", "en"),
                ("sort", "date"),
                ("page", &page.to_string()),
                ("page-size", &page_size.to_string()),
                ("earliest-publish-date", &earliest),
            ])
            .send()
            .await
            .map_err(|e| ProviderError::Http(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ProviderError::Status {
                status: response.status().as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        response
            .json()
            .await
            .map_err(|e| ProviderError::Malformed(e.to_string()))
    }
}

/// Wire response. The provider spells fields inconsistently across
/// deployments (`publish_date` vs `publish-date`), hence the aliases.
#[derive(Debug, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub news: Vec<WireArticle>,
    #[serde(default, alias = "total-results")]
    pub total_results: u64,
}

#[derive(Debug, Default, Deserialize)]
pub struct WireArticle {
    #[serde(default)]
    pub title: String,
    #[serde(default, alias = "publish-date")]
    pub publish_date: String,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_snake_case_fields() {
        let body = r#"{
            "news": [{
                "title": "Apple beats estimates",
                "publish_date": "2025-08-20 14:02:11",
                "authors": ["A. Writer"],
                "text": "Quarterly results...",
                "url": "https://example.com/a"
            }],
            "total_results": 137
        }"#;
        let parsed: SearchResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.total_results, 137);
        assert_eq!(parsed.news[0].publish_date, "2025-08-20 14:02:11");
        assert_eq!(parsed.news[0].authors, vec!["A. Writer"]);
    }

    #[test]
    fn test_parses_kebab_case_aliases() {
        let body = r#"{
            "news": [{
                "title": "t",
                "publish-date": "2025-08-19T09:00:00",
                "url": "u"
            }],
            "total-results": 2
        }"#;
        let parsed: SearchResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.total_results, 2);
        assert_eq!(parsed.news[0].publish_date, "2025-08-19T09:00:00");
        assert!(parsed.news[0].authors.is_empty());
    }

    #[tokio::test]
    async fn test_search_error_on_unreachable_provider() {
        let client = NewsClient::with_base_url("key".into(), "http://127.0.0.1:1");
        let err = client.search("AAPL", 1, 10).await.unwrap_err();
        assert!(matches!(err, ProviderError::Http(_)));
    }
}
