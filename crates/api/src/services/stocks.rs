//! Stock market data client.
//!
//! Wraps the Yahoo Finance compatible API used for ticker search and
//! current price lookups on investment positions.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::config::StocksConfig;

/// Errors that can occur while querying market data.
#[derive(Debug, Error)]
pub enum StocksError {
    #[error("Market data service not configured")]
    NotConfigured,

    #[error("Ticker not found: {0}")]
    TickerNotFound(String),

    #[error("Market data service error: {0}")]
    Upstream(String),
}

/// A ticker search result.
#[derive(Debug, Clone, Serialize)]
pub struct TickerMatch {
    pub ticker: String,
    pub name: String,
    pub exchange: Option<String>,
}

/// Current quote for a ticker.
#[derive(Debug, Clone, Serialize)]
pub struct TickerQuote {
    pub ticker: String,
    pub price: f64,
    pub currency: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(rename = "Result", default)]
    result: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    symbol: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    exch: Option<String>,
}

#[derive(Debug, Deserialize)]
struct QuoteEnvelope {
    #[serde(rename = "quoteResponse")]
    quote_response: QuoteResponse,
}

#[derive(Debug, Deserialize)]
struct QuoteResponse {
    #[serde(default)]
    result: Vec<QuoteItem>,
}

#[derive(Debug, Deserialize)]
struct QuoteItem {
    symbol: String,
    #[serde(rename = "regularMarketPrice")]
    regular_market_price: Option<f64>,
    #[serde(default)]
    currency: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: ChartResponse,
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    #[serde(default)]
    result: Option<Vec<ChartItem>>,
}

#[derive(Debug, Deserialize)]
struct ChartItem {
    #[serde(default)]
    meta: ChartMeta,
    indicators: ChartIndicators,
}

#[derive(Debug, Default, Deserialize)]
struct ChartMeta {
    #[serde(default)]
    currency: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<ChartQuote>,
}

#[derive(Debug, Deserialize)]
struct ChartQuote {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

/// Client for the market data provider.
#[derive(Clone)]
pub struct StockService {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl StockService {
    /// Creates a new client from configuration.
    pub fn new(config: &StocksConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }

    fn ensure_configured(&self) -> Result<(), StocksError> {
        if self.api_key.is_empty() {
            return Err(StocksError::NotConfigured);
        }
        Ok(())
    }

    /// Searches for tickers matching a free-text query.
    pub async fn search(&self, query: &str) -> Result<Vec<TickerMatch>, StocksError> {
        self.ensure_configured()?;

        let url = format!(
            "{}/ws/screeners/v1/finance/screener/auto-complete",
            self.base_url
        );
        let response = self
            .client
            .get(&url)
            .query(&[("query", query), ("lang", "en"), ("region", "US")])
            .header("x-api-key", &self.api_key)
            .send()
            .await
            .map_err(|e| StocksError::Upstream(e.to_string()))?;

        if !response.status().is_success() {
            return Err(StocksError::Upstream(format!(
                "search returned status {}",
                response.status()
            )));
        }

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| StocksError::Upstream(e.to_string()))?;

        Ok(parsed
            .result
            .into_iter()
            .map(|item| TickerMatch {
                name: item.name.unwrap_or_else(|| item.symbol.clone()),
                ticker: item.symbol,
                exchange: item.exch,
            })
            .collect())
    }

    /// Fetches the current market price for a ticker.
    pub async fn quote(&self, ticker: &str) -> Result<TickerQuote, StocksError> {
        self.ensure_configured()?;

        let url = format!("{}/v6/finance/quote", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("symbols", ticker)])
            .header("x-api-key", &self.api_key)
            .send()
            .await
            .map_err(|e| StocksError::Upstream(e.to_string()))?;

        if !response.status().is_success() {
            return Err(StocksError::Upstream(format!(
                "quote returned status {}",
                response.status()
            )));
        }

        let parsed: QuoteEnvelope = response
            .json()
            .await
            .map_err(|e| StocksError::Upstream(e.to_string()))?;

        let item = parsed
            .quote_response
            .result
            .into_iter()
            .next()
            .ok_or_else(|| StocksError::TickerNotFound(ticker.to_string()))?;

        let price = item
            .regular_market_price
            .ok_or_else(|| StocksError::TickerNotFound(ticker.to_string()))?;

        Ok(TickerQuote {
            ticker: item.symbol,
            price,
            currency: item.currency,
        })
    }

    /// Fetches the closing price for a ticker on a given date.
    ///
    /// Uses the daily chart endpoint over a one-day window; the first
    /// non-null close in the window is the answer. A weekend or holiday
    /// yields no candles and maps to `TickerNotFound`.
    pub async fn quote_at(
        &self,
        ticker: &str,
        date: NaiveDate,
    ) -> Result<TickerQuote, StocksError> {
        self.ensure_configured()?;

        let start = date.and_time(NaiveTime::MIN).and_utc().timestamp();
        let end = start + 86_400;

        let url = format!("{}/v8/finance/chart/{}", self.base_url, ticker);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("period1", start.to_string()),
                ("period2", end.to_string()),
                ("interval", "1d".to_string()),
            ])
            .header("x-api-key", &self.api_key)
            .send()
            .await
            .map_err(|e| StocksError::Upstream(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(StocksError::TickerNotFound(ticker.to_string()));
        }
        if !response.status().is_success() {
            return Err(StocksError::Upstream(format!(
                "chart returned status {}",
                response.status()
            )));
        }

        let parsed: ChartEnvelope = response
            .json()
            .await
            .map_err(|e| StocksError::Upstream(e.to_string()))?;

        let close = parsed
            .chart
            .result
            .unwrap_or_default()
            .into_iter()
            .next()
            .and_then(|item| {
                let currency = item.meta.currency;
                item.indicators
                    .quote
                    .into_iter()
                    .flat_map(|q| q.close)
                    .flatten()
                    .next()
                    .map(|price| (price, currency))
            });

        match close {
            Some((price, currency)) => Ok(TickerQuote {
                ticker: ticker.to_string(),
                price,
                currency,
            }),
            None => Err(StocksError::TickerNotFound(ticker.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_service(api_key: &str) -> StockService {
        StockService::new(&StocksConfig {
            url: "https://yfapi.net/".to_string(),
            api_key: api_key.to_string(),
            timeout_secs: 15,
        })
    }

    #[tokio::test]
    async fn test_search_without_key_fails() {
        let service = test_service("");
        assert!(matches!(
            service.search("apple").await,
            Err(StocksError::NotConfigured)
        ));
    }

    #[tokio::test]
    async fn test_quote_without_key_fails() {
        let service = test_service("");
        assert!(matches!(
            service.quote("AAPL").await,
            Err(StocksError::NotConfigured)
        ));
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let service = test_service("key");
        assert_eq!(service.base_url, "https://yfapi.net");
    }

    #[test]
    fn test_quote_envelope_parsing() {
        let body = r#"{
            "quoteResponse": {
                "result": [
                    {"symbol": "AAPL", "regularMarketPrice": 231.5, "currency": "USD"}
                ],
                "error": null
            }
        }"#;
        let parsed: QuoteEnvelope = serde_json::from_str(body).unwrap();
        let item = &parsed.quote_response.result[0];
        assert_eq!(item.symbol, "AAPL");
        assert_eq!(item.regular_market_price, Some(231.5));
    }

    #[test]
    fn test_chart_envelope_parsing() {
        let body = r#"{
            "chart": {
                "result": [
                    {
                        "meta": {"currency": "USD"},
                        "timestamp": [1714521600],
                        "indicators": {"quote": [{"close": [null, 187.2]}]}
                    }
                ],
                "error": null
            }
        }"#;
        let parsed: ChartEnvelope = serde_json::from_str(body).unwrap();
        let item = &parsed.chart.result.as_ref().unwrap()[0];
        assert_eq!(item.meta.currency.as_deref(), Some("USD"));
        assert_eq!(item.indicators.quote[0].close[1], Some(187.2));
    }

    #[test]
    fn test_search_response_parsing() {
        let body = r#"{
            "Result": [
                {"symbol": "AAPL", "name": "Apple Inc.", "exch": "NMS"},
                {"symbol": "APLE"}
            ]
        }"#;
        let parsed: SearchResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.result.len(), 2);
        assert_eq!(parsed.result[0].name.as_deref(), Some("Apple Inc."));
        assert!(parsed.result[1].name.is_none());
    }
}
