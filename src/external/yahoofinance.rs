use std::time::Duration;

use async_trait::async_trait;
use chrono::DateTime;
use serde::Deserialize;
use tracing::{info, warn};

use crate::config::PriceConfig;
use crate::external::price_provider::{LookbackRange, PriceProvider, PriceProviderError};
use crate::models::{PricePoint, PriceSeries};

/// Yahoo Finance chart API provider. No API key required.
pub struct YahooFinanceProvider {
    client: reqwest::Client,
    base_url: String,
}

impl YahooFinanceProvider {
    pub fn new(config: &PriceConfig) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent("Mozilla/5.0 (compatible; FinAgent/0.1)")
                .timeout(Duration::from_secs(config.timeout_secs))
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct YahooChartResponse {
    chart: YahooChart,
}

#[derive(Debug, Deserialize)]
struct YahooChart {
    result: Option<Vec<YahooResult>>,
    error: Option<YahooError>,
}

#[derive(Debug, Deserialize)]
struct YahooError {
    code: Option<String>,
    description: String,
}

#[derive(Debug, Deserialize)]
struct YahooResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: YahooIndicators,
}

#[derive(Debug, Deserialize)]
struct YahooIndicators {
    quote: Vec<YahooQuote>,
}

#[derive(Debug, Deserialize)]
struct YahooQuote {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

/// Convert a chart payload into ordered points. An unknown symbol maps to an
/// empty list.
fn points_from_chart(body: YahooChartResponse) -> Result<Vec<PricePoint>, PriceProviderError> {
    if let Some(error) = body.chart.error {
        let not_found = error.code.as_deref() == Some("Not Found")
            || error.description.contains("No data found");
        if not_found {
            return Ok(Vec::new());
        }
        return Err(PriceProviderError::BadResponse(error.description));
    }

    let Some(result) = body.chart.result.and_then(|mut r| r.pop()) else {
        return Ok(Vec::new());
    };

    let Some(quote) = result.indicators.quote.into_iter().next() else {
        return Ok(Vec::new());
    };

    if result.timestamp.len() != quote.close.len() {
        return Err(PriceProviderError::Parse(
            "Timestamp and close price arrays have different lengths".into(),
        ));
    }

    let mut points = Vec::with_capacity(result.timestamp.len());
    for (ts, close) in result.timestamp.iter().zip(quote.close) {
        // Skip null closes (market holidays, halted sessions)
        let Some(close) = close else { continue };

        let timestamp = DateTime::from_timestamp(*ts, 0)
            .ok_or_else(|| PriceProviderError::Parse(format!("bad timestamp {}", ts)))?;

        points.push(PricePoint::new(timestamp, close));
    }

    // The live bar can repeat the last session's timestamp
    Ok(PriceSeries::from_unordered(points).points().to_vec())
}

#[async_trait]
impl PriceProvider for YahooFinanceProvider {
    async fn fetch_daily_history(
        &self,
        ticker: &str,
        range: LookbackRange,
    ) -> Result<Vec<PricePoint>, PriceProviderError> {
        let url = format!("{}/v8/finance/chart/{}", self.base_url, ticker);

        let resp = self
            .client
            .get(&url)
            .query(&[("interval", "1d"), ("range", range.as_range())])
            .send()
            .await
            .map_err(|e| PriceProviderError::Network(e.to_string()))?;

        let status = resp.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            warn!("Yahoo Finance rate limited request for {}", ticker);
            return Err(PriceProviderError::RateLimited);
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            info!("Yahoo Finance has no data for {}", ticker);
            return Ok(Vec::new());
        }
        if !status.is_success() {
            return Err(PriceProviderError::BadResponse(format!("HTTP {}", status)));
        }

        let body: YahooChartResponse = resp
            .json()
            .await
            .map_err(|e| PriceProviderError::Parse(e.to_string()))?;

        points_from_chart(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<Vec<PricePoint>, PriceProviderError> {
        points_from_chart(serde_json::from_str(json).unwrap())
    }

    #[test]
    fn test_parses_closes_and_skips_nulls() {
        let points = parse(
            r#"{"chart":{"result":[{"timestamp":[1717372800,1717459200,1717545600],
                "indicators":{"quote":[{"close":[190.5,null,192.25]}]}}],"error":null}}"#,
        )
        .unwrap();

        assert_eq!(points.len(), 2);
        assert_eq!(points[0].close, 190.5);
        assert_eq!(points[1].close, 192.25);
        assert!(points[0].timestamp < points[1].timestamp);
    }

    #[test]
    fn test_repeated_timestamp_keeps_last() {
        let points = parse(
            r#"{"chart":{"result":[{"timestamp":[1717372800,1717459200,1717459200],
                "indicators":{"quote":[{"close":[1.0,2.0,3.0]}]}}],"error":null}}"#,
        )
        .unwrap();
        assert_eq!(points.iter().map(|p| p.close).collect::<Vec<_>>(), vec![1.0, 3.0]);
    }

    #[test]
    fn test_unknown_symbol_is_empty() {
        let points = parse(
            r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#,
        )
        .unwrap();
        assert!(points.is_empty());
    }

    #[test]
    fn test_other_errors_propagate() {
        let result = parse(
            r#"{"chart":{"result":null,"error":{"code":"Bad Request","description":"Invalid input - interval=1x is not supported"}}}"#,
        );
        assert!(matches!(result, Err(PriceProviderError::BadResponse(_))));
    }

    #[test]
    fn test_mismatched_arrays() {
        let result = parse(
            r#"{"chart":{"result":[{"timestamp":[1717372800],
                "indicators":{"quote":[{"close":[1.0,2.0]}]}}],"error":null}}"#,
        );
        assert!(matches!(result, Err(PriceProviderError::Parse(_))));
    }
}
