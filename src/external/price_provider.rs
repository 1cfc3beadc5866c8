use async_trait::async_trait;
use thiserror::Error;

use crate::models::PricePoint;

/// How far back to fetch daily history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookbackRange {
    OneMonth,
    SixMonths,
    OneYear,
    TwoYears,
}

impl LookbackRange {
    /// Yahoo chart API range token
    pub fn as_range(&self) -> &'static str {
        match self {
            LookbackRange::OneMonth => "1mo",
            LookbackRange::SixMonths => "6mo",
            LookbackRange::OneYear => "1y",
            LookbackRange::TwoYears => "2y",
        }
    }

    /// Smallest range that usually holds `points` daily closes.
    pub fn covering(points: usize) -> Self {
        // ~21 trading days per month, ~252 per year
        if points <= 20 {
            LookbackRange::OneMonth
        } else if points <= 120 {
            LookbackRange::SixMonths
        } else if points <= 240 {
            LookbackRange::OneYear
        } else {
            LookbackRange::TwoYears
        }
    }
}

#[derive(Debug, Error)]
pub enum PriceProviderError {
    #[error("network error: {0}")]
    Network(String),

    #[error("bad response: {0}")]
    BadResponse(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("rate limited")]
    RateLimited,
}

/// Source of daily closing prices. Unknown tickers yield an empty list, not an error.
#[async_trait]
pub trait PriceProvider: Send + Sync {
    async fn fetch_daily_history(
        &self,
        ticker: &str,
        range: LookbackRange,
    ) -> Result<Vec<PricePoint>, PriceProviderError>;
}
