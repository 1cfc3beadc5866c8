use tracing::{error, info};

use crate::errors::AppError;
use crate::external::price_provider::{LookbackRange, PriceProvider, PriceProviderError};
use crate::models::{PriceSeries, PriceSummary};

/// Fetch daily closes for `ticker` as a validated series. An empty series
/// means the provider knows nothing about the symbol.
pub async fn fetch_series(
    provider: &dyn PriceProvider,
    ticker: &str,
    range: LookbackRange,
) -> Result<PriceSeries, AppError> {
    let points = match provider.fetch_daily_history(ticker, range).await {
        Ok(points) => points,
        Err(PriceProviderError::RateLimited) => return Err(AppError::RateLimited),
        Err(e) => {
            error!("Failed to fetch price history for ticker {}: {}", ticker, e);
            return Err(AppError::External(e.to_string()));
        }
    };

    let series = PriceSeries::new(points)?;
    info!("Fetched {} closes for {} ({})", series.len(), ticker, range.as_range());
    Ok(series)
}

/// Count, mean, sample std, min, quartiles and max of the closes.
pub fn summarize(series: &PriceSeries) -> Option<PriceSummary> {
    let mut closes = series.closes();
    if closes.is_empty() {
        return None;
    }
    closes.sort_by(f64::total_cmp);

    let count = closes.len();
    let mean = closes.iter().sum::<f64>() / count as f64;
    let std = (count > 1).then(|| {
        let variance = closes.iter().map(|c| (c - mean).powi(2)).sum::<f64>() / (count - 1) as f64;
        variance.sqrt()
    });

    Some(PriceSummary {
        count,
        mean,
        std,
        min: closes[0],
        p25: quantile(&closes, 0.25),
        p50: quantile(&closes, 0.50),
        p75: quantile(&closes, 0.75),
        max: closes[count - 1],
    })
}

/// Linear interpolation between order statistics; `sorted` must be non-empty.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}
