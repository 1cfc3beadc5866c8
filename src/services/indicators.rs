use crate::models::{IndicatorParams, IndicatorRow, IndicatorSnapshot, PriceSeries};

/// Simple Moving Average (SMA)
/// Returns a vector aligned with `values`:
/// - `None` until enough values exist
/// - `Some(avg)` after `window` values
pub fn sma(values: &[f64], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; values.len()];
    }

    // Running sum; subtract the value that falls out of the window.
    values
        .iter()
        .enumerate()
        .scan(0.0_f64, move |sum, (i, &v)| {
            *sum += v;
            if i >= window {
                *sum -= values[i - window];
            }

            let out = if i + 1 >= window {
                Some(*sum / window as f64)
            } else {
                None
            };

            Some(out)
        })
        .collect()
}

/// Relative Strength Index (RSI)
///
/// Measures momentum by comparing recent gains to recent losses on a 0-100 scale:
/// - Below 30: Oversold
/// - Above 70: Overbought
///
/// Uses Wilder smoothing:
/// 1. Seed average gain/loss with the simple mean of the first `period` changes
/// 2. Then `avg = (prev * (period - 1) + current) / period`
/// 3. RSI = 100 - (100 / (1 + avg_gain / avg_loss))
///
/// With no losses the RSI is 100, and a perfectly flat window reads 50.
/// Returns `None` for the first `period` values.
pub fn rsi(prices: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut result = vec![None; prices.len()];
    if period == 0 || prices.len() <= period {
        return result;
    }

    let changes: Vec<f64> = prices.windows(2).map(|w| w[1] - w[0]).collect();
    let gains: Vec<f64> = changes.iter().map(|&c| c.max(0.0)).collect();
    let losses: Vec<f64> = changes.iter().map(|&c| (-c).max(0.0)).collect();

    let mut avg_gain = gains[..period].iter().sum::<f64>() / period as f64;
    let mut avg_loss = losses[..period].iter().sum::<f64>() / period as f64;
    result[period] = Some(rsi_from_averages(avg_gain, avg_loss));

    let alpha = 1.0 / period as f64;
    for i in period..changes.len() {
        avg_gain = alpha * gains[i] + (1.0 - alpha) * avg_gain;
        avg_loss = alpha * losses[i] + (1.0 - alpha) * avg_loss;
        result[i + 1] = Some(rsi_from_averages(avg_gain, avg_loss));
    }

    result
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return if avg_gain == 0.0 { 50.0 } else { 100.0 };
    }
    let rs = avg_gain / avg_loss;
    100.0 - (100.0 / (1.0 + rs))
}

/// Augment every point of `series` with SMA-short, SMA-long and the oscillator.
/// Short series never fail; the derived columns simply stay `None`.
pub fn compute_indicators(series: &PriceSeries, params: &IndicatorParams) -> Vec<IndicatorRow> {
    let closes = series.closes();
    let sma_short = sma(&closes, params.short_window);
    let sma_long = sma(&closes, params.long_window);
    let oscillator = rsi(&closes, params.oscillator_period);

    series
        .points()
        .iter()
        .enumerate()
        .map(|(i, point)| IndicatorRow {
            timestamp: point.timestamp,
            close: point.close,
            sma_short: sma_short[i],
            sma_long: sma_long[i],
            oscillator: oscillator[i],
        })
        .collect()
}

/// Latest row with all derived values present, or `None` when the history
/// never got long enough.
pub fn latest_snapshot(rows: &[IndicatorRow]) -> Option<IndicatorSnapshot> {
    rows.iter().rev().find_map(|row| {
        match (row.sma_short, row.sma_long, row.oscillator) {
            (Some(sma_short), Some(sma_long), Some(oscillator)) => Some(IndicatorSnapshot {
                timestamp: row.timestamp,
                close: row.close,
                sma_short,
                sma_long,
                oscillator,
            }),
            _ => None,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PricePoint;
    use chrono::{Duration, TimeZone, Utc};

    fn series_from(closes: &[f64]) -> PriceSeries {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let points = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| PricePoint::new(start + Duration::days(i as i64), c))
            .collect();
        PriceSeries::new(points).unwrap()
    }

    #[test]
    fn test_sma_basic() {
        let values = sma(&[1.0, 2.0, 3.0, 4.0, 5.0], 3);
        assert_eq!(values, vec![None, None, Some(2.0), Some(3.0), Some(4.0)]);
    }

    #[test]
    fn test_sma_window_longer_than_series() {
        assert!(sma(&[1.0, 2.0], 5).iter().all(Option::is_none));
        assert!(sma(&[1.0, 2.0], 0).iter().all(Option::is_none));
    }

    #[test]
    fn test_rsi_wilder_small_example() {
        // changes: +1, -1, +1
        let values = rsi(&[1.0, 2.0, 1.0, 2.0], 2);
        assert_eq!(values[0], None);
        assert_eq!(values[1], None);
        assert!((values[2].unwrap() - 50.0).abs() < 1e-9);
        // avg_gain = (0.5 + 1) / 2 = 0.75, avg_loss = 0.5 / 2 = 0.25 -> RS 3
        assert!((values[3].unwrap() - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_rsi_warmup_is_undefined() {
        let prices: Vec<f64> = (0..20).map(|i| 100.0 + (i as f64).sin()).collect();
        let values = rsi(&prices, 14);
        assert_eq!(values.len(), prices.len());
        assert!(values[..14].iter().all(Option::is_none));
        assert!(values[14..].iter().all(Option::is_some));
        for v in values.iter().flatten() {
            assert!((0.0..=100.0).contains(v));
        }
    }

    #[test]
    fn test_rsi_extremes() {
        let uptrend: Vec<f64> = (0..30).map(|i| 50.0 + i as f64).collect();
        assert_eq!(rsi(&uptrend, 14).last().copied().flatten(), Some(100.0));

        let downtrend: Vec<f64> = (0..30).map(|i| 80.0 - i as f64).collect();
        assert_eq!(rsi(&downtrend, 14).last().copied().flatten(), Some(0.0));

        let flat = vec![42.0; 30];
        assert_eq!(rsi(&flat, 14).last().copied().flatten(), Some(50.0));
    }

    #[test]
    fn test_rsi_short_series() {
        assert!(rsi(&[1.0, 2.0, 3.0], 14).iter().all(Option::is_none));
        assert!(rsi(&[], 14).is_empty());
    }

    #[test]
    fn test_compute_indicators_aligns_with_series() {
        let closes: Vec<f64> = (1..=10).map(f64::from).collect();
        let params = IndicatorParams {
            short_window: 3,
            long_window: 5,
            oscillator_period: 4,
        };
        let rows = compute_indicators(&series_from(&closes), &params);

        assert_eq!(rows.len(), 10);
        assert_eq!(rows[1].sma_short, None);
        assert_eq!(rows[2].sma_short, Some(2.0));
        assert_eq!(rows[3].sma_long, None);
        assert_eq!(rows[4].sma_long, Some(3.0));
        assert_eq!(rows[3].oscillator, None);
        assert_eq!(rows[4].oscillator, Some(100.0));
        assert_eq!(rows[9].close, 10.0);
    }

    #[test]
    fn test_latest_snapshot_uses_last_complete_row() {
        let closes: Vec<f64> = (1..=10).map(f64::from).collect();
        let params = IndicatorParams {
            short_window: 3,
            long_window: 5,
            oscillator_period: 4,
        };
        let rows = compute_indicators(&series_from(&closes), &params);
        let snapshot = latest_snapshot(&rows).unwrap();

        assert_eq!(snapshot.close, 10.0);
        assert_eq!(snapshot.sma_short, 9.0);
        assert_eq!(snapshot.sma_long, 8.0);
        assert_eq!(snapshot.oscillator, 100.0);
    }

    #[test]
    fn test_latest_snapshot_insufficient_history() {
        let closes: Vec<f64> = (1..=100).map(f64::from).collect();
        let rows = compute_indicators(&series_from(&closes), &IndicatorParams::default());
        assert!(rows.iter().all(|r| r.sma_long.is_none()));
        assert_eq!(latest_snapshot(&rows), None);
        assert_eq!(latest_snapshot(&[]), None);
    }
}
