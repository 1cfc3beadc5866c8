use tracing::debug;

use crate::models::{
    IndicatorParams, IndicatorRow, IndicatorSnapshot, MomentumSignal, PriceSeries, SignalOutcome,
    SignalThresholds, TradeSignal, TrendSignal,
};
use crate::services::indicators::{compute_indicators, latest_snapshot};

/// Crossover of the short and long moving averages.
pub fn trend_signal(snapshot: &IndicatorSnapshot) -> TrendSignal {
    if snapshot.sma_short > snapshot.sma_long {
        TrendSignal::Buy
    } else if snapshot.sma_short < snapshot.sma_long {
        TrendSignal::Sell
    } else {
        TrendSignal::Hold
    }
}

/// Oscillator reading against the oversold/overbought cutoffs.
pub fn momentum_signal(snapshot: &IndicatorSnapshot, thresholds: &SignalThresholds) -> MomentumSignal {
    if snapshot.oscillator > thresholds.overbought {
        MomentumSignal::Sell
    } else if snapshot.oscillator < thresholds.oversold {
        MomentumSignal::Buy
    } else {
        MomentumSignal::Hold
    }
}

/// Trend decides, momentum may only veto. A trend buy survives unless momentum
/// is overbought. A trend sell survives only while momentum is neutral: an
/// oversold or an overbought reading vetoes it.
/// Everything else holds.
pub fn combine(trend: TrendSignal, momentum: MomentumSignal) -> TradeSignal {
    match (trend, momentum) {
        (TrendSignal::Buy, m) if m != MomentumSignal::Sell => TradeSignal::Buy,
        (TrendSignal::Sell, MomentumSignal::Hold) => TradeSignal::Sell,
        _ => TradeSignal::Hold,
    }
}

/// Trading call for a snapshot. A missing snapshot yields `InsufficientData`.
pub fn derive_signal(snapshot: Option<&IndicatorSnapshot>, thresholds: &SignalThresholds) -> SignalOutcome {
    match snapshot {
        Some(snapshot) => {
            SignalOutcome::Signal(combine(trend_signal(snapshot), momentum_signal(snapshot, thresholds)))
        }
        None => SignalOutcome::InsufficientData,
    }
}

/// Everything the signal endpoint reports for one series.
#[derive(Debug, Clone)]
pub struct SignalAnalysis {
    pub rows: Vec<IndicatorRow>,
    pub snapshot: Option<IndicatorSnapshot>,
    pub trend: Option<TrendSignal>,
    pub momentum: Option<MomentumSignal>,
    pub outcome: SignalOutcome,
}

pub fn analyze_series(
    series: &PriceSeries,
    params: &IndicatorParams,
    thresholds: &SignalThresholds,
) -> SignalAnalysis {
    let rows = compute_indicators(series, params);
    let snapshot = latest_snapshot(&rows);

    if snapshot.is_none() {
        debug!(
            "Insufficient history for signal: {} points, long window {}",
            series.len(),
            params.long_window
        );
    }

    SignalAnalysis {
        trend: snapshot.as_ref().map(trend_signal),
        momentum: snapshot.as_ref().map(|s| momentum_signal(s, thresholds)),
        outcome: derive_signal(snapshot.as_ref(), thresholds),
        snapshot,
        rows,
    }
}

/// Reject parameter combinations the engine cannot interpret.
pub fn validate_params(params: &IndicatorParams, thresholds: &SignalThresholds) -> Result<(), String> {
    if params.short_window == 0 || params.long_window == 0 || params.oscillator_period == 0 {
        return Err("Windows and oscillator period must be at least 1.".to_string());
    }
    let in_range = |v: f64| (0.0..=100.0).contains(&v);
    if !in_range(thresholds.oversold) || !in_range(thresholds.overbought) {
        return Err("Thresholds must be between 0 and 100.".to_string());
    }
    if thresholds.oversold > thresholds.overbought {
        return Err("Oversold threshold cannot exceed overbought threshold.".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PricePoint;
    use chrono::{Duration, TimeZone, Utc};

    fn snapshot(sma_short: f64, sma_long: f64, oscillator: f64) -> IndicatorSnapshot {
        IndicatorSnapshot {
            timestamp: Utc.with_ymd_and_hms(2024, 6, 3, 0, 0, 0).unwrap(),
            close: 100.0,
            sma_short,
            sma_long,
            oscillator,
        }
    }

    #[test]
    fn test_trend_buy_with_oversold_momentum_is_buy() {
        let s = snapshot(110.0, 100.0, 25.0);
        let thresholds = SignalThresholds::default();
        assert_eq!(trend_signal(&s), TrendSignal::Buy);
        assert_eq!(momentum_signal(&s, &thresholds), MomentumSignal::Buy);
        assert_eq!(derive_signal(Some(&s), &thresholds), SignalOutcome::Signal(TradeSignal::Buy));
    }

    #[test]
    fn test_trend_sell_with_overbought_momentum_is_hold() {
        let s = snapshot(90.0, 100.0, 75.0);
        let thresholds = SignalThresholds::default();
        assert_eq!(trend_signal(&s), TrendSignal::Sell);
        assert_eq!(momentum_signal(&s, &thresholds), MomentumSignal::Sell);
        assert_eq!(derive_signal(Some(&s), &thresholds), SignalOutcome::Signal(TradeSignal::Hold));
    }

    #[test]
    fn test_trend_sell_with_neutral_momentum_is_sell() {
        let s = snapshot(90.0, 100.0, 50.0);
        assert_eq!(
            derive_signal(Some(&s), &SignalThresholds::default()),
            SignalOutcome::Signal(TradeSignal::Sell)
        );
    }

    #[test]
    fn test_combination_table() {
        use MomentumSignal as M;
        use TrendSignal as T;

        assert_eq!(combine(T::Buy, M::Buy), TradeSignal::Buy);
        assert_eq!(combine(T::Buy, M::Hold), TradeSignal::Buy);
        assert_eq!(combine(T::Buy, M::Sell), TradeSignal::Hold);
        assert_eq!(combine(T::Sell, M::Sell), TradeSignal::Hold);
        assert_eq!(combine(T::Sell, M::Hold), TradeSignal::Sell);
        assert_eq!(combine(T::Sell, M::Buy), TradeSignal::Hold);
        assert_eq!(combine(T::Hold, M::Buy), TradeSignal::Hold);
        assert_eq!(combine(T::Hold, M::Sell), TradeSignal::Hold);
        assert_eq!(combine(T::Hold, M::Hold), TradeSignal::Hold);
    }

    #[test]
    fn test_thresholds_are_strict() {
        let thresholds = SignalThresholds::default();
        assert_eq!(momentum_signal(&snapshot(1.0, 1.0, 30.0), &thresholds), MomentumSignal::Hold);
        assert_eq!(momentum_signal(&snapshot(1.0, 1.0, 70.0), &thresholds), MomentumSignal::Hold);
        assert_eq!(momentum_signal(&snapshot(1.0, 1.0, 70.1), &thresholds), MomentumSignal::Sell);
    }

    #[test]
    fn test_caller_supplied_thresholds() {
        let s = snapshot(110.0, 100.0, 60.0);
        let tight = SignalThresholds {
            oversold: 40.0,
            overbought: 55.0,
        };
        assert_eq!(derive_signal(Some(&s), &tight), SignalOutcome::Signal(TradeSignal::Hold));
        assert_eq!(
            derive_signal(Some(&s), &SignalThresholds::default()),
            SignalOutcome::Signal(TradeSignal::Buy)
        );
    }

    #[test]
    fn test_missing_snapshot_is_not_hold() {
        let outcome = derive_signal(None, &SignalThresholds::default());
        assert_eq!(outcome, SignalOutcome::InsufficientData);
        assert_eq!(outcome.signal(), None);
        assert_eq!(outcome.to_string(), "insufficient_data");
    }

    #[test]
    fn test_derive_signal_is_deterministic() {
        let s = snapshot(101.0, 100.0, 50.0);
        let thresholds = SignalThresholds::default();
        let first = derive_signal(Some(&s), &thresholds);
        for _ in 0..10 {
            assert_eq!(derive_signal(Some(&s), &thresholds), first);
        }
    }

    #[test]
    fn test_analyze_series_on_short_series() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let points = (0..30)
            .map(|i| PricePoint::new(start + Duration::days(i), 100.0 + i as f64))
            .collect();
        let series = PriceSeries::new(points).unwrap();

        let analysis = analyze_series(&series, &IndicatorParams::default(), &SignalThresholds::default());
        assert_eq!(analysis.rows.len(), 30);
        assert_eq!(analysis.snapshot, None);
        assert_eq!(analysis.trend, None);
        assert_eq!(analysis.outcome, SignalOutcome::InsufficientData);
    }

    #[test]
    fn test_analyze_series_uptrend_is_vetoed_by_overbought() {
        let start = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
        let points = (0..250)
            .map(|i| PricePoint::new(start + Duration::days(i), 100.0 + i as f64))
            .collect();
        let series = PriceSeries::new(points).unwrap();

        let analysis = analyze_series(&series, &IndicatorParams::default(), &SignalThresholds::default());
        assert_eq!(analysis.trend, Some(TrendSignal::Buy));
        assert_eq!(analysis.momentum, Some(MomentumSignal::Sell));
        assert_eq!(analysis.outcome, SignalOutcome::Signal(TradeSignal::Hold));
    }

    #[test]
    fn test_validate_params() {
        let params = IndicatorParams::default();
        assert!(validate_params(&params, &SignalThresholds::default()).is_ok());

        let inverted = SignalThresholds {
            oversold: 80.0,
            overbought: 20.0,
        };
        assert!(validate_params(&params, &inverted).is_err());

        let zero_window = IndicatorParams {
            short_window: 0,
            ..params
        };
        assert!(validate_params(&zero_window, &SignalThresholds::default()).is_err());
    }
}
