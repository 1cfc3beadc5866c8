use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Window lengths used when deriving indicator columns from closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorParams {
    pub short_window: usize,
    pub long_window: usize,
    pub oscillator_period: usize,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            short_window: 50,
            long_window: 200,
            oscillator_period: 14,
        }
    }
}

/// Oscillator cutoffs for the momentum leg of a signal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalThresholds {
    pub oversold: f64,
    pub overbought: f64,
}

impl Default for SignalThresholds {
    fn default() -> Self {
        Self {
            oversold: 30.0,
            overbought: 70.0,
        }
    }
}

/// One row of a price series augmented with its derived columns.
/// Derived values are `None` while the window has not filled yet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IndicatorRow {
    pub timestamp: DateTime<Utc>,
    pub close: f64,
    pub sma_short: Option<f64>,
    pub sma_long: Option<f64>,
    pub oscillator: Option<f64>,
}

/// Latest point of a series where every derived value is defined.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub timestamp: DateTime<Utc>,
    pub close: f64,
    pub sma_short: f64,
    pub sma_long: f64,
    pub oscillator: f64,
}

/// Direction of the moving-average crossover
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrendSignal {
    #[serde(rename = "buy")]
    Buy,
    #[serde(rename = "sell")]
    Sell,
    #[serde(rename = "hold")]
    Hold,
}

/// Reading of the oscillator against the thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MomentumSignal {
    #[serde(rename = "buy")]
    Buy,
    #[serde(rename = "sell")]
    Sell,
    #[serde(rename = "hold")]
    Hold,
}

/// Final trading call for a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TradeSignal {
    #[serde(rename = "buy")]
    Buy,
    #[serde(rename = "sell")]
    Sell,
    #[serde(rename = "hold")]
    Hold,
}

impl std::fmt::Display for TradeSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradeSignal::Buy => write!(f, "buy"),
            TradeSignal::Sell => write!(f, "sell"),
            TradeSignal::Hold => write!(f, "hold"),
        }
    }
}

/// Result of signal derivation. `InsufficientData` is not a trading call
/// and must never be read as `Hold`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalOutcome {
    Signal(TradeSignal),
    InsufficientData,
}

impl SignalOutcome {
    pub fn signal(&self) -> Option<TradeSignal> {
        match self {
            SignalOutcome::Signal(signal) => Some(*signal),
            SignalOutcome::InsufficientData => None,
        }
    }
}

impl std::fmt::Display for SignalOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SignalOutcome::Signal(signal) => write!(f, "{}", signal),
            SignalOutcome::InsufficientData => write!(f, "insufficient_data"),
        }
    }
}

/// Query parameters accepted by the indicator and signal endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignalQuery {
    pub short_window: Option<usize>,
    pub long_window: Option<usize>,
    pub oscillator_period: Option<usize>,
    pub oversold: Option<f64>,
    pub overbought: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct IndicatorResponse {
    pub ticker: String,
    pub params: IndicatorParams,
    pub rows: Vec<IndicatorRow>,
}

#[derive(Debug, Serialize)]
pub struct SignalResponse {
    pub ticker: String,
    pub params: IndicatorParams,
    pub thresholds: SignalThresholds,
    pub snapshot: Option<IndicatorSnapshot>,
    pub trend: Option<TrendSignal>,
    pub momentum: Option<MomentumSignal>,
    /// `buy`, `sell`, `hold` or `insufficient_data`
    pub signal: String,
    pub analyzed_at: DateTime<Utc>,
}
