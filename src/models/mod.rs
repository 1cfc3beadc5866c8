mod allocation;
mod price_point;
mod recommendation;
mod signal;
mod stock;

pub use allocation::{AllocationProfile, AssetClass, AssetWeights, GoalCategory};
pub use price_point::{PricePoint, PriceSeries};
pub use recommendation::{ExpenseBreakdown, NewRecommendation, RecommendRequest, RecommendResponse};
pub use signal::{
    IndicatorParams, IndicatorResponse, IndicatorRow, IndicatorSnapshot, MomentumSignal,
    SignalOutcome, SignalQuery, SignalResponse, SignalThresholds, TradeSignal, TrendSignal,
};
pub use stock::{PriceSummary, StockAnalysisRequest, StockAnalysisResponse};
