use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use tracing::{error, info};

use crate::errors::AppError;
use crate::external::price_provider::LookbackRange;
use crate::models::{
    IndicatorParams, IndicatorResponse, PriceSeries, SignalQuery, SignalResponse, SignalThresholds,
    StockAnalysisRequest, StockAnalysisResponse,
};
use crate::services::{price_service, signal_service};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/analyze", post(analyze_stock))
        .route("/:ticker/indicators", get(get_indicators))
        .route("/:ticker/signal", get(get_signal))
}

fn normalize_ticker(raw: &str) -> Result<String, AppError> {
    let ticker = raw.trim().to_uppercase();
    if ticker.is_empty() {
        return Err(AppError::Validation("Ticker is required.".to_string()));
    }
    Ok(ticker)
}

fn params_from_query(query: &SignalQuery) -> Result<(IndicatorParams, SignalThresholds), AppError> {
    let defaults = IndicatorParams::default();
    let params = IndicatorParams {
        short_window: query.short_window.unwrap_or(defaults.short_window),
        long_window: query.long_window.unwrap_or(defaults.long_window),
        oscillator_period: query.oscillator_period.unwrap_or(defaults.oscillator_period),
    };

    let default_thresholds = SignalThresholds::default();
    let thresholds = SignalThresholds {
        oversold: query.oversold.unwrap_or(default_thresholds.oversold),
        overbought: query.overbought.unwrap_or(default_thresholds.overbought),
    };

    signal_service::validate_params(&params, &thresholds).map_err(|msg| {
        error!("Invalid signal parameters: {}", msg);
        AppError::Validation(msg)
    })?;

    Ok((params, thresholds))
}

/// Enough daily history for every window in `params`.
async fn fetch_for_indicators(
    state: &AppState,
    ticker: &str,
    params: &IndicatorParams,
) -> Result<PriceSeries, AppError> {
    let needed = params
        .long_window
        .max(params.short_window)
        .max(params.oscillator_period.saturating_add(1));

    let series =
        price_service::fetch_series(state.price_provider.as_ref(), ticker, LookbackRange::covering(needed)).await?;

    if series.is_empty() {
        error!("No price data found for symbol: {}", ticker);
        return Err(AppError::NotFound("No data found.".to_string()));
    }
    Ok(series)
}

/// POST /stock/analyze
/// Summary statistics of the trailing month of closes.
#[axum::debug_handler]
pub async fn analyze_stock(
    State(state): State<AppState>,
    payload: Result<Json<StockAnalysisRequest>, JsonRejection>,
) -> Result<Json<StockAnalysisResponse>, AppError> {
    let Json(request) = payload?;
    let symbol = normalize_ticker(&request.ticker)?;
    info!("POST /stock/analyze - ticker={}", symbol);

    let series =
        price_service::fetch_series(state.price_provider.as_ref(), &symbol, LookbackRange::OneMonth).await?;

    let summary = price_service::summarize(&series).ok_or_else(|| {
        error!("No price data found for symbol: {}", symbol);
        AppError::NotFound("No data found.".to_string())
    })?;

    // Echo the ticker as the caller sent it
    Ok(Json(StockAnalysisResponse {
        ticker: request.ticker,
        summary,
    }))
}

/// GET /stock/:ticker/indicators
/// Closes with SMA-short, SMA-long and RSI columns, `null` during warm-up.
#[axum::debug_handler]
pub async fn get_indicators(
    Path(ticker): Path<String>,
    Query(query): Query<SignalQuery>,
    State(state): State<AppState>,
) -> Result<Json<IndicatorResponse>, AppError> {
    let ticker = normalize_ticker(&ticker)?;
    let (params, _) = params_from_query(&query)?;
    info!(
        "GET /stock/{}/indicators - windows={}/{}, period={}",
        ticker, params.short_window, params.long_window, params.oscillator_period
    );

    let series = fetch_for_indicators(&state, &ticker, &params).await?;
    let rows = crate::services::indicators::compute_indicators(&series, &params);

    Ok(Json(IndicatorResponse { ticker, params, rows }))
}

/// GET /stock/:ticker/signal
///
/// Buy/sell/hold from the moving-average trend, vetoed by RSI extremes.
/// Reports `insufficient_data` when the history is shorter than the windows.
///
/// # Example
/// ```text
/// GET /stock/AAPL/signal?oversold=25&overbought=75
/// ```
#[axum::debug_handler]
pub async fn get_signal(
    Path(ticker): Path<String>,
    Query(query): Query<SignalQuery>,
    State(state): State<AppState>,
) -> Result<Json<SignalResponse>, AppError> {
    let ticker = normalize_ticker(&ticker)?;
    let (params, thresholds) = params_from_query(&query)?;
    info!(
        "GET /stock/{}/signal - oversold={}, overbought={}",
        ticker, thresholds.oversold, thresholds.overbought
    );

    let series = fetch_for_indicators(&state, &ticker, &params).await?;
    let analysis = signal_service::analyze_series(&series, &params, &thresholds);

    info!("Signal for {}: {}", ticker, analysis.outcome);

    Ok(Json(SignalResponse {
        ticker,
        params,
        thresholds,
        snapshot: analysis.snapshot,
        trend: analysis.trend,
        momentum: analysis.momentum,
        signal: analysis.outcome.to_string(),
        analyzed_at: chrono::Utc::now(),
    }))
}
