use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct StockAnalysisRequest {
    pub ticker: String,
}

/// Descriptive statistics of closing prices.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceSummary {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation; undefined for a single observation
    pub std: Option<f64>,
    pub min: f64,
    #[serde(rename = "25%")]
    pub p25: f64,
    #[serde(rename = "50%")]
    pub p50: f64,
    #[serde(rename = "75%")]
    pub p75: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockAnalysisResponse {
    pub ticker: String,
    pub summary: PriceSummary,
}
