use futures::future::join_all;
use tracing::{info, warn};

use crate::errors::LlmError;
use crate::external::price_provider::{LookbackRange, PriceProvider};
use crate::models::PriceSeries;
use crate::services::llm_service::LlmService;

/// Large caps ranked for the stock suggestions
pub const WATCHLIST: [&str; 10] = ["AAPL", "MSFT", "GOOGL", "AMZN", "TSLA", "NVDA", "META", "JPM", "V", "JNJ"];
const TOP_MOVERS: usize = 5;

const FINANCE_SYSTEM_PROMPT: &str = "You are a financial assistant.";
const MUTUAL_FUND_PROMPT: &str = "Suggest the top 5 mutual funds in India based on recent performance and CAGR.";
const TRAVEL_SYSTEM_PROMPT: &str = "You are a helpful travel assistant.";

/// Free-text suggestions backed by an injected completion provider.
/// Provider failures come back as a one-entry list holding a diagnostic.
pub struct SuggestionService {
    llm: LlmService,
}

impl SuggestionService {
    pub fn new(llm: LlmService) -> Self {
        Self { llm }
    }

    pub async fn mutual_fund_suggestions(&self) -> Vec<String> {
        match self.llm.generate_completion(FINANCE_SYSTEM_PROMPT, MUTUAL_FUND_PROMPT).await {
            Ok(reply) => split_lines(&reply),
            Err(e) => {
                warn!("Mutual fund suggestions unavailable: {}", e);
                vec![diagnostic(&e)]
            }
        }
    }

    pub async fn travel_suggestions(&self, budget: f64) -> Vec<String> {
        let prompt = format!("Suggest travel destinations in India within ₹{:?} budget.", budget);
        match self.llm.generate_completion(TRAVEL_SYSTEM_PROMPT, &prompt).await {
            Ok(reply) => parse_travel_reply(&reply),
            Err(e) => {
                warn!("Travel suggestions unavailable for budget {}: {}", budget, e);
                vec![diagnostic(&e)]
            }
        }
    }
}

/// Message shown in place of suggestions when the provider fails.
pub fn diagnostic(error: &LlmError) -> String {
    match error {
        LlmError::MissingApiKey => "Missing API key. Set LLM_API_KEY environment variable.".to_string(),
        LlmError::Disabled => "Suggestions are disabled. Set LLM_ENABLED=true to enable them.".to_string(),
        LlmError::ApiError { status, body } => format!("API Error: {} - {}", status, body),
        other => format!("Unexpected error: {}", other),
    }
}

/// Trimmed, non-empty lines of a reply.
pub fn split_lines(reply: &str) -> Vec<String> {
    reply
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Drop list numbering or bullets ("1. ", "2) ", "- ") from a line that starts with one.
pub fn strip_list_marker(line: &str) -> &str {
    let starts_with_marker = line
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit() || c == '-');
    if !starts_with_marker {
        return line;
    }
    line.trim_start_matches(|c: char| c.is_ascii_digit() || matches!(c, '.' | '-' | ')' | ' '))
}

pub fn parse_travel_reply(reply: &str) -> Vec<String> {
    reply
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(strip_list_marker)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Percentage change from the first to the last close, to two decimals.
pub fn growth_pct(series: &PriceSeries) -> Option<f64> {
    let first = series.first()?.close;
    let last = series.last()?.close;
    if first == 0.0 {
        return None;
    }
    let growth = (last - first) / first * 100.0;
    Some((growth * 100.0).round() / 100.0)
}

/// Best one-month performers among `symbols`, formatted as `"SYM: 3.21%"`
/// (whole numbers keep their decimal point, `"SYM: 4.0%"`).
/// Symbols that fail to load or have no data are skipped.
pub async fn top_movers(provider: &dyn PriceProvider, symbols: &[&str]) -> Vec<String> {
    let fetches = symbols.iter().map(|&symbol| async move {
        match provider.fetch_daily_history(symbol, LookbackRange::OneMonth).await {
            Ok(points) => growth_pct(&PriceSeries::from_unordered(points)).map(|g| (symbol, g)),
            Err(e) => {
                warn!("Skipping {} in top movers: {}", symbol, e);
                None
            }
        }
    });

    let mut performance: Vec<(&str, f64)> = join_all(fetches).await.into_iter().flatten().collect();
    performance.sort_by(|a, b| b.1.total_cmp(&a.1));

    info!("Ranked {} of {} symbols for top movers", performance.len(), symbols.len());

    performance
        .into_iter()
        .take(TOP_MOVERS)
        .map(|(symbol, growth)| format!("{}: {:?}%", symbol, growth))
        .collect()
}
