use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::AllocationProfile;

/// Monthly spending per free-text category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpenseBreakdown(BTreeMap<String, f64>);

impl ExpenseBreakdown {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn with(mut self, category: &str, amount: f64) -> Self {
        self.0.insert(category.to_string(), amount);
        self
    }

    pub fn get(&self, category: &str) -> Option<f64> {
        self.0.get(category).copied()
    }

    /// Exact, case-sensitive key lookup.
    pub fn contains(&self, category: &str) -> bool {
        self.0.contains_key(category)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }

    /// First category whose amount is negative or not a finite number.
    pub fn first_invalid(&self) -> Option<(&str, f64)> {
        self.iter().find(|(_, v)| !v.is_finite() || *v < 0.0)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecommendRequest {
    /// Plain age ("28") or an age band ("26-35"). Kept untyped so a
    /// missing or non-string age is reported as an invalid age.
    #[serde(default)]
    pub age: Option<Value>,
    #[serde(default)]
    pub goal: String,
    #[serde(default)]
    pub expenses: ExpenseBreakdown,
}

impl RecommendRequest {
    pub fn age_text(&self) -> Option<&str> {
        self.age.as_ref().and_then(Value::as_str)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendResponse {
    pub age: u64,
    pub goal: String,
    pub asset_allocation: AllocationProfile,
    pub stock_suggestions: Vec<String>,
    pub mutual_fund_suggestions: Vec<String>,
    pub travel_suggestions: Vec<String>,
    pub savings_tips: Vec<String>,
}

/// Row written to the recommendation log.
#[derive(Debug, Clone)]
pub struct NewRecommendation {
    pub age_group: String,
    pub goal: String,
    pub recommended_stocks: String,
}
