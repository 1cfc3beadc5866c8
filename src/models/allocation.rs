use serde::{Deserialize, Serialize};

// ── Asset classes ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetClass {
    Stocks,
    #[serde(rename = "Mutual Funds")]
    MutualFunds,
    Gold,
    #[serde(rename = "Real Estate")]
    RealEstate,
    Bonds,
}

impl AssetClass {
    pub const ALL: [AssetClass; 5] = [
        AssetClass::Stocks,
        AssetClass::MutualFunds,
        AssetClass::Gold,
        AssetClass::RealEstate,
        AssetClass::Bonds,
    ];
}

impl std::fmt::Display for AssetClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetClass::Stocks => write!(f, "Stocks"),
            AssetClass::MutualFunds => write!(f, "Mutual Funds"),
            AssetClass::Gold => write!(f, "Gold"),
            AssetClass::RealEstate => write!(f, "Real Estate"),
            AssetClass::Bonds => write!(f, "Bonds"),
        }
    }
}

// ── Goals ────────────────────────────────────────────────────────────

/// Financial goal, resolved once from free text at the API boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalCategory {
    Growth,
    Income,
    Retirement,
    TaxSaving,
    General,
}

impl GoalCategory {
    /// Case-insensitive keyword match. The first matching group wins.
    pub fn classify(goal: &str) -> Self {
        let goal = goal.to_lowercase();
        if goal.contains("wealth") || goal.contains("growth") {
            GoalCategory::Growth
        } else if goal.contains("stable") || goal.contains("income") {
            GoalCategory::Income
        } else if goal.contains("retirement") {
            GoalCategory::Retirement
        } else if goal.contains("tax") {
            GoalCategory::TaxSaving
        } else {
            GoalCategory::General
        }
    }
}

impl std::fmt::Display for GoalCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GoalCategory::Growth => write!(f, "growth"),
            GoalCategory::Income => write!(f, "income"),
            GoalCategory::Retirement => write!(f, "retirement"),
            GoalCategory::TaxSaving => write!(f, "tax_saving"),
            GoalCategory::General => write!(f, "general"),
        }
    }
}

// ── Allocations ──────────────────────────────────────────────────────

/// Raw integer weights per asset class before normalization.
/// Goal adjustments may push a weight below zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AssetWeights {
    #[serde(rename = "Stocks")]
    pub stocks: i32,
    #[serde(rename = "Mutual Funds")]
    pub mutual_funds: i32,
    #[serde(rename = "Gold")]
    pub gold: i32,
    #[serde(rename = "Real Estate")]
    pub real_estate: i32,
    #[serde(rename = "Bonds")]
    pub bonds: i32,
}

impl AssetWeights {
    pub const fn new(stocks: i32, mutual_funds: i32, gold: i32, real_estate: i32, bonds: i32) -> Self {
        Self {
            stocks,
            mutual_funds,
            gold,
            real_estate,
            bonds,
        }
    }

    pub fn get(&self, class: AssetClass) -> i32 {
        match class {
            AssetClass::Stocks => self.stocks,
            AssetClass::MutualFunds => self.mutual_funds,
            AssetClass::Gold => self.gold,
            AssetClass::RealEstate => self.real_estate,
            AssetClass::Bonds => self.bonds,
        }
    }

    pub fn total(&self) -> i32 {
        AssetClass::ALL.iter().map(|&c| self.get(c)).sum()
    }
}

/// Normalized percentages per asset class. Serialized as a JSON object keyed
/// by display name, e.g. `{"Stocks": 55, "Mutual Funds": 27, ...}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AllocationProfile {
    #[serde(rename = "Stocks")]
    pub stocks: u32,
    #[serde(rename = "Mutual Funds")]
    pub mutual_funds: u32,
    #[serde(rename = "Gold")]
    pub gold: u32,
    #[serde(rename = "Real Estate")]
    pub real_estate: u32,
    #[serde(rename = "Bonds")]
    pub bonds: u32,
}

impl AllocationProfile {
    pub fn get(&self, class: AssetClass) -> u32 {
        match class {
            AssetClass::Stocks => self.stocks,
            AssetClass::MutualFunds => self.mutual_funds,
            AssetClass::Gold => self.gold,
            AssetClass::RealEstate => self.real_estate,
            AssetClass::Bonds => self.bonds,
        }
    }

    pub fn set(&mut self, class: AssetClass, value: u32) {
        match class {
            AssetClass::Stocks => self.stocks = value,
            AssetClass::MutualFunds => self.mutual_funds = value,
            AssetClass::Gold => self.gold = value,
            AssetClass::RealEstate => self.real_estate = value,
            AssetClass::Bonds => self.bonds = value,
        }
    }

    pub fn total(&self) -> u32 {
        AssetClass::ALL.iter().map(|&c| self.get(c)).sum()
    }
}
