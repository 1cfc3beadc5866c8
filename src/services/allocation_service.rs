use std::num::IntErrorKind;

use tracing::debug;

use crate::models::{AllocationProfile, AssetClass, AssetWeights, GoalCategory};

// Base weights per age band: Stocks, Mutual Funds, Gold, Real Estate, Bonds
const UP_TO_25: AssetWeights = AssetWeights::new(60, 20, 5, 10, 5);
const UP_TO_35: AssetWeights = AssetWeights::new(50, 25, 5, 15, 5);
const UP_TO_50: AssetWeights = AssetWeights::new(35, 30, 10, 20, 5);
const OVER_50: AssetWeights = AssetWeights::new(20, 25, 15, 20, 20);

/// Parse "45" or an age band such as "26-35". For a band only the lower
/// bound is used. Anything else is rejected.
///
/// Digit strings too large for `u64` saturate instead of failing.
pub fn parse_age(input: &str) -> Option<u64> {
    let candidate = match input.split_once('-') {
        Some((low, _)) => low,
        None => input,
    };
    match candidate.trim().parse::<u64>() {
        Ok(age) => Some(age),
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => Some(u64::MAX),
        Err(_) => None,
    }
}

/// Age bands: <=25, <=35, <=50, >50.
pub fn base_allocation(age: u64) -> AssetWeights {
    if age <= 25 {
        UP_TO_25
    } else if age <= 35 {
        UP_TO_35
    } else if age <= 50 {
        UP_TO_50
    } else {
        OVER_50
    }
}

/// Shift weights toward the goal. The result may contain negative weights.
pub fn apply_goal_adjustment(weights: AssetWeights, goal: GoalCategory) -> AssetWeights {
    let mut adjusted = weights;
    match goal {
        GoalCategory::Growth => {
            adjusted.stocks += 10;
            adjusted.bonds -= 5;
            adjusted.mutual_funds += 5;
        }
        GoalCategory::Income => {
            adjusted.bonds += 10;
            adjusted.stocks -= 10;
        }
        GoalCategory::Retirement => {
            adjusted.bonds += 15;
            adjusted.stocks -= 15;
        }
        GoalCategory::TaxSaving => {
            adjusted.mutual_funds += 10;
            adjusted.stocks -= 5;
        }
        GoalCategory::General => {}
    }
    adjusted
}

/// Scale weights to percentages of their sum, rounding each entry on its own
/// (ties to even). Sums can land a point or two off 100.
///
/// Negative weights count as zero. If nothing positive remains the
/// allocation is split evenly.
pub fn normalize(weights: &AssetWeights) -> AllocationProfile {
    let clamped = |class: AssetClass| weights.get(class).max(0);
    let total: i32 = AssetClass::ALL.iter().map(|&c| clamped(c)).sum();

    let mut profile = AllocationProfile::default();

    if total == 0 {
        debug!("Allocation weights sum to zero, falling back to an equal split");
        let share = 100 / AssetClass::ALL.len() as u32;
        for class in AssetClass::ALL {
            profile.set(class, share);
        }
        return profile;
    }

    for class in AssetClass::ALL {
        let pct = (clamped(class) as f64 * 100.0 / total as f64).round_ties_even();
        profile.set(class, pct as u32);
    }
    profile
}

/// Base allocation for `age`, adjusted for `goal`, normalized to percentages.
pub fn dynamic_allocation(age: u64, goal: GoalCategory) -> AllocationProfile {
    normalize(&apply_goal_adjustment(base_allocation(age), goal))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(stocks: u32, mutual_funds: u32, gold: u32, real_estate: u32, bonds: u32) -> AllocationProfile {
        AllocationProfile {
            stocks,
            mutual_funds,
            gold,
            real_estate,
            bonds,
        }
    }

    #[test]
    fn test_parse_age() {
        assert_eq!(parse_age("26-35"), Some(26));
        assert_eq!(parse_age("45"), Some(45));
        assert_eq!(parse_age(" 45 "), Some(45));
        assert_eq!(parse_age("abc"), None);
        assert_eq!(parse_age(""), None);
        assert_eq!(parse_age("-5"), None);
        assert_eq!(parse_age("x-35"), None);
        assert_eq!(parse_age("4.5"), None);
    }

    #[test]
    fn test_parse_age_large_values() {
        assert_eq!(parse_age("99999999999"), Some(99_999_999_999));
        assert_eq!(parse_age("99999999999999999999999-100"), Some(u64::MAX));
        assert_eq!(base_allocation(u64::MAX), OVER_50);
    }

    #[test]
    fn test_base_allocation_bands() {
        for age in 0..=25 {
            assert_eq!(base_allocation(age), AssetWeights::new(60, 20, 5, 10, 5));
        }
        for age in 26..=35 {
            assert_eq!(base_allocation(age), AssetWeights::new(50, 25, 5, 15, 5));
        }
        for age in 36..=50 {
            assert_eq!(base_allocation(age), AssetWeights::new(35, 30, 10, 20, 5));
        }
        for age in [51, 65, 99] {
            assert_eq!(base_allocation(age), AssetWeights::new(20, 25, 15, 20, 20));
        }
    }

    #[test]
    fn test_base_allocations_sum_to_100() {
        for age in [20, 30, 40, 60] {
            assert_eq!(base_allocation(age).total(), 100);
        }
    }

    #[test]
    fn test_wealth_growth_at_30() {
        let adjusted = apply_goal_adjustment(base_allocation(30), GoalCategory::classify("Wealth Growth"));
        assert_eq!(adjusted, AssetWeights::new(60, 30, 5, 15, 0));
        assert_eq!(adjusted.total(), 110);

        assert_eq!(normalize(&adjusted), profile(55, 27, 5, 14, 0));
    }

    #[test]
    fn test_other_goal_adjustments() {
        let base = base_allocation(60);
        assert_eq!(
            apply_goal_adjustment(base, GoalCategory::Income),
            AssetWeights::new(10, 25, 15, 20, 30)
        );
        assert_eq!(
            apply_goal_adjustment(base, GoalCategory::Retirement),
            AssetWeights::new(5, 25, 15, 20, 35)
        );
        assert_eq!(
            apply_goal_adjustment(base, GoalCategory::TaxSaving),
            AssetWeights::new(15, 35, 15, 20, 20)
        );
        assert_eq!(apply_goal_adjustment(base, GoalCategory::General), base);
    }

    #[test]
    fn test_tax_saving_at_20_rounds_each_entry() {
        // 55/30/5/10/5 over 105
        assert_eq!(dynamic_allocation(20, GoalCategory::TaxSaving), profile(52, 29, 5, 10, 5));
    }

    #[test]
    fn test_normalize_keeps_exact_profiles() {
        assert_eq!(
            dynamic_allocation(40, GoalCategory::General),
            profile(35, 30, 10, 20, 5)
        );
        assert_eq!(
            dynamic_allocation(55, GoalCategory::Retirement),
            profile(5, 25, 15, 20, 35)
        );
    }

    #[test]
    fn test_normalize_sum_within_rounding_slack() {
        let goals = [
            GoalCategory::Growth,
            GoalCategory::Income,
            GoalCategory::Retirement,
            GoalCategory::TaxSaving,
            GoalCategory::General,
        ];
        for age in 0..=120 {
            for goal in goals {
                let total = dynamic_allocation(age, goal).total();
                assert!((98..=102).contains(&total), "age {} goal {} summed to {}", age, goal, total);
            }
        }
    }

    #[test]
    fn test_normalize_clamps_negative_weights() {
        let weights = AssetWeights::new(-10, 50, 0, 25, 25);
        assert_eq!(normalize(&weights), profile(0, 50, 0, 25, 25));
    }

    #[test]
    fn test_normalize_zero_sum_splits_evenly() {
        assert_eq!(normalize(&AssetWeights::default()), profile(20, 20, 20, 20, 20));
        assert_eq!(
            normalize(&AssetWeights::new(-5, 0, 0, 0, 0)),
            profile(20, 20, 20, 20, 20)
        );
    }

    #[test]
    fn test_round_ties_to_even() {
        // 1/8 of 100 = 12.5 -> 12, 3/8 = 37.5 -> 38
        let weights = AssetWeights::new(1, 3, 2, 2, 0);
        assert_eq!(normalize(&weights), profile(12, 38, 25, 25, 0));
    }
}
