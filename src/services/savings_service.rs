use crate::models::ExpenseBreakdown;

pub const CUT_NON_ESSENTIALS_TIP: &str = "💡 Consider cutting down non-essential expenses.";
pub const RECURRING_DEPOSIT_TIP: &str = "💰 Start a SIP or Recurring Deposit (RD) to lock in monthly savings.";
pub const TRACK_SPENDING_TIP: &str = "📱 Track daily spending using apps like Walnut or Moneyview.";
pub const HEALTH_BUFFER_TIP: &str = "⚕️ It's good to keep a monthly buffer for health expenses.";

const ESSENTIAL_CATEGORIES: [&str; 3] = ["medicine", "grocery", "academic"];
const NON_ESSENTIAL_SHARE: f64 = 0.4;
const HIGH_SPEND_THRESHOLD: f64 = 50_000.0;

fn is_essential(category: &str) -> bool {
    let category = category.to_lowercase();
    ESSENTIAL_CATEGORIES.contains(&category.as_str())
}

/// Savings tips for a monthly expense breakdown, in a fixed order:
/// non-essential share, overall spend level, health buffer.
pub fn suggest_savings(expenses: &ExpenseBreakdown) -> Vec<String> {
    let total = expenses.total();
    let non_essentials: f64 = expenses
        .iter()
        .filter(|(category, _)| !is_essential(category))
        .map(|(_, amount)| amount)
        .sum();

    let mut tips = Vec::new();

    if non_essentials > NON_ESSENTIAL_SHARE * total {
        tips.push(CUT_NON_ESSENTIALS_TIP.to_string());
    }

    if total > HIGH_SPEND_THRESHOLD {
        tips.push(RECURRING_DEPOSIT_TIP.to_string());
    } else {
        tips.push(TRACK_SPENDING_TIP.to_string());
    }

    // exact key, unlike the essential-category check above
    if !expenses.contains("medicine") {
        tips.push(HEALTH_BUFFER_TIP.to_string());
    }

    tips
}
