//! Cost comparison engine.
//!
//! The `engine` module turns a [`CompanyProfile`] and a
//! [`ChallengeSelection`] into a [`CalculationResult`].  [`calculate`]
//! is a pure function: no I/O, no clocks, no shared state.  Division by
//! zero is never an error; each ratio has a defined fallback of `0` so
//! the function always returns finite numbers for fees that pass
//! [`CompanyProfile::validate`].
//!
//! [`compare_scenarios`] uses the [`rayon`] crate to evaluate several
//! independent scenarios across CPU cores.

use crate::models::{CalculationResult, ChallengeSelection, CompanyProfile, Scenario};
use crate::rules::use_cases_for;
use rayon::prelude::*;
use tracing::debug;

/// Per-seat monthly price of the target platform, in yen.
pub const TARGET_PRICE_PER_SEAT: f64 = 1420.0;

/// Monthly hours each seat spends per tool on switching and copying
/// information between tools.
pub const INTEGRATION_HOURS_PER_TOOL: f64 = 2.0;

/// Average hourly labor cost, in yen.
pub const AVERAGE_HOURLY_WAGE: f64 = 3000.0;

pub const MONTHS_PER_YEAR: f64 = 12.0;

/// Compare the profile's current spend against the target platform.
///
/// Tools are summed in list order so repeated calls produce
/// bit-identical results.  The profile is not validated here; see
/// [`CompanyProfile::validate`].
pub fn calculate(
    profile: &CompanyProfile,
    challenges: &ChallengeSelection,
    target_price_per_seat: f64,
) -> CalculationResult {
    let seats = f64::from(profile.employee_count);

    // Sum current spend using only each tool's active billing cycle
    let mut current_monthly_cost = 0.0;
    let mut current_annual_cost = 0.0;
    for tool in &profile.selected_tools {
        let monthly = tool.active_monthly_fee() * seats;
        current_monthly_cost += monthly;
        current_annual_cost += if tool.is_annual_billing {
            tool.annual_fee_per_seat * seats
        } else {
            monthly * MONTHS_PER_YEAR
        };
    }

    // Target platform cost for the same seat count
    let target_monthly_cost = target_price_per_seat * seats;
    let target_annual_cost = target_monthly_cost * MONTHS_PER_YEAR;

    // Savings keep their sign; a negative value means the target costs more
    let monthly_savings = current_monthly_cost - target_monthly_cost;
    let annual_savings = current_annual_cost - target_annual_cost;

    let savings_percentage = ratio_percent(monthly_savings, current_monthly_cost);

    // Time no longer spent switching between tools
    let tool_count = profile.selected_tools.len() as f64;
    let labor_hours_saved = tool_count * seats * INTEGRATION_HOURS_PER_TOOL;
    let labor_cost_saved = labor_hours_saved * AVERAGE_HOURLY_WAGE;

    // ROI against the target's annual cost; payback only when there are savings
    let roi = ratio_percent(annual_savings, target_annual_cost);
    let payback_period_months = if monthly_savings > 0.0 {
        target_annual_cost / monthly_savings
    } else {
        0.0
    };

    // Use cases follow rule table order, not selection order
    let use_cases = use_cases_for(challenges);

    debug!(
        seats = profile.employee_count,
        tools = profile.selected_tools.len(),
        current_monthly_cost,
        target_monthly_cost,
        "calculated savings"
    );

    CalculationResult {
        current_monthly_cost,
        current_annual_cost,
        target_monthly_cost,
        target_annual_cost,
        monthly_savings,
        annual_savings,
        savings_percentage,
        roi,
        payback_period_months,
        labor_hours_saved,
        labor_cost_saved,
        use_cases,
    }
}

/// `numerator / denominator * 100`, or `0` for a zero denominator.
fn ratio_percent(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator * 100.0
    }
}

/// Evaluate several scenarios in parallel.  Results are returned in the
/// same order as `scenarios`.
pub fn compare_scenarios(scenarios: &[Scenario], target_price_per_seat: f64) -> Vec<CalculationResult> {
    scenarios
        .par_iter()
        .map(|scenario| calculate(&scenario.profile, &scenario.challenges, target_price_per_seat))
        .collect()
}
