//! Data models for the Savings Engine.
//!
//! The `models` module defines the serialisable inputs and outputs of
//! the cost calculator: the company profile with its current tool
//! subscriptions, the set of selected challenges, and the derived
//! calculation result.  These types derive `Serialize` and
//! `Deserialize` so they can be persisted in a snapshot or exchanged
//! over the HTTP API.

use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// The customer company being evaluated for migration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyProfile {
    /// Number of seats.  Every per-seat price is multiplied by this.
    pub employee_count: u32,
    /// Tools the company currently pays for.  Tool ids must be unique.
    #[serde(default)]
    pub selected_tools: Vec<ToolSubscription>,
}

impl CompanyProfile {
    /// Check the profile before it is handed to the calculator.
    ///
    /// Rejects a zero seat count, negative, non-finite or out-of-range
    /// fees, and duplicate tool ids.  The calculator itself never validates; it
    /// produces degenerate output for inputs that fail here.
    pub fn validate(&self) -> Result<()> {
        if self.employee_count == 0 {
            return Err(EngineError::InvalidEmployeeCount);
        }
        let mut seen = HashSet::new();
        for tool in &self.selected_tools {
            if !seen.insert(tool.tool_id.as_str()) {
                return Err(EngineError::DuplicateTool(tool.tool_id.clone()));
            }
            check_fee(&tool.tool_id, "monthlyFeePerSeat", tool.monthly_fee_per_seat)?;
            check_fee(&tool.tool_id, "annualFeePerSeat", tool.annual_fee_per_seat)?;
        }
        Ok(())
    }
}

/// Largest accepted per-seat fee, in yen.  Keeps `fee * seats * 12`
/// finite for any `u32` seat count.
pub const MAX_FEE_PER_SEAT: f64 = 1e9;

pub(crate) fn check_fee(tool_id: &str, field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && (0.0..=MAX_FEE_PER_SEAT).contains(&value) {
        Ok(())
    } else {
        Err(EngineError::InvalidFee {
            tool_id: tool_id.to_string(),
            field,
            value,
        })
    }
}

/// A single tool the company subscribes to, with fees already resolved
/// from the catalog or supplied by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolSubscription {
    pub tool_id: String,
    pub monthly_fee_per_seat: f64,
    pub annual_fee_per_seat: f64,
    /// Selects which fee is authoritative.  When `true` only
    /// `annual_fee_per_seat` is used; otherwise only
    /// `monthly_fee_per_seat`.
    #[serde(default)]
    pub is_annual_billing: bool,
}

impl ToolSubscription {
    /// Monthly cost per seat under the active billing cycle.
    pub fn active_monthly_fee(&self) -> f64 {
        if self.is_annual_billing {
            self.annual_fee_per_seat / crate::engine::MONTHS_PER_YEAR
        } else {
            self.monthly_fee_per_seat
        }
    }
}

/// The closed set of pain points a customer can select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChallengeId {
    InfoFragmentation,
    CommunicationDelay,
    ToolCost,
    CustomerManagement,
    ProjectComplexity,
    Other,
}

/// Which challenges the customer selected.
///
/// `other` may carry a free-text label describing the challenge; the
/// label is ignored unless `other` is selected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeSelection {
    #[serde(default)]
    pub selected: BTreeSet<ChallengeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other_label: Option<String>,
}

impl ChallengeSelection {
    pub fn new<I: IntoIterator<Item = ChallengeId>>(ids: I) -> Self {
        Self {
            selected: ids.into_iter().collect(),
            other_label: None,
        }
    }

    /// Select `other` with the given free-text label.
    pub fn with_other(mut self, label: impl Into<String>) -> Self {
        self.selected.insert(ChallengeId::Other);
        self.other_label = Some(label.into());
        self
    }

    pub fn is_selected(&self, id: ChallengeId) -> bool {
        self.selected.contains(&id)
    }
}

/// A suggested solution derived from a selected challenge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UseCase {
    pub challenge_label: String,
    pub solution_text: String,
    pub feature_text: String,
}

/// The outcome of a single cost comparison.
///
/// All amounts are in yen.  Savings fields are negative when the
/// target platform costs more than the current tool set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResult {
    pub current_monthly_cost: f64,
    pub current_annual_cost: f64,
    pub target_monthly_cost: f64,
    pub target_annual_cost: f64,
    pub monthly_savings: f64,
    pub annual_savings: f64,
    /// Percentage of the current monthly spend saved.  Zero when there
    /// is no current spend.
    pub savings_percentage: f64,
    /// Annual savings relative to the target platform's annual cost, in
    /// percent.  Zero when the target costs nothing.
    pub roi: f64,
    /// Months of savings needed to cover one year of the target
    /// platform.  Zero when there are no savings.
    pub payback_period_months: f64,
    /// Monthly hours no longer spent moving information between tools.
    pub labor_hours_saved: f64,
    pub labor_cost_saved: f64,
    pub use_cases: Vec<UseCase>,
}

impl CalculationResult {
    /// True when every numeric field is finite.
    pub fn is_finite(&self) -> bool {
        [
            self.current_monthly_cost,
            self.current_annual_cost,
            self.target_monthly_cost,
            self.target_annual_cost,
            self.monthly_savings,
            self.annual_savings,
            self.savings_percentage,
            self.roi,
            self.payback_period_months,
            self.labor_hours_saved,
            self.labor_cost_saved,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}

/// A named profile/selection pair used when comparing several
/// scenarios side by side.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub label: String,
    pub profile: CompanyProfile,
    #[serde(default)]
    pub challenges: ChallengeSelection,
}
