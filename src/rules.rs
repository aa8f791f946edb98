//! Challenge to use-case rules.
//!
//! A fixed table maps each known challenge to a suggested solution and
//! the platform feature that delivers it.  The table order is the order
//! in which use cases are reported, independent of selection order.

use crate::models::{ChallengeId, ChallengeSelection, UseCase};

/// One row of the rule table.
#[derive(Debug, Clone, Copy)]
pub struct ChallengeRule {
    pub id: ChallengeId,
    pub label: &'static str,
    pub solution: &'static str,
    pub feature: &'static str,
}

pub const CHALLENGE_RULES: &[ChallengeRule] = &[
    ChallengeRule {
        id: ChallengeId::InfoFragmentation,
        label: "Information scattered across tools",
        solution: "Keep chat, files and tasks in one shared workspace so nothing has to be looked up in three places",
        feature: "Unified search across messages, documents and projects",
    },
    ChallengeRule {
        id: ChallengeId::CommunicationDelay,
        label: "Slow internal communication",
        solution: "Move decisions into threaded channels with read receipts and mentions",
        feature: "Real-time chat with built-in video meetings",
    },
    ChallengeRule {
        id: ChallengeId::ToolCost,
        label: "Rising tool subscription costs",
        solution: "Replace overlapping subscriptions with a single per-seat plan",
        feature: "All-in-one plan covering chat, meetings, storage and CRM",
    },
    ChallengeRule {
        id: ChallengeId::CustomerManagement,
        label: "Customer information is hard to manage",
        solution: "Track every customer interaction next to the conversations about it",
        feature: "Built-in CRM with deal pipelines and contact history",
    },
    ChallengeRule {
        id: ChallengeId::ProjectComplexity,
        label: "Projects are hard to keep on track",
        solution: "Plan work with shared boards, owners and due dates visible to the whole team",
        feature: "Project boards with Gantt view and automatic reminders",
    },
];

const OTHER_SOLUTION: &str = "Review the workflow together and configure the platform around it";
const OTHER_FEATURE: &str = "Custom workflows and integrations";

/// Look up the rule for a challenge.  `Other` has no fixed rule.
pub fn rule_for(id: ChallengeId) -> Option<&'static ChallengeRule> {
    CHALLENGE_RULES.iter().find(|rule| rule.id == id)
}

/// Build the use-case list for a selection.
///
/// Emits one entry per selected challenge that has a rule, in table
/// order, followed by a generic entry for `other` when it is selected
/// with a non-blank label.
pub fn use_cases_for(selection: &ChallengeSelection) -> Vec<UseCase> {
    let mut use_cases: Vec<UseCase> = CHALLENGE_RULES
        .iter()
        .filter(|rule| selection.is_selected(rule.id))
        .map(|rule| UseCase {
            challenge_label: rule.label.to_string(),
            solution_text: rule.solution.to_string(),
            feature_text: rule.feature.to_string(),
        })
        .collect();

    if selection.is_selected(ChallengeId::Other) {
        let label = selection.other_label.as_deref().map(str::trim).unwrap_or("");
        if !label.is_empty() {
            use_cases.push(UseCase {
                challenge_label: label.to_string(),
                solution_text: OTHER_SOLUTION.to_string(),
                feature_text: OTHER_FEATURE.to_string(),
            });
        }
    }
    use_cases
}
