//! Tool price catalog.
//!
//! The `catalog` module holds the static price list of SaaS tools a
//! customer may currently pay for, and resolves a user's tool picks
//! into [`ToolSubscription`]s with concrete fees.  The built-in list can
//! be extended or overridden by JSON files stored in a directory, one
//! tool or an array of tools per file.

use crate::error::{EngineError, Result};
use crate::models::ToolSubscription;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

/// Published price of a tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolPrice {
    pub tool_id: String,
    pub display_name: String,
    pub monthly_price_per_seat: f64,
    /// Yearly price per seat when billed annually.  Defaults to twelve
    /// monthly payments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annual_price_per_seat: Option<f64>,
}

impl ToolPrice {
    pub fn annual_price(&self) -> f64 {
        self.annual_price_per_seat
            .unwrap_or(self.monthly_price_per_seat * crate::engine::MONTHS_PER_YEAR)
    }
}

/// A tool picked by the user, optionally with fees they actually pay
/// instead of the list price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolSelection {
    pub tool_id: String,
    #[serde(default)]
    pub is_annual_billing: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_fee_override: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annual_fee_override: Option<f64>,
}

impl ToolSelection {
    pub fn new(tool_id: impl Into<String>) -> Self {
        Self {
            tool_id: tool_id.into(),
            is_annual_billing: false,
            monthly_fee_override: None,
            annual_fee_override: None,
        }
    }
}

/// (id, display name, monthly yen per seat)
const BUILTIN_TOOLS: &[(&str, &str, f64)] = &[
    ("slack", "Slack", 850.0),
    ("zoom", "Zoom", 2000.0),
    ("google-workspace", "Google Workspace", 1360.0),
    ("microsoft-365", "Microsoft 365", 1360.0),
    ("chatwork", "Chatwork", 700.0),
    ("teams-essentials", "Microsoft Teams Essentials", 599.0),
    ("notion", "Notion", 1650.0),
    ("trello", "Trello", 750.0),
    ("asana", "Asana", 1475.0),
    ("backlog", "Backlog", 1100.0),
    ("box", "Box", 1881.0),
    ("dropbox", "Dropbox Business", 1500.0),
    ("salesforce", "Salesforce Sales Cloud", 3000.0),
    ("hubspot", "HubSpot Sales Hub", 2400.0),
    ("kintone", "kintone", 1000.0),
    ("cybozu-office", "Cybozu Office", 500.0),
];

/// An in-memory price list keyed by tool id.
#[derive(Debug, Clone, Default)]
pub struct ToolCatalog {
    tools: HashMap<String, ToolPrice>,
}

impl ToolCatalog {
    pub fn empty() -> Self {
        Self::default()
    }

    /// The catalog shipped with the engine.
    pub fn builtin() -> Self {
        let mut catalog = Self::empty();
        for &(id, name, monthly) in BUILTIN_TOOLS {
            catalog.insert(ToolPrice {
                tool_id: id.to_string(),
                display_name: name.to_string(),
                monthly_price_per_seat: monthly,
                annual_price_per_seat: None,
            });
        }
        catalog
    }

    /// Add or replace an entry.  Returns the replaced entry if any.
    pub fn insert(&mut self, price: ToolPrice) -> Option<ToolPrice> {
        self.tools.insert(price.tool_id.clone(), price)
    }

    pub fn get(&self, tool_id: &str) -> Option<&ToolPrice> {
        self.tools.get(tool_id)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// All entries sorted by tool id.
    pub fn entries(&self) -> Vec<&ToolPrice> {
        let mut entries: Vec<&ToolPrice> = self.tools.values().collect();
        entries.sort_by(|a, b| a.tool_id.cmp(&b.tool_id));
        entries
    }

    /// Turn a user's pick into a subscription with concrete fees.
    ///
    /// Overrides win over list prices.  A tool missing from the catalog
    /// is accepted only if the fee for its billing cycle is overridden;
    /// otherwise resolution fails rather than pricing it at zero.
    pub fn resolve(&self, selection: &ToolSelection) -> Result<ToolSubscription> {
        let listed = self.get(&selection.tool_id);
        let active_override = if selection.is_annual_billing {
            selection.annual_fee_override
        } else {
            selection.monthly_fee_override
        };
        if listed.is_none() && active_override.is_none() {
            return Err(EngineError::UnknownTool(selection.tool_id.clone()));
        }

        let monthly = selection
            .monthly_fee_override
            .or_else(|| listed.map(|p| p.monthly_price_per_seat))
            .or_else(|| selection.annual_fee_override.map(|a| a / crate::engine::MONTHS_PER_YEAR))
            .unwrap_or(0.0);
        let annual = selection
            .annual_fee_override
            .or_else(|| listed.map(ToolPrice::annual_price))
            .unwrap_or(monthly * crate::engine::MONTHS_PER_YEAR);

        Ok(ToolSubscription {
            tool_id: selection.tool_id.clone(),
            monthly_fee_per_seat: monthly,
            annual_fee_per_seat: annual,
            is_annual_billing: selection.is_annual_billing,
        })
    }

    /// Resolve every selection, failing on the first unknown tool.
    pub fn resolve_all(&self, selections: &[ToolSelection]) -> Result<Vec<ToolSubscription>> {
        selections.iter().map(|s| self.resolve(s)).collect()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogFile {
    Many(Vec<ToolPrice>),
    One(ToolPrice),
}

/// Load catalog entries from a directory.
///
/// Every `.json` file is parsed as either a single [`ToolPrice`] or an
/// array of them.  Files that fail to parse are skipped with a warning.
/// A missing directory yields no entries.
pub fn load_prices_from_dir(path: &Path) -> Result<Vec<ToolPrice>> {
    let mut prices = Vec::new();
    if path.is_dir() {
        for entry in std::fs::read_dir(path)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let file = entry.path();
            if file.extension().map_or(true, |ext| ext != "json") {
                continue;
            }
            let data = std::fs::read_to_string(&file)?;
            match serde_json::from_str::<CatalogFile>(&data) {
                Ok(CatalogFile::Many(many)) => prices.extend(many),
                Ok(CatalogFile::One(one)) => prices.push(one),
                Err(err) => warn!(path = %file.display(), error = %err, "skipping unreadable catalog file"),
            }
        }
    }
    Ok(prices)
}

/// The built-in catalog with entries from `dir` layered on top.
pub fn load_catalog(dir: &Path) -> Result<ToolCatalog> {
    let mut catalog = ToolCatalog::builtin();
    let extra = load_prices_from_dir(dir)?;
    let extra_count = extra.len();
    for price in extra {
        catalog.insert(price);
    }
    info!(dir = %dir.display(), extra = extra_count, total = catalog.len(), "tool catalog loaded");
    Ok(catalog)
}
