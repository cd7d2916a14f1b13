//! Annual survey (village master data) types.

use serde::{Deserialize, Serialize};

use crate::geo::{GeoId, GeoPath, Scope};

/// A financial year that annual survey data is versioned by, e.g. `2025-26`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialYear {
    pub id: i64,
    pub fy: String,
    #[serde(default)]
    pub active: bool,
}

/// Sorts financial years newest first by their label.
#[must_use]
pub fn newest_first(mut years: Vec<FinancialYear>) -> Vec<FinancialYear> {
    years.sort_by(|a, b| b.fy.cmp(&a.fy));
    years
}

/// One annual survey record. Only the keys the dashboards filter on are
/// typed; the rest of the master data rides along in `details`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnualSurvey {
    pub id: i64,
    #[serde(default)]
    pub gp_id: Option<GeoId>,
    #[serde(default)]
    pub fy_id: Option<i64>,
    #[serde(default)]
    pub gp_name: Option<String>,
    #[serde(default)]
    pub district_id: Option<GeoId>,
    #[serde(flatten)]
    pub details: serde_json::Map<String, serde_json::Value>,
}

/// The surveys for one GP report.
///
/// Keeps records whose `gp_id`/`fy_id` match (a missing id matches
/// anything). If nothing matches, the unfiltered list is returned rather
/// than an empty report.
#[must_use]
pub fn select_gp_surveys(surveys: Vec<AnnualSurvey>, gp_id: GeoId, fy_id: i64) -> Vec<AnnualSurvey> {
    let matching: Vec<AnnualSurvey> = surveys
        .iter()
        .filter(|s| s.gp_id.is_none_or(|id| id == gp_id) && s.fy_id.is_none_or(|id| id == fy_id))
        .cloned()
        .collect();
    if matching.is_empty() {
        surveys
    } else {
        matching
    }
}

/// Query parameters for `GET /annual-surveys/`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SurveyFilters {
    pub district_id: Option<GeoId>,
    pub block_id: Option<GeoId>,
    pub gp_id: Option<GeoId>,
    pub fy_id: Option<i64>,
    pub skip: u32,
    pub limit: u32,
}

impl SurveyFilters {
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("skip", self.skip.to_string()),
            ("limit", self.limit.to_string()),
        ];
        for (key, value) in [
            ("district_id", self.district_id),
            ("block_id", self.block_id),
            ("gp_id", self.gp_id),
            ("fy_id", self.fy_id),
        ] {
            if let Some(v) = value {
                pairs.push((key, v.to_string()));
            }
        }
        pairs
    }
}

/// Which analytics endpoint a survey dashboard reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurveyAnalyticsTarget {
    State,
    District(GeoId),
    Block(GeoId),
    Gp(GeoId),
}

impl SurveyAnalyticsTarget {
    /// `None` until the scope's node has been selected.
    #[must_use]
    pub fn for_selection(scope: Scope, path: &GeoPath) -> Option<Self> {
        match scope {
            Scope::State => Some(Self::State),
            Scope::District => path.district_id.map(Self::District),
            Scope::Block => path.block_id.map(Self::Block),
            Scope::Gp => path.gp_id.map(Self::Gp),
        }
    }

    /// Path below `annual-surveys/analytics/`.
    #[must_use]
    pub fn path(self) -> String {
        match self {
            Self::State => "state".to_string(),
            Self::District(id) => format!("district/{id}"),
            Self::Block(id) => format!("block/{id}"),
            Self::Gp(id) => format!("gp/{id}"),
        }
    }
}
