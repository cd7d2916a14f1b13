//! Complaint view rows and the query shapes the complaints dashboard sends.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::aggregate::StatusCounted;
use crate::date_range::DateRange;
use crate::filter::Filterable;
use crate::geo::{GeoPath, Scope};
use crate::status::NormalizedStatus;

/// A complaint as rendered in the complaints table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComplaintRecord {
    pub id: i64,
    /// `COMP-<id>`, the id users search for.
    pub display_id: String,
    pub title: String,
    pub description: String,
    pub raw_status: String,
    #[serde(serialize_with = "serialize_status")]
    pub status: NormalizedStatus,
    pub location: String,
    pub submitted_by: String,
    pub assigned_to: String,
    pub village: Option<String>,
    pub block: Option<String>,
    pub district: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub lat: Option<f64>,
    pub long: Option<f64>,
    pub media_urls: Vec<String>,
}

fn serialize_status<S: serde::Serializer>(
    status: &NormalizedStatus,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(status.as_str())
}

impl ComplaintRecord {
    #[must_use]
    pub fn status_color(&self) -> &'static str {
        self.status.color()
    }

    /// `12 Mar 2025`, or `N/A` when the backend sent no timestamp.
    #[must_use]
    pub fn submitted_date(&self) -> String {
        self.created_at
            .map_or_else(|| "N/A".to_string(), |ts| ts.format("%-d %b %Y").to_string())
    }
}

impl Filterable for ComplaintRecord {
    fn normalized_status(&self) -> NormalizedStatus {
        self.status.clone()
    }

    fn search_fields(&self) -> [&str; 3] {
        [&self.title, &self.description, &self.display_id]
    }
}

impl StatusCounted for ComplaintRecord {
    fn raw_status(&self) -> &str {
        &self.raw_status
    }

    fn count(&self) -> u64 {
        1
    }
}

/// Newest first; rows without a timestamp sink to the bottom.
pub fn sort_newest_first(records: &mut [ComplaintRecord]) {
    records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

/// Filters for `GET /complaints`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplaintQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub district_id: Option<i64>,
    pub block_id: Option<i64>,
    pub gp_id: Option<i64>,
    pub limit: u32,
    pub order_by: String,
}

impl ComplaintQuery {
    /// Builds the list query for the active scope: dates from `range`, and
    /// only the geography id that matches `scope`.
    #[must_use]
    pub fn for_selection(scope: Scope, path: &GeoPath, range: &DateRange, limit: u32) -> Self {
        let mut query = Self {
            start_date: range.start(),
            end_date: range.end(),
            district_id: None,
            block_id: None,
            gp_id: None,
            limit,
            order_by: "newest".to_string(),
        };
        match path.scope_param(scope) {
            Some(("district_id", id)) => query.district_id = Some(id),
            Some(("block_id", id)) => query.block_id = Some(id),
            Some(("gp_id", id)) => query.gp_id = Some(id),
            _ => {}
        }
        query
    }

    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("limit", self.limit.to_string()),
            ("order_by", self.order_by.clone()),
        ];
        push_dates(&mut pairs, self.start_date, self.end_date);
        push_opt(&mut pairs, "district_id", self.district_id);
        push_opt(&mut pairs, "block_id", self.block_id);
        push_opt(&mut pairs, "gp_id", self.gp_id);
        pairs
    }
}

/// Geography level the analytics endpoint breaks counts down by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalyticsLevel {
    District,
    Block,
    Village,
}

impl AnalyticsLevel {
    /// One level below the scope: the state is broken down by district, a
    /// district by block, and blocks or GPs by village.
    #[must_use]
    pub fn for_scope(scope: Scope) -> Self {
        match scope {
            Scope::State => AnalyticsLevel::District,
            Scope::District => AnalyticsLevel::Block,
            Scope::Block | Scope::Gp => AnalyticsLevel::Village,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            AnalyticsLevel::District => "DISTRICT",
            AnalyticsLevel::Block => "BLOCK",
            AnalyticsLevel::Village => "VILLAGE",
        }
    }
}

/// Filters for `GET /complaints/analytics/geo`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplaintAnalyticsQuery {
    pub level: AnalyticsLevel,
    pub geo: Option<(&'static str, i64)>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl ComplaintAnalyticsQuery {
    #[must_use]
    pub fn for_selection(scope: Scope, path: &GeoPath, range: &DateRange) -> Self {
        Self {
            level: AnalyticsLevel::for_scope(scope),
            geo: path.scope_param(scope),
            start_date: range.start(),
            end_date: range.end(),
        }
    }

    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("level", self.level.as_str().to_string())];
        if let Some((param, id)) = self.geo {
            pairs.push((param, id.to_string()));
        }
        push_dates(&mut pairs, self.start_date, self.end_date);
        pairs
    }
}

fn push_dates(
    pairs: &mut Vec<(&'static str, String)>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) {
    if let Some(start) = start {
        pairs.push(("start_date", start.format("%Y-%m-%d").to_string()));
    }
    if let Some(end) = end {
        pairs.push(("end_date", end.format("%Y-%m-%d").to_string()));
    }
}

fn push_opt(pairs: &mut Vec<(&'static str, String)>, key: &'static str, value: Option<i64>) {
    if let Some(v) = value {
        pairs.push((key, v.to_string()));
    }
}
