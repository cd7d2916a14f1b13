//! Dashboard backend response types.
//!
//! These mirror the JSON the backend sends, with every optional field
//! defaulted. Conversion into the display types in `gramdash_core` happens
//! in [`crate::normalize`].

use serde::{Deserialize, Deserializer};

use gramdash_core::{GeoId, StatusCount};

/// A list response. Most endpoints return a bare JSON array; a few wrap it
/// as `{"data": [...]}` (or `items`/`results`).
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListEnvelope<T> {
    Bare(Vec<T>),
    Wrapped(WrappedList<T>),
}

#[derive(Debug, Deserialize)]
pub struct WrappedList<T> {
    #[serde(alias = "items", alias = "results")]
    pub data: Vec<T>,
}

impl<T> ListEnvelope<T> {
    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        match self {
            ListEnvelope::Bare(items) | ListEnvelope::Wrapped(WrappedList { data: items }) => items,
        }
    }
}

// ---------------------------------------------------------------------------
// geography
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct DistrictWire {
    pub id: GeoId,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BlockWire {
    pub id: GeoId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub district_id: Option<GeoId>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GramPanchayatWire {
    pub id: GeoId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub block_id: Option<GeoId>,
    #[serde(default)]
    pub district_id: Option<GeoId>,
}

// ---------------------------------------------------------------------------
// complaints
// ---------------------------------------------------------------------------

/// One row of `GET /complaints`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ComplaintWire {
    pub id: i64,
    #[serde(default)]
    pub complaint_type: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub village_name: Option<String>,
    #[serde(default)]
    pub block_name: Option<String>,
    #[serde(default)]
    pub district_name: Option<String>,
    #[serde(default)]
    pub mobile_number: Option<String>,
    #[serde(default)]
    pub assigned_worker: Option<String>,
    /// ISO-8601, with or without an offset.
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub lat: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub long: Option<f64>,
    #[serde(default)]
    pub media_urls: Option<Vec<String>>,
    #[serde(default)]
    pub comments: Option<Vec<serde_json::Value>>,
}

/// `GET /complaints/analytics/geo`: per-status counts for the scope.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ComplaintAnalyticsResponse {
    #[serde(default)]
    pub geo_type: Option<String>,
    #[serde(default)]
    pub response: Vec<StatusCount>,
}

// ---------------------------------------------------------------------------
// vehicles
// ---------------------------------------------------------------------------

/// `[{vehicle_no, imei, id, gp_id}]` from `GET /vehicles`.
#[derive(Debug, Clone, Deserialize)]
pub struct VehicleRecord {
    pub id: i64,
    #[serde(default)]
    pub vehicle_no: String,
    #[serde(default)]
    pub imei: Option<String>,
    #[serde(default)]
    pub gp_id: Option<GeoId>,
}

// ---------------------------------------------------------------------------
// annual surveys
// ---------------------------------------------------------------------------

/// A financial year row as sent; incomplete rows are dropped on the way in.
#[derive(Debug, Clone, Deserialize)]
pub struct FinancialYearWire {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub fy: Option<String>,
    #[serde(default)]
    pub active: Option<bool>,
}

/// Accepts a JSON number, a numeric string, or null/absent.
fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}
