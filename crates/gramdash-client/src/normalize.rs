//! Conversion of backend rows into the display types the dashboards use.

use chrono::{DateTime, NaiveDateTime, Utc};
use rand::Rng;

use gramdash_core::status::normalize_status;
use gramdash_core::surveys::newest_first;
use gramdash_core::{ComplaintRecord, FinancialYear, GeoId, GeoNode, Vehicle};

use crate::types::{
    BlockWire, ComplaintWire, DistrictWire, FinancialYearWire, GramPanchayatWire, VehicleRecord,
};

#[must_use]
pub fn district_node(wire: DistrictWire) -> GeoNode {
    GeoNode::district(wire.id, wire.name)
}

/// Blocks without a `district_id` are attributed to the district they were
/// requested for.
#[must_use]
pub fn block_node(wire: BlockWire, requested_district: GeoId) -> GeoNode {
    GeoNode::block(
        wire.id,
        wire.name,
        wire.district_id.unwrap_or(requested_district),
    )
}

#[must_use]
pub fn gram_panchayat_node(wire: GramPanchayatWire, requested_block: GeoId) -> GeoNode {
    GeoNode::gram_panchayat(wire.id, wire.name, wire.block_id.unwrap_or(requested_block))
}

/// Parses `created_at` as RFC 3339, falling back to an offset-less
/// timestamp taken as UTC.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Converts a complaint row into a table record, filling the placeholders
/// the complaints table shows for missing fields.
#[must_use]
pub fn complaint_record(wire: ComplaintWire) -> ComplaintRecord {
    let raw_status = non_blank(wire.status).unwrap_or_else(|| "OPEN".to_string());
    let village = non_blank(wire.village_name);
    let block = non_blank(wire.block_name);
    let location = non_blank(wire.location).unwrap_or_else(|| {
        format!(
            "{}, {}",
            village.as_deref().unwrap_or("N/A"),
            block.as_deref().unwrap_or("N/A")
        )
    });

    ComplaintRecord {
        id: wire.id,
        display_id: format!("COMP-{}", wire.id),
        title: non_blank(wire.complaint_type).unwrap_or_else(|| "N/A".to_string()),
        description: non_blank(wire.description).unwrap_or_else(|| "No description".to_string()),
        status: normalize_status(&raw_status),
        raw_status,
        location,
        submitted_by: non_blank(wire.mobile_number).unwrap_or_else(|| "N/A".to_string()),
        assigned_to: non_blank(wire.assigned_worker).unwrap_or_else(|| "Unassigned".to_string()),
        village,
        block,
        district: non_blank(wire.district_name),
        created_at: wire.created_at.as_deref().and_then(parse_timestamp),
        lat: wire.lat,
        long: wire.long,
        media_urls: wire.media_urls.unwrap_or_default(),
    }
}

/// Attaches placeholder telemetry to each backend vehicle.
pub fn vehicles_with_telemetry<R: Rng>(
    records: Vec<VehicleRecord>,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Vec<Vehicle> {
    records
        .into_iter()
        .map(|r| Vehicle::with_mock_telemetry(r.id, r.vehicle_no, r.imei, r.gp_id, now, rng))
        .collect()
}

/// Keeps rows carrying both an id and a label, newest first. A missing
/// `active` flag counts as active since the endpoint only lists active years.
#[must_use]
pub fn financial_years(rows: Vec<FinancialYearWire>) -> Vec<FinancialYear> {
    let years = rows
        .into_iter()
        .filter_map(|row| {
            let fy = row.fy.filter(|fy| !fy.trim().is_empty())?;
            Some(FinancialYear {
                id: row.id?,
                fy,
                active: row.active.unwrap_or(true),
            })
        })
        .collect();
    newest_first(years)
}
