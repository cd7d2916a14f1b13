//! Fleet vehicles: mocked telemetry, fleet-tab filtering and the add-vehicle
//! draft.
//!
//! The backend only knows a vehicle's number, IMEI and GP. Until real GPS
//! devices report in, status, position and speed are synthesised here.

use std::fmt;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::geo::GeoId;
use crate::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleStatus {
    Active,
    Inactive,
    Running,
    Stopped,
}

impl VehicleStatus {
    pub const ALL: [VehicleStatus; 4] = [
        VehicleStatus::Active,
        VehicleStatus::Inactive,
        VehicleStatus::Running,
        VehicleStatus::Stopped,
    ];

    /// Deterministic placeholder status: cycles through [`Self::ALL`] by id.
    #[must_use]
    pub fn mock_for(vehicle_id: i64) -> Self {
        match vehicle_id.rem_euclid(4) {
            0 => VehicleStatus::Active,
            1 => VehicleStatus::Inactive,
            2 => VehicleStatus::Running,
            _ => VehicleStatus::Stopped,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            VehicleStatus::Active => "active",
            VehicleStatus::Inactive => "inactive",
            VehicleStatus::Running => "running",
            VehicleStatus::Stopped => "stopped",
        }
    }

    fn tab_name(self) -> &'static str {
        match self {
            VehicleStatus::Active => "Active",
            VehicleStatus::Inactive => "Inactive",
            VehicleStatus::Running => "Running",
            VehicleStatus::Stopped => "Stopped",
        }
    }
}

impl fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

const BASE_POSITION: Coordinates = Coordinates {
    lat: 26.2389,
    lng: 73.0243,
};

/// Placeholder position spread around Jodhpur by vehicle id.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn mock_coordinates(vehicle_id: i64) -> Coordinates {
    let id = vehicle_id as f64;
    Coordinates {
        lat: BASE_POSITION.lat + (id * 0.01 - 0.02),
        lng: BASE_POSITION.lng + (id * 0.015 - 0.03),
    }
}

/// A fleet vehicle with its (mocked) telemetry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Vehicle {
    pub id: i64,
    pub vehicle_no: String,
    pub imei: Option<String>,
    pub gp_id: Option<GeoId>,
    pub name: String,
    pub status: VehicleStatus,
    pub speed_kmh: u32,
    pub coordinates: Coordinates,
    /// Two points for running vehicles, empty otherwise.
    pub route: Vec<Coordinates>,
    pub last_updated: DateTime<Utc>,
    pub is_flagged: bool,
}

impl Vehicle {
    /// Attaches placeholder telemetry to a vehicle known to the backend.
    pub fn with_mock_telemetry<R: Rng>(
        id: i64,
        vehicle_no: String,
        imei: Option<String>,
        gp_id: Option<GeoId>,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Self {
        let status = VehicleStatus::mock_for(id);
        let coordinates = mock_coordinates(id);
        let route = if status == VehicleStatus::Running {
            vec![
                coordinates,
                Coordinates {
                    lat: coordinates.lat + 0.005,
                    lng: coordinates.lng + 0.005,
                },
            ]
        } else {
            Vec::new()
        };
        Self {
            id,
            name: format!("Vehicle {vehicle_no}"),
            vehicle_no,
            imei,
            gp_id,
            status,
            speed_kmh: rng.random_range(0..60),
            coordinates,
            route,
            last_updated: now,
            is_flagged: false,
        }
    }
}

/// Vehicles shown under a fleet tab such as `All(03)` or `Running(01)`.
///
/// The `(NN)` count suffix is ignored; unknown tab names match nothing.
#[must_use]
pub fn filter_by_fleet_tab<'a>(vehicles: &'a [Vehicle], tab: &str) -> Vec<&'a Vehicle> {
    let name = tab
        .split('(')
        .next()
        .unwrap_or_default()
        .trim()
        .to_lowercase();
    if name == "all" {
        return vehicles.iter().collect();
    }
    vehicles
        .iter()
        .filter(|v| v.status.as_str() == name)
        .collect()
}

/// Case-insensitive search over vehicle number and display name. A blank
/// query returns every vehicle.
#[must_use]
pub fn search_vehicles<'a>(vehicles: &'a [Vehicle], query: &str) -> Vec<&'a Vehicle> {
    let needle = query.trim().to_lowercase();
    vehicles
        .iter()
        .filter(|v| {
            needle.is_empty()
                || v.vehicle_no.to_lowercase().contains(&needle)
                || v.name.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Per-status counts for the fleet tab labels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FleetCounts {
    pub all: usize,
    pub active: usize,
    pub inactive: usize,
    pub running: usize,
    pub stopped: usize,
}

impl FleetCounts {
    #[must_use]
    pub fn from_vehicles(vehicles: &[Vehicle]) -> Self {
        let mut counts = Self {
            all: vehicles.len(),
            ..Self::default()
        };
        for v in vehicles {
            match v.status {
                VehicleStatus::Active => counts.active += 1,
                VehicleStatus::Inactive => counts.inactive += 1,
                VehicleStatus::Running => counts.running += 1,
                VehicleStatus::Stopped => counts.stopped += 1,
            }
        }
        counts
    }

    #[must_use]
    pub fn count(&self, status: VehicleStatus) -> usize {
        match status {
            VehicleStatus::Active => self.active,
            VehicleStatus::Inactive => self.inactive,
            VehicleStatus::Running => self.running,
            VehicleStatus::Stopped => self.stopped,
        }
    }

    /// `["All(03)", "Active(01)", ...]`.
    #[must_use]
    pub fn tab_labels(&self) -> Vec<String> {
        std::iter::once(format!("All({:02})", self.all))
            .chain(
                VehicleStatus::ALL
                    .iter()
                    .map(|s| format!("{}({:02})", s.tab_name(), self.count(*s))),
            )
            .collect()
    }
}

/// Body of `POST /vehicles`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewVehicle {
    pub imei: String,
    pub vehicle_no: String,
    pub district_id: Option<GeoId>,
    pub block_id: Option<GeoId>,
    pub gp_id: GeoId,
}

/// The two-step add-vehicle form: vehicle details first, then location.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VehicleDraft {
    pub imei_number: String,
    pub vehicle_number: String,
    pub district_id: Option<GeoId>,
    pub block_id: Option<GeoId>,
    pub gp_id: Option<GeoId>,
}

impl VehicleDraft {
    /// Step one: vehicle number and IMEI must be filled in.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingField`] naming the first blank field.
    pub fn validate_details(&self) -> Result<(), ValidationError> {
        if self.vehicle_number.trim().is_empty() {
            return Err(ValidationError::MissingField("vehicle number"));
        }
        if self.imei_number.trim().is_empty() {
            return Err(ValidationError::MissingField("IMEI number"));
        }
        Ok(())
    }

    /// Step two: a gram panchayat must be chosen.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingField`] when no GP is set.
    pub fn validate_location(&self) -> Result<GeoId, ValidationError> {
        self.gp_id
            .ok_or(ValidationError::MissingField("gram panchayat"))
    }

    /// Validates both steps and builds the request body.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] from either step.
    pub fn into_payload(self) -> Result<NewVehicle, ValidationError> {
        self.validate_details()?;
        let gp_id = self.validate_location()?;
        Ok(NewVehicle {
            imei: self.imei_number.trim().to_string(),
            vehicle_no: self.vehicle_number.trim().to_string(),
            district_id: self.district_id,
            block_id: self.block_id,
            gp_id,
        })
    }
}
