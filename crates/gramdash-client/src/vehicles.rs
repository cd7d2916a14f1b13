//! `vehicles` endpoints.

use gramdash_core::{GeoPath, NewVehicle};

use crate::client::GramdashClient;
use crate::error::ApiError;
use crate::types::{ListEnvelope, VehicleRecord};

impl GramdashClient {
    /// Lists the vehicles registered under `path`.
    ///
    /// An empty path yields an empty list without calling the backend.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport, status or decode failure.
    pub async fn list_vehicles(&self, path: &GeoPath) -> Result<Vec<VehicleRecord>, ApiError> {
        if path.is_empty() {
            return Ok(Vec::new());
        }
        let mut params = Vec::new();
        for (key, value) in [
            ("district_id", path.district_id),
            ("block_id", path.block_id),
            ("gp_id", path.gp_id),
        ] {
            if let Some(id) = value {
                params.push((key, id.to_string()));
            }
        }
        let url = self.build_url("vehicles", &params)?;
        let rows: ListEnvelope<VehicleRecord> = self.get_json(url, "vehicles").await?;
        Ok(rows.into_vec())
    }

    /// Monthly detail for one vehicle. The payload is passed through as-is.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport, status or decode failure.
    pub async fn get_vehicle_details(
        &self,
        vehicle_id: i64,
        month: u32,
        year: i32,
    ) -> Result<serde_json::Value, ApiError> {
        let url = self.build_url(
            &format!("vehicles/{vehicle_id}"),
            &[("month", month.to_string()), ("year", year.to_string())],
        )?;
        self.get_json(url, "vehicle details").await
    }

    /// Registers a vehicle and returns the backend's response body.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport, status or decode failure.
    pub async fn add_vehicle(&self, vehicle: &NewVehicle) -> Result<serde_json::Value, ApiError> {
        let url = self.build_url("vehicles", &[])?;
        let created = self.post_json(url, vehicle, "add vehicle").await?;
        tracing::info!(vehicle_no = %vehicle.vehicle_no, gp_id = vehicle.gp_id, "vehicle added");
        Ok(created)
    }

    /// # Errors
    ///
    /// Returns [`ApiError`] on transport or status failure.
    pub async fn delete_vehicle(&self, vehicle_id: i64) -> Result<(), ApiError> {
        let url = self.build_url(&format!("vehicles/{vehicle_id}"), &[])?;
        self.delete(url).await?;
        tracing::info!(vehicle_id, "vehicle deleted");
        Ok(())
    }
}
