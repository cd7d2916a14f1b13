//! REST client for the rural sanitation dashboard backend.

pub mod client;
mod complaints;
pub mod error;
mod geography;
pub mod normalize;
mod surveys;
pub mod types;
mod vehicles;

pub use client::GramdashClient;
pub use error::ApiError;
pub use normalize::vehicles_with_telemetry;
pub use types::{ComplaintAnalyticsResponse, VehicleRecord};
