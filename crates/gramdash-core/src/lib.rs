pub mod aggregate;
pub mod app_config;
pub mod complaints;
pub mod config;
pub mod date_range;
pub mod filter;
pub mod geo;
pub mod status;
pub mod surveys;
pub mod vehicles;

use thiserror::Error;

pub use aggregate::{aggregate_by_status, AnalyticsAggregate, StatusCount, StatusCounted};
pub use app_config::{AppConfig, Environment};
pub use complaints::{AnalyticsLevel, ComplaintAnalyticsQuery, ComplaintQuery, ComplaintRecord};
pub use config::{load_app_config, load_app_config_from_env};
pub use date_range::{resolve_date_range, DatePreset, DateRange, RangeMode, RangeSelection};
pub use filter::{filter_records, Filterable};
pub use geo::{DropdownLevel, GeoId, GeoNode, GeoPath, GeoRank, Scope};
pub use status::{normalize_status, NormalizedStatus};
pub use surveys::{AnnualSurvey, FinancialYear, SurveyAnalyticsTarget, SurveyFilters};
pub use vehicles::{NewVehicle, Vehicle, VehicleDraft, VehicleStatus};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Form input rejected before it reaches the network.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("unknown scope: {0}")]
    UnknownScope(String),

    #[error("unknown date range: {0}")]
    UnknownDatePreset(String),
}
