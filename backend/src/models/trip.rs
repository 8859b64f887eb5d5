use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;
use utoipa::ToSchema;

use crate::{
    models::{driver::Driver, vehicle::VehicleOption},
    types::{DriverId, TripId, VehicleId},
    validation::{form, rules},
};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Trip {
    pub id: TripId,
    pub vehicle_id: VehicleId,
    pub driver_id: DriverId,
    pub cargo_weight: f64,
    pub origin: String,
    pub destination: String,
    pub status: TripStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "TEXT", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TripStatus {
    Draft,
    Dispatched,
    Completed,
    Cancelled,
}

impl TripStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TripStatus::Draft => "draft",
            TripStatus::Dispatched => "dispatched",
            TripStatus::Completed => "completed",
            TripStatus::Cancelled => "cancelled",
        }
    }
}

impl FromStr for TripStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match rules::normalize_enum_token(s).as_str() {
            "draft" => Ok(TripStatus::Draft),
            "dispatched" => Ok(TripStatus::Dispatched),
            "completed" => Ok(TripStatus::Completed),
            "cancelled" => Ok(TripStatus::Cancelled),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CreateTripPayload {
    #[serde(default)]
    pub vehicle_id: Option<String>,
    #[serde(default)]
    pub driver_id: Option<String>,
    #[serde(default, deserialize_with = "form::number")]
    pub cargo_weight: Option<f64>,
    #[serde(default)]
    pub origin: Option<String>,
    #[serde(default)]
    pub destination: Option<String>,
    /// Defaults to `draft`.
    #[serde(default)]
    pub status: Option<String>,
}

/// A trip form whose shape is valid; assignment rules are checked separately
/// against the referenced rows.
#[derive(Debug, Clone, PartialEq)]
pub struct TripInput {
    pub vehicle_id: VehicleId,
    pub driver_id: DriverId,
    pub cargo_weight: Option<f64>,
    pub origin: String,
    pub destination: String,
    pub status: TripStatus,
}

pub const INVALID_TRIP_STATUS: &str = "Invalid trip status.";

pub fn parse_trip_status(raw: Option<&str>, default: Option<TripStatus>) -> Result<TripStatus, &'static str> {
    match (raw.map(str::trim), default) {
        (None | Some(""), Some(status)) => Ok(status),
        (None | Some(""), None) => Err(INVALID_TRIP_STATUS),
        (Some(value), _) => value.parse().map_err(|_| INVALID_TRIP_STATUS),
    }
}

impl CreateTripPayload {
    pub fn validate(self) -> Result<TripInput, &'static str> {
        let status = parse_trip_status(self.status.as_deref(), Some(TripStatus::Draft))?;
        let vehicle_id = self
            .vehicle_id
            .as_deref()
            .and_then(|raw| raw.trim().parse::<VehicleId>().ok());
        let driver_id = self
            .driver_id
            .as_deref()
            .and_then(|raw| raw.trim().parse::<DriverId>().ok());
        let origin = rules::trimmed(self.origin.as_deref());
        let destination = rules::trimmed(self.destination.as_deref());

        match (vehicle_id, driver_id) {
            (Some(vehicle_id), Some(driver_id)) if !origin.is_empty() && !destination.is_empty() => {
                Ok(TripInput {
                    vehicle_id,
                    driver_id,
                    cargo_weight: self.cargo_weight,
                    origin,
                    destination,
                    status,
                })
            }
            _ => Err("All trip fields are required."),
        }
    }
}

impl Trip {
    /// Builds a trip from a validated form. The caller must have checked the
    /// cargo weight through the assignment rules.
    pub fn from_input(input: &TripInput, cargo_weight: f64) -> Self {
        let now = Utc::now();
        Self {
            id: TripId::new(),
            vehicle_id: input.vehicle_id,
            driver_id: input.driver_id,
            cargo_weight,
            origin: input.origin.clone(),
            destination: input.destination.clone(),
            status: input.status,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateTripStatusPayload {
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
/// Trip joined with its vehicle plate and driver name.
pub struct TripListItem {
    pub id: TripId,
    pub vehicle_id: VehicleId,
    pub driver_id: DriverId,
    pub cargo_weight: f64,
    pub origin: String,
    pub destination: String,
    pub status: TripStatus,
    pub license_plate: String,
    pub driver_name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
/// Dispatcher's trip board.
pub struct TripBoardResponse {
    pub trips: Vec<TripListItem>,
    pub vehicles: Vec<VehicleOption>,
    pub drivers: Vec<Driver>,
}
