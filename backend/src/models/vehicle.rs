use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;
use utoipa::ToSchema;

use crate::{types::VehicleId, validation::{form, rules}};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Vehicle {
    pub id: VehicleId,
    pub model_name: String,
    pub license_plate: String,
    pub max_capacity_kg: f64,
    pub odometer: i64,
    pub status: VehicleStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "TEXT", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum VehicleStatus {
    Available,
    OnTrip,
    InShop,
}

impl VehicleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleStatus::Available => "available",
            VehicleStatus::OnTrip => "on_trip",
            VehicleStatus::InShop => "in_shop",
        }
    }
}

impl FromStr for VehicleStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match rules::normalize_enum_token(s).as_str() {
            "available" => Ok(VehicleStatus::Available),
            "on_trip" => Ok(VehicleStatus::OnTrip),
            "in_shop" => Ok(VehicleStatus::InShop),
            _ => Err(()),
        }
    }
}

/// Create/update form for a vehicle. Every field is optional on the wire so
/// that missing values surface as form errors rather than decode failures.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct VehiclePayload {
    #[serde(default)]
    pub model_name: Option<String>,
    #[serde(default)]
    pub license_plate: Option<String>,
    #[serde(default, deserialize_with = "form::number")]
    pub max_capacity_kg: Option<f64>,
    #[serde(default, deserialize_with = "form::integer")]
    pub odometer: Option<i64>,
    #[serde(default)]
    pub status: Option<String>,
}

/// A vehicle form that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleInput {
    pub model_name: String,
    pub license_plate: String,
    pub max_capacity_kg: f64,
    pub odometer: i64,
    pub status: VehicleStatus,
}

impl VehiclePayload {
    pub fn validate(self) -> Result<VehicleInput, &'static str> {
        let model_name = rules::trimmed(self.model_name.as_deref());
        let license_plate = rules::trimmed(self.license_plate.as_deref()).to_uppercase();
        if model_name.is_empty() || license_plate.is_empty() {
            return Err("Model name and license plate are required.");
        }
        let max_capacity_kg = match self.max_capacity_kg {
            Some(value) if rules::is_positive(value) => value,
            _ => return Err("Max capacity must be a positive number."),
        };
        let odometer = match self.odometer {
            Some(value) if value >= 0 => value,
            _ => return Err("Odometer must be zero or greater."),
        };
        let status = match self.status.as_deref().map(str::trim) {
            None | Some("") => VehicleStatus::Available,
            Some(raw) => raw.parse().map_err(|_| "Invalid vehicle status.")?,
        };

        Ok(VehicleInput {
            model_name,
            license_plate,
            max_capacity_kg,
            odometer,
            status,
        })
    }
}

impl Vehicle {
    pub fn from_input(input: VehicleInput) -> Self {
        let now = Utc::now();
        Self {
            id: VehicleId::new(),
            model_name: input.model_name,
            license_plate: input.license_plate,
            max_capacity_kg: input.max_capacity_kg,
            odometer: input.odometer,
            status: input.status,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, input: VehicleInput) {
        self.model_name = input.model_name;
        self.license_plate = input.license_plate;
        self.max_capacity_kg = input.max_capacity_kg;
        self.odometer = input.odometer;
        self.status = input.status;
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
/// Minimal vehicle row for pickers.
pub struct VehicleOption {
    pub id: VehicleId,
    pub license_plate: String,
}
