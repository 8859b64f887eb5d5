use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;
use utoipa::ToSchema;

use crate::{
    types::DriverId,
    utils::time::parse_form_date,
    validation::{form, rules},
};

pub const DEFAULT_SAFETY_SCORE: i32 = 75;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Driver {
    pub id: DriverId,
    pub name: String,
    pub license_number: String,
    pub license_expiry_date: NaiveDate,
    pub status: DriverStatus,
    pub safety_score: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "TEXT", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DriverStatus {
    Available,
    OnTrip,
    Suspended,
}

impl DriverStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DriverStatus::Available => "available",
            DriverStatus::OnTrip => "on_trip",
            DriverStatus::Suspended => "suspended",
        }
    }
}

impl FromStr for DriverStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match rules::normalize_enum_token(s).as_str() {
            "available" => Ok(DriverStatus::Available),
            "on_trip" => Ok(DriverStatus::OnTrip),
            "suspended" => Ok(DriverStatus::Suspended),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct DriverPayload {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub license_number: Option<String>,
    /// `YYYY-MM-DD`
    #[serde(default)]
    pub license_expiry_date: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DriverInput {
    pub name: String,
    pub license_number: String,
    pub license_expiry_date: NaiveDate,
    pub status: DriverStatus,
}

impl DriverPayload {
    pub fn validate(self) -> Result<DriverInput, &'static str> {
        let name = rules::trimmed(self.name.as_deref());
        let license_number = rules::trimmed(self.license_number.as_deref()).to_uppercase();
        let expiry_raw = rules::trimmed(self.license_expiry_date.as_deref());
        if name.is_empty() || license_number.is_empty() || expiry_raw.is_empty() {
            return Err("All driver fields are required.");
        }
        let status = match self.status.as_deref().map(str::trim) {
            None | Some("") => DriverStatus::Available,
            Some(raw) => raw.parse().map_err(|_| "Invalid driver status.")?,
        };
        let license_expiry_date =
            parse_form_date(&expiry_raw).ok_or("Invalid license expiry date.")?;

        Ok(DriverInput {
            name,
            license_number,
            license_expiry_date,
            status,
        })
    }
}

impl Driver {
    pub fn from_input(input: DriverInput) -> Self {
        let now = Utc::now();
        Self {
            id: DriverId::new(),
            name: input.name,
            license_number: input.license_number,
            license_expiry_date: input.license_expiry_date,
            status: input.status,
            safety_score: DEFAULT_SAFETY_SCORE,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, input: DriverInput) {
        self.name = input.name;
        self.license_number = input.license_number;
        self.license_expiry_date = input.license_expiry_date;
        self.status = input.status;
        self.updated_at = Utc::now();
    }
}

/// Safety officer's compliance edit.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ComplianceUpdatePayload {
    #[serde(default, deserialize_with = "form::integer")]
    pub safety_score: Option<i32>,
    #[serde(default)]
    pub status: Option<String>,
}

impl ComplianceUpdatePayload {
    pub fn validate(self) -> Result<(i32, DriverStatus), &'static str> {
        let safety_score = match self.safety_score {
            Some(score) if rules::is_safety_score(score) => score,
            _ => return Err("Safety score must be between 0 and 100."),
        };
        let status = match self.status.as_deref().map(str::parse::<DriverStatus>) {
            Some(Ok(status @ (DriverStatus::Available | DriverStatus::Suspended))) => status,
            _ => return Err("Status must be Available or Suspended."),
        };
        Ok((safety_score, status))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
/// Driver row enriched for the compliance screen.
pub struct DriverCompliance {
    pub id: DriverId,
    pub name: String,
    pub license_number: String,
    pub license_expiry_date: NaiveDate,
    pub status: DriverStatus,
    pub safety_score: i32,
    pub is_expired: bool,
    pub completed_trip_count: i64,
}
