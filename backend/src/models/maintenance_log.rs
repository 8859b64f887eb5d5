use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::{
    models::vehicle::Vehicle,
    types::{MaintenanceLogId, VehicleId},
    utils::time::parse_form_date,
    validation::{form, rules},
};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct MaintenanceLog {
    pub id: MaintenanceLogId,
    pub vehicle_id: VehicleId,
    pub description: String,
    pub cost: f64,
    pub log_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CreateMaintenancePayload {
    #[serde(default)]
    pub vehicle_id: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "form::number")]
    pub cost: Option<f64>,
    /// `YYYY-MM-DD`
    #[serde(default)]
    pub date: Option<String>,
}

impl CreateMaintenancePayload {
    pub fn validate(self) -> Result<MaintenanceLog, &'static str> {
        let vehicle_id = self
            .vehicle_id
            .as_deref()
            .and_then(|raw| raw.trim().parse::<VehicleId>().ok());
        let description = rules::trimmed(self.description.as_deref());
        let date_raw = rules::trimmed(self.date.as_deref());
        let Some(vehicle_id) = vehicle_id.filter(|_| !description.is_empty() && !date_raw.is_empty())
        else {
            return Err("All maintenance fields are required.");
        };
        let cost = match self.cost {
            Some(cost) if rules::is_non_negative(cost) => cost,
            _ => return Err("Cost must be zero or greater."),
        };
        let log_date = parse_form_date(&date_raw).ok_or("Invalid maintenance date.")?;

        Ok(MaintenanceLog {
            id: MaintenanceLogId::new(),
            vehicle_id,
            description,
            cost,
            log_date,
            created_at: Utc::now(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct MaintenanceListItem {
    pub id: MaintenanceLogId,
    pub vehicle_id: VehicleId,
    pub description: String,
    pub cost: f64,
    pub log_date: NaiveDate,
    pub license_plate: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MaintenanceBoardResponse {
    pub logs: Vec<MaintenanceListItem>,
    pub vehicles: Vec<Vehicle>,
}
