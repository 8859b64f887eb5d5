use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::{
    types::{FuelLogId, VehicleId},
    utils::time::parse_form_date,
    validation::{form, rules},
};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct FuelLog {
    pub id: FuelLogId,
    pub vehicle_id: VehicleId,
    pub liters: f64,
    pub cost: f64,
    pub log_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CreateFuelLogPayload {
    #[serde(default)]
    pub vehicle_id: Option<String>,
    #[serde(default, deserialize_with = "form::number")]
    pub liters: Option<f64>,
    #[serde(default, deserialize_with = "form::number")]
    pub cost: Option<f64>,
    /// `YYYY-MM-DD`
    #[serde(default)]
    pub date: Option<String>,
}

impl CreateFuelLogPayload {
    pub fn validate(self) -> Result<FuelLog, &'static str> {
        let vehicle_id = self
            .vehicle_id
            .as_deref()
            .and_then(|raw| raw.trim().parse::<VehicleId>().ok());
        let date_raw = rules::trimmed(self.date.as_deref());
        let (Some(vehicle_id), Some(liters), Some(cost)) = (vehicle_id, self.liters, self.cost)
        else {
            return Err("All fuel log fields are required.");
        };
        if date_raw.is_empty() {
            return Err("All fuel log fields are required.");
        }
        if !rules::is_positive(liters) {
            return Err("Fuel liters must be greater than zero.");
        }
        if !rules::is_non_negative(cost) {
            return Err("Fuel cost must be zero or greater.");
        }
        let log_date = parse_form_date(&date_raw).ok_or("Invalid fuel log date.")?;

        Ok(FuelLog {
            id: FuelLogId::new(),
            vehicle_id,
            liters,
            cost,
            log_date,
            created_at: Utc::now(),
        })
    }
}
