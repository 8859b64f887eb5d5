//! Read models for the per-role dashboards.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::{
    models::{trip::TripStatus, user::RoleHolder, vehicle::VehicleOption},
    types::{MaintenanceLogId, TripId, VehicleId},
};

/// Rounds a currency or score value to two decimals.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct RecentTrip {
    pub id: TripId,
    pub origin: String,
    pub destination: String,
    pub status: TripStatus,
    pub license_plate: String,
    pub driver_name: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ManagerDashboard {
    pub active_fleet: i64,
    pub in_maintenance: i64,
    pub available_vehicles: i64,
    pub pending_trips: i64,
    pub expired_licenses: i64,
    pub avg_safety_score: f64,
    pub total_operational_cost: f64,
    pub recent_trips: Vec<RecentTrip>,
    pub pending_role_requests: Vec<RoleHolder>,
    pub approved_role_users: Vec<RoleHolder>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SafetyDashboard {
    pub expired_licenses: i64,
    pub suspended_drivers: i64,
    pub avg_safety_score: f64,
}

/// Raw per-vehicle sums as read from the database.
#[derive(Debug, Clone, FromRow)]
pub struct VehicleCostTotals {
    pub id: VehicleId,
    pub license_plate: String,
    pub model_name: String,
    pub fuel_cost: f64,
    pub maintenance_cost: f64,
    pub completed_trips: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct VehicleCostRow {
    pub id: VehicleId,
    pub license_plate: String,
    pub model_name: String,
    pub total_fuel_cost: f64,
    pub total_maintenance_cost: f64,
    pub total_operational_cost: f64,
    pub completed_trips: i64,
    /// `None` until the vehicle has completed a trip.
    pub cost_per_trip: Option<f64>,
}

impl From<VehicleCostTotals> for VehicleCostRow {
    fn from(totals: VehicleCostTotals) -> Self {
        let operational = totals.fuel_cost + totals.maintenance_cost;
        let cost_per_trip =
            (totals.completed_trips > 0).then(|| round2(operational / totals.completed_trips as f64));
        Self {
            id: totals.id,
            license_plate: totals.license_plate,
            model_name: totals.model_name,
            total_fuel_cost: round2(totals.fuel_cost),
            total_maintenance_cost: round2(totals.maintenance_cost),
            total_operational_cost: round2(operational),
            completed_trips: totals.completed_trips,
            cost_per_trip,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CompletedTrip {
    pub id: TripId,
    pub origin: String,
    pub destination: String,
    pub cargo_weight: f64,
    pub license_plate: String,
    pub driver_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct RecentMaintenance {
    pub id: MaintenanceLogId,
    pub description: String,
    pub cost: f64,
    pub log_date: NaiveDate,
    pub license_plate: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FinancialDashboard {
    pub total_fuel_cost: f64,
    pub total_maintenance_cost: f64,
    pub total_operational_cost: f64,
    pub completed_trip_count: i64,
    pub cost_rows: Vec<VehicleCostRow>,
    pub completed_trips: Vec<CompletedTrip>,
    pub maintenance_recent: Vec<RecentMaintenance>,
    pub vehicles: Vec<VehicleOption>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn totals(fuel: f64, maintenance: f64, completed: i64) -> VehicleCostTotals {
        VehicleCostTotals {
            id: VehicleId::new(),
            license_plate: "TRK-1".into(),
            model_name: "Tata Prima".into(),
            fuel_cost: fuel,
            maintenance_cost: maintenance,
            completed_trips: completed,
        }
    }

    #[test]
    fn round2_rounds_half_away_from_zero() {
        assert_eq!(round2(10.005_1), 10.01);
        assert_eq!(round2(3.333_3), 3.33);
        assert_eq!(round2(0.0), 0.0);
    }

    #[test]
    fn cost_per_trip_is_none_without_completed_trips() {
        let row = VehicleCostRow::from(totals(120.0, 80.0, 0));
        assert_eq!(row.total_operational_cost, 200.0);
        assert_eq!(row.cost_per_trip, None);
    }

    #[test]
    fn cost_per_trip_divides_operational_cost() {
        let row = VehicleCostRow::from(totals(100.0, 0.0, 3));
        assert_eq!(row.cost_per_trip, Some(33.33));
    }
}
