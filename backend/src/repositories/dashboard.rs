//! Aggregate queries behind the role dashboards.
//!
//! Sums come back as `float8` and are rounded in Rust; "today" is passed in
//! from the configured time zone rather than taken from the database clock.

use chrono::NaiveDate;
use sqlx::PgPool;

use crate::{
    error::AppError,
    models::dashboard::{
        round2, CompletedTrip, RecentMaintenance, RecentTrip, SafetyDashboard, VehicleCostTotals,
    },
};

const RECENT_TRIP_LIMIT: i64 = 8;
const FINANCIAL_LIST_LIMIT: i64 = 10;

pub async fn count_vehicles_with_status(db: &PgPool, status: &str) -> Result<i64, AppError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM vehicles WHERE status = $1")
        .bind(status)
        .fetch_one(db)
        .await?;
    Ok(count)
}

pub async fn count_trips_with_status(db: &PgPool, status: &str) -> Result<i64, AppError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM trips WHERE status = $1")
        .bind(status)
        .fetch_one(db)
        .await?;
    Ok(count)
}

pub async fn count_expired_licenses(db: &PgPool, today: NaiveDate) -> Result<i64, AppError> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM drivers WHERE license_expiry_date < $1",
    )
    .bind(today)
    .fetch_one(db)
    .await?;
    Ok(count)
}

pub async fn average_safety_score(db: &PgPool) -> Result<f64, AppError> {
    let avg = sqlx::query_scalar::<_, f64>(
        "SELECT COALESCE(AVG(safety_score), 0)::float8 FROM drivers",
    )
    .fetch_one(db)
    .await?;
    Ok(round2(avg))
}

pub async fn total_fuel_cost(db: &PgPool) -> Result<f64, AppError> {
    let sum = sqlx::query_scalar::<_, f64>("SELECT COALESCE(SUM(cost), 0)::float8 FROM fuel_logs")
        .fetch_one(db)
        .await?;
    Ok(sum)
}

pub async fn total_maintenance_cost(db: &PgPool) -> Result<f64, AppError> {
    let sum = sqlx::query_scalar::<_, f64>(
        "SELECT COALESCE(SUM(cost), 0)::float8 FROM maintenance_logs",
    )
    .fetch_one(db)
    .await?;
    Ok(sum)
}

pub async fn recent_trips(db: &PgPool) -> Result<Vec<RecentTrip>, AppError> {
    let rows = sqlx::query_as::<_, RecentTrip>(
        "SELECT t.id, t.origin, t.destination, t.status, v.license_plate, d.name AS driver_name \
         FROM trips t \
         JOIN vehicles v ON t.vehicle_id = v.id \
         JOIN drivers d ON t.driver_id = d.id \
         ORDER BY t.created_at DESC \
         LIMIT $1",
    )
    .bind(RECENT_TRIP_LIMIT)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn safety_summary(db: &PgPool, today: NaiveDate) -> Result<SafetyDashboard, AppError> {
    let expired_licenses = count_expired_licenses(db, today).await?;
    let suspended_drivers = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM drivers WHERE status = 'suspended'",
    )
    .fetch_one(db)
    .await?;
    let avg_safety_score = average_safety_score(db).await?;
    Ok(SafetyDashboard {
        expired_licenses,
        suspended_drivers,
        avg_safety_score,
    })
}

/// Per-vehicle fuel, maintenance and completed-trip totals ordered by plate.
pub async fn vehicle_cost_totals(db: &PgPool) -> Result<Vec<VehicleCostTotals>, AppError> {
    let rows = sqlx::query_as::<_, VehicleCostTotals>(
        "SELECT v.id, v.license_plate, v.model_name, \
                COALESCE(f.total, 0)::float8 AS fuel_cost, \
                COALESCE(m.total, 0)::float8 AS maintenance_cost, \
                COALESCE(tc.completed, 0)::int8 AS completed_trips \
         FROM vehicles v \
         LEFT JOIN (SELECT vehicle_id, SUM(cost) AS total FROM fuel_logs GROUP BY vehicle_id) f \
                ON f.vehicle_id = v.id \
         LEFT JOIN (SELECT vehicle_id, SUM(cost) AS total FROM maintenance_logs GROUP BY vehicle_id) m \
                ON m.vehicle_id = v.id \
         LEFT JOIN (SELECT vehicle_id, COUNT(*) AS completed FROM trips \
                    WHERE status = 'completed' GROUP BY vehicle_id) tc \
                ON tc.vehicle_id = v.id \
         ORDER BY v.license_plate",
    )
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn recent_completed_trips(db: &PgPool) -> Result<Vec<CompletedTrip>, AppError> {
    let rows = sqlx::query_as::<_, CompletedTrip>(
        "SELECT t.id, t.origin, t.destination, t.cargo_weight, v.license_plate, d.name AS driver_name \
         FROM trips t \
         JOIN vehicles v ON v.id = t.vehicle_id \
         JOIN drivers d ON d.id = t.driver_id \
         WHERE t.status = 'completed' \
         ORDER BY t.created_at DESC \
         LIMIT $1",
    )
    .bind(FINANCIAL_LIST_LIMIT)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn recent_maintenance(db: &PgPool) -> Result<Vec<RecentMaintenance>, AppError> {
    let rows = sqlx::query_as::<_, RecentMaintenance>(
        "SELECT m.id, m.description, m.cost, m.log_date, v.license_plate \
         FROM maintenance_logs m \
         JOIN vehicles v ON v.id = m.vehicle_id \
         ORDER BY m.created_at DESC \
         LIMIT $1",
    )
    .bind(FINANCIAL_LIST_LIMIT)
    .fetch_all(db)
    .await?;
    Ok(rows)
}
