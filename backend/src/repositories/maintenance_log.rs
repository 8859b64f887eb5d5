use sqlx::{PgExecutor, PgPool};

use crate::{
    error::AppError,
    models::maintenance_log::{MaintenanceListItem, MaintenanceLog},
};

pub async fn insert<'e>(db: impl PgExecutor<'e>, log: &MaintenanceLog) -> Result<(), AppError> {
    sqlx::query(
        "INSERT INTO maintenance_logs (id, vehicle_id, description, cost, log_date, created_at) \
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(log.id)
    .bind(log.vehicle_id)
    .bind(&log.description)
    .bind(log.cost)
    .bind(log.log_date)
    .bind(log.created_at)
    .execute(db)
    .await?;
    Ok(())
}

pub async fn list_with_plate(db: &PgPool) -> Result<Vec<MaintenanceListItem>, AppError> {
    let rows = sqlx::query_as::<_, MaintenanceListItem>(
        "SELECT m.id, m.vehicle_id, m.description, m.cost, m.log_date, v.license_plate \
         FROM maintenance_logs m \
         JOIN vehicles v ON m.vehicle_id = v.id \
         ORDER BY m.created_at DESC",
    )
    .fetch_all(db)
    .await?;
    Ok(rows)
}
