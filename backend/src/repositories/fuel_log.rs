use sqlx::PgExecutor;

use crate::{error::AppError, models::fuel_log::FuelLog};

pub async fn insert<'e>(db: impl PgExecutor<'e>, log: &FuelLog) -> Result<(), AppError> {
    sqlx::query(
        "INSERT INTO fuel_logs (id, vehicle_id, liters, cost, log_date, created_at) \
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(log.id)
    .bind(log.vehicle_id)
    .bind(log.liters)
    .bind(log.cost)
    .bind(log.log_date)
    .bind(log.created_at)
    .execute(db)
    .await?;
    Ok(())
}
