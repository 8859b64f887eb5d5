//! Trip persistence. Writes take an executor so the trip row and the
//! availability flags it implies share one transaction.

use sqlx::{PgExecutor, PgPool};

use crate::{
    error::AppError,
    models::trip::{Trip, TripListItem, TripStatus},
    types::TripId,
};

const TABLE_NAME: &str = "trips";
const SELECT_COLUMNS: &str =
    "id, vehicle_id, driver_id, cargo_weight, origin, destination, status, created_at, updated_at";

pub async fn lock_by_id<'e>(
    db: impl PgExecutor<'e>,
    id: TripId,
) -> Result<Option<Trip>, AppError> {
    let query = format!(
        "SELECT {} FROM {} WHERE id = $1 FOR UPDATE",
        SELECT_COLUMNS, TABLE_NAME
    );
    let row = sqlx::query_as::<_, Trip>(&query)
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(row)
}

pub async fn insert<'e>(db: impl PgExecutor<'e>, trip: &Trip) -> Result<(), AppError> {
    let query = format!(
        "INSERT INTO {} (id, vehicle_id, driver_id, cargo_weight, origin, destination, status, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        TABLE_NAME
    );
    sqlx::query(&query)
        .bind(trip.id)
        .bind(trip.vehicle_id)
        .bind(trip.driver_id)
        .bind(trip.cargo_weight)
        .bind(&trip.origin)
        .bind(&trip.destination)
        .bind(trip.status)
        .bind(trip.created_at)
        .bind(trip.updated_at)
        .execute(db)
        .await?;
    Ok(())
}

pub async fn update_status<'e>(
    db: impl PgExecutor<'e>,
    id: TripId,
    status: TripStatus,
) -> Result<(), AppError> {
    let query = format!(
        "UPDATE {} SET status = $1, updated_at = NOW() WHERE id = $2",
        TABLE_NAME
    );
    sqlx::query(&query).bind(status).bind(id).execute(db).await?;
    Ok(())
}

/// Every trip with its vehicle plate and driver name, newest first.
pub async fn list_board(db: &PgPool) -> Result<Vec<TripListItem>, AppError> {
    let rows = sqlx::query_as::<_, TripListItem>(
        "SELECT t.id, t.vehicle_id, t.driver_id, t.cargo_weight, t.origin, t.destination, \
                t.status, v.license_plate, d.name AS driver_name, t.created_at \
         FROM trips t \
         JOIN vehicles v ON t.vehicle_id = v.id \
         JOIN drivers d ON t.driver_id = d.id \
         ORDER BY t.created_at DESC",
    )
    .fetch_all(db)
    .await?;
    Ok(rows)
}
