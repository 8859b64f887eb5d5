use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::{
    error::AppError,
    models::{
        maintenance_log::{CreateMaintenancePayload, MaintenanceBoardResponse},
        vehicle::VehicleStatus,
    },
    repositories::{
        maintenance_log as maintenance_repo,
        transaction::{begin_transaction, commit_transaction},
        vehicle::VEHICLE_NOT_FOUND,
        VehicleRepository,
    },
    state::AppState,
    validation::FormJson,
};

pub async fn maintenance_board(
    State(state): State<AppState>,
) -> Result<Json<MaintenanceBoardResponse>, AppError> {
    let logs = maintenance_repo::list_with_plate(&state.pool).await?;
    let vehicles = VehicleRepository::new().list_by_plate(&state.pool).await?;
    Ok(Json(MaintenanceBoardResponse { logs, vehicles }))
}

/// Logging maintenance sends the vehicle to the shop.
pub async fn create_maintenance_log(
    State(state): State<AppState>,
    FormJson(payload): FormJson<CreateMaintenancePayload>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let log = payload.validate().map_err(|msg| AppError::BadRequest(msg.into()))?;

    let repo = VehicleRepository::new();
    let mut tx = begin_transaction(&state.pool).await?;
    repo.lock_by_id(&mut *tx, log.vehicle_id)
        .await?
        .ok_or_else(|| AppError::NotFound(VEHICLE_NOT_FOUND.into()))?;
    maintenance_repo::insert(&mut *tx, &log).await?;
    repo.set_status(&mut *tx, log.vehicle_id, VehicleStatus::InShop)
        .await?;
    commit_transaction(tx).await?;

    tracing::info!(log_id = %log.id, vehicle_id = %log.vehicle_id, "maintenance logged");
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Maintenance log created. Vehicle moved to In Shop.",
            "log": log,
        })),
    ))
}
