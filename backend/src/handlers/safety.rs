use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

use crate::{
    error::AppError,
    models::{
        dashboard::SafetyDashboard,
        driver::{ComplianceUpdatePayload, DriverCompliance, DriverStatus},
    },
    repositories::{
        dashboard as dashboard_repo,
        driver::DRIVER_NOT_FOUND,
        transaction::{begin_transaction, commit_transaction},
        DriverRepository,
    },
    state::AppState,
    types::DriverId,
    utils::time::today_local,
    validation::FormJson,
};

pub async fn safety_dashboard(
    State(state): State<AppState>,
) -> Result<Json<SafetyDashboard>, AppError> {
    let today = today_local(&state.config.time_zone);
    Ok(Json(dashboard_repo::safety_summary(&state.pool, today).await?))
}

pub async fn driver_compliance(
    State(state): State<AppState>,
) -> Result<Json<Vec<DriverCompliance>>, AppError> {
    let today = today_local(&state.config.time_zone);
    let drivers = DriverRepository::new()
        .list_compliance(&state.pool, today)
        .await?;
    Ok(Json(drivers))
}

pub async fn update_driver_compliance(
    State(state): State<AppState>,
    Path(driver_id): Path<String>,
    FormJson(payload): FormJson<ComplianceUpdatePayload>,
) -> Result<Json<Value>, AppError> {
    let (safety_score, status) = payload
        .validate()
        .map_err(|msg| AppError::BadRequest(msg.into()))?;
    let id: DriverId = driver_id
        .parse()
        .map_err(|_| AppError::NotFound(DRIVER_NOT_FOUND.into()))?;

    let repo = DriverRepository::new();
    let mut tx = begin_transaction(&state.pool).await?;
    let driver = repo
        .lock_by_id(&mut *tx, id)
        .await?
        .ok_or_else(|| AppError::NotFound(DRIVER_NOT_FOUND.into()))?;
    if status == DriverStatus::Suspended && driver.status == DriverStatus::OnTrip {
        return Err(AppError::Conflict(
            "Cannot suspend a driver currently on trip.".into(),
        ));
    }

    repo.update_compliance(&mut *tx, id, safety_score, status).await?;
    commit_transaction(tx).await?;
    tracing::info!(driver_id = %id, safety_score, status = status.as_str(), "driver compliance updated");
    Ok(Json(json!({ "message": "Driver compliance profile updated." })))
}
