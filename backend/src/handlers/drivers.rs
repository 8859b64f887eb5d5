use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use crate::{
    error::AppError,
    models::{
        driver::{Driver, DriverPayload},
        user::{User, UserRole},
    },
    repositories::{driver::DRIVER_NOT_FOUND, DriverRepository, Repository},
    state::AppState,
    types::DriverId,
    utils::time::today_local,
    validation::FormJson,
};

fn parse_driver_id(raw: &str) -> Result<DriverId, AppError> {
    raw.parse()
        .map_err(|_| AppError::NotFound(DRIVER_NOT_FOUND.into()))
}

/// Dispatchers only see drivers they could assign right now.
pub async fn list_drivers(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<Vec<Driver>>, AppError> {
    let repo = DriverRepository::new();
    let drivers = if user.role == UserRole::Dispatcher {
        let today = today_local(&state.config.time_zone);
        repo.list_assignable(&state.pool, today, false).await?
    } else {
        repo.find_all(&state.pool).await?
    };
    Ok(Json(drivers))
}

pub async fn create_driver(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    FormJson(payload): FormJson<DriverPayload>,
) -> Result<(StatusCode, Json<Driver>), AppError> {
    if user.role != UserRole::Manager {
        return Err(AppError::Forbidden("Only managers can create drivers.".into()));
    }
    let input = payload.validate().map_err(|msg| AppError::BadRequest(msg.into()))?;
    let driver = DriverRepository::new()
        .create(&state.pool, &Driver::from_input(input))
        .await?;
    tracing::info!(driver_id = %driver.id, "driver created");
    Ok((StatusCode::CREATED, Json(driver)))
}

pub async fn get_driver(
    State(state): State<AppState>,
    Path(driver_id): Path<String>,
) -> Result<Json<Driver>, AppError> {
    let id = parse_driver_id(&driver_id)?;
    Ok(Json(DriverRepository::new().find_by_id(&state.pool, id).await?))
}

pub async fn update_driver(
    State(state): State<AppState>,
    Path(driver_id): Path<String>,
    FormJson(payload): FormJson<DriverPayload>,
) -> Result<Json<Driver>, AppError> {
    let id = parse_driver_id(&driver_id)?;
    let repo = DriverRepository::new();
    let mut driver = repo.find_by_id(&state.pool, id).await?;
    let input = payload.validate().map_err(|msg| AppError::BadRequest(msg.into()))?;
    driver.apply(input);
    let updated = repo.update(&state.pool, &driver).await?;
    tracing::info!(driver_id = %updated.id, "driver updated");
    Ok(Json(updated))
}

pub async fn delete_driver(
    State(state): State<AppState>,
    Path(driver_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let id = parse_driver_id(&driver_id)?;
    let repo = DriverRepository::new();
    if repo.has_trips(&state.pool, id).await? {
        return Err(AppError::Conflict(
            "Driver cannot be deleted because they have trip records.".into(),
        ));
    }
    repo.delete(&state.pool, id).await?;
    tracing::info!(driver_id = %id, "driver deleted");
    Ok(Json(json!({ "message": "Driver deleted." })))
}
