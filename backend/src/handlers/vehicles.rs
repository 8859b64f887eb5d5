use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use crate::{
    error::AppError,
    models::vehicle::{Vehicle, VehiclePayload},
    repositories::{vehicle::VEHICLE_NOT_FOUND, Repository, VehicleRepository},
    state::AppState,
    types::VehicleId,
    validation::FormJson,
};

fn parse_vehicle_id(raw: &str) -> Result<VehicleId, AppError> {
    raw.parse()
        .map_err(|_| AppError::NotFound(VEHICLE_NOT_FOUND.into()))
}

pub async fn list_vehicles(State(state): State<AppState>) -> Result<Json<Vec<Vehicle>>, AppError> {
    let vehicles = VehicleRepository::new().find_all(&state.pool).await?;
    Ok(Json(vehicles))
}

pub async fn get_vehicle(
    State(state): State<AppState>,
    Path(vehicle_id): Path<String>,
) -> Result<Json<Vehicle>, AppError> {
    let id = parse_vehicle_id(&vehicle_id)?;
    let vehicle = VehicleRepository::new().find_by_id(&state.pool, id).await?;
    Ok(Json(vehicle))
}

pub async fn create_vehicle(
    State(state): State<AppState>,
    FormJson(payload): FormJson<VehiclePayload>,
) -> Result<(StatusCode, Json<Vehicle>), AppError> {
    let input = payload.validate().map_err(|msg| AppError::BadRequest(msg.into()))?;
    let vehicle = VehicleRepository::new()
        .create(&state.pool, &Vehicle::from_input(input))
        .await?;
    tracing::info!(vehicle_id = %vehicle.id, plate = %vehicle.license_plate, "vehicle created");
    Ok((StatusCode::CREATED, Json(vehicle)))
}

pub async fn update_vehicle(
    State(state): State<AppState>,
    Path(vehicle_id): Path<String>,
    FormJson(payload): FormJson<VehiclePayload>,
) -> Result<Json<Vehicle>, AppError> {
    let id = parse_vehicle_id(&vehicle_id)?;
    let repo = VehicleRepository::new();
    let mut vehicle = repo.find_by_id(&state.pool, id).await?;
    let input = payload.validate().map_err(|msg| AppError::BadRequest(msg.into()))?;
    vehicle.apply(input);
    let updated = repo.update(&state.pool, &vehicle).await?;
    tracing::info!(vehicle_id = %updated.id, "vehicle updated");
    Ok(Json(updated))
}

pub async fn delete_vehicle(
    State(state): State<AppState>,
    Path(vehicle_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let id = parse_vehicle_id(&vehicle_id)?;
    let repo = VehicleRepository::new();
    if repo.has_trips(&state.pool, id).await? {
        return Err(AppError::Conflict(
            "Vehicle cannot be deleted because it has trip records.".into(),
        ));
    }
    repo.delete(&state.pool, id).await?;
    tracing::info!(vehicle_id = %id, "vehicle deleted");
    Ok(Json(json!({ "message": "Vehicle deleted." })))
}
