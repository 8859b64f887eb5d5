//! Dispatcher trip board. Every write locks the vehicle and driver rows,
//! re-checks the assignment rules, and applies availability flags in the same
//! transaction as the trip row.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use sqlx::PgConnection;

use crate::{
    error::AppError,
    models::trip::{
        parse_trip_status, CreateTripPayload, Trip, TripBoardResponse, TripStatus,
        UpdateTripStatusPayload,
    },
    repositories::{
        transaction::{begin_transaction, commit_transaction},
        trip as trip_repo, DriverRepository, VehicleRepository,
    },
    services::trip_assignment::{availability_effect, validate_trip_assignment, Assignment},
    state::AppState,
    types::{DriverId, TripId, VehicleId},
    utils::time::today_local,
    validation::FormJson,
};

const TRIP_NOT_FOUND: &str = "Trip not found.";

pub async fn trip_board(State(state): State<AppState>) -> Result<Json<TripBoardResponse>, AppError> {
    let today = today_local(&state.config.time_zone);
    let trips = trip_repo::list_board(&state.pool).await?;
    let vehicles = VehicleRepository::new().list_assignable(&state.pool).await?;
    let drivers = DriverRepository::new()
        .list_assignable(&state.pool, today, true)
        .await?;
    Ok(Json(TripBoardResponse {
        trips,
        vehicles,
        drivers,
    }))
}

pub async fn create_trip(
    State(state): State<AppState>,
    FormJson(payload): FormJson<CreateTripPayload>,
) -> Result<(StatusCode, Json<Trip>), AppError> {
    let input = payload.validate().map_err(|msg| AppError::BadRequest(msg.into()))?;
    let today = today_local(&state.config.time_zone);

    let mut tx = begin_transaction(&state.pool).await?;
    let vehicle = VehicleRepository::new()
        .lock_by_id(&mut *tx, input.vehicle_id)
        .await?;
    let driver = DriverRepository::new()
        .lock_by_id(&mut *tx, input.driver_id)
        .await?;
    let cargo_weight = validate_trip_assignment(&Assignment {
        vehicle: vehicle.as_ref(),
        driver: driver.as_ref(),
        cargo_weight: input.cargo_weight,
        status: input.status,
        old_status: None,
        today,
    })?;

    let trip = Trip::from_input(&input, cargo_weight);
    trip_repo::insert(&mut *tx, &trip).await?;
    apply_availability(&mut *tx, trip.vehicle_id, trip.driver_id, None, trip.status).await?;
    commit_transaction(tx).await?;

    tracing::info!(trip_id = %trip.id, status = trip.status.as_str(), "trip created");
    Ok((StatusCode::CREATED, Json(trip)))
}

pub async fn update_trip_status(
    State(state): State<AppState>,
    Path(trip_id): Path<String>,
    FormJson(payload): FormJson<UpdateTripStatusPayload>,
) -> Result<Json<Value>, AppError> {
    let new_status = parse_trip_status(payload.status.as_deref(), None)
        .map_err(|msg| AppError::BadRequest(msg.into()))?;
    let trip_id: TripId = trip_id
        .parse()
        .map_err(|_| AppError::NotFound(TRIP_NOT_FOUND.into()))?;
    let today = today_local(&state.config.time_zone);

    let mut tx = begin_transaction(&state.pool).await?;
    let trip = trip_repo::lock_by_id(&mut *tx, trip_id)
        .await?
        .ok_or_else(|| AppError::NotFound(TRIP_NOT_FOUND.into()))?;
    if trip.status == new_status {
        return Ok(Json(json!({ "message": "Trip status unchanged." })));
    }

    let vehicle = VehicleRepository::new()
        .lock_by_id(&mut *tx, trip.vehicle_id)
        .await?;
    let driver = DriverRepository::new()
        .lock_by_id(&mut *tx, trip.driver_id)
        .await?;
    validate_trip_assignment(&Assignment {
        vehicle: vehicle.as_ref(),
        driver: driver.as_ref(),
        cargo_weight: Some(trip.cargo_weight),
        status: new_status,
        old_status: Some(trip.status),
        today,
    })?;

    trip_repo::update_status(&mut *tx, trip.id, new_status).await?;
    apply_availability(
        &mut *tx,
        trip.vehicle_id,
        trip.driver_id,
        Some(trip.status),
        new_status,
    )
    .await?;
    commit_transaction(tx).await?;

    tracing::info!(
        trip_id = %trip.id,
        from = trip.status.as_str(),
        to = new_status.as_str(),
        "trip status updated"
    );
    Ok(Json(json!({ "message": "Trip status updated." })))
}

pub async fn delete_trip(Path(_trip_id): Path<String>) -> Result<Json<Value>, AppError> {
    Err(AppError::Forbidden(
        "Trip deletion is disabled by current role policy.".into(),
    ))
}

async fn apply_availability(
    conn: &mut PgConnection,
    vehicle_id: VehicleId,
    driver_id: DriverId,
    old_status: Option<TripStatus>,
    status: TripStatus,
) -> Result<(), AppError> {
    if let Some((vehicle_status, driver_status)) = availability_effect(old_status, status) {
        VehicleRepository::new()
            .set_status(&mut *conn, vehicle_id, vehicle_status)
            .await?;
        DriverRepository::new()
            .set_status(&mut *conn, driver_id, driver_status)
            .await?;
    }
    Ok(())
}
