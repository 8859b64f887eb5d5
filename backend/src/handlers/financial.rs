use axum::{
    extract::State,
    http::{
        header::{CONTENT_DISPOSITION, CONTENT_TYPE},
        HeaderMap, HeaderValue, StatusCode,
    },
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

use crate::{
    error::AppError,
    models::{
        dashboard::{round2, FinancialDashboard, VehicleCostRow},
        fuel_log::CreateFuelLogPayload,
    },
    repositories::{
        dashboard as dashboard_repo, fuel_log as fuel_repo, vehicle::VEHICLE_NOT_FOUND,
        VehicleRepository,
    },
    state::AppState,
    utils::{csv::render_csv, time::today_local},
    validation::FormJson,
};

const EXPORT_HEADER: [&str; 8] = [
    "license_plate",
    "model_name",
    "total_fuel_cost",
    "total_maintenance_cost",
    "total_operational_cost",
    "completed_trips",
    "cost_per_trip",
    "vehicle_id",
];

async fn cost_rows(state: &AppState) -> Result<Vec<VehicleCostRow>, AppError> {
    let totals = dashboard_repo::vehicle_cost_totals(&state.pool).await?;
    Ok(totals.into_iter().map(VehicleCostRow::from).collect())
}

pub async fn financial_dashboard(
    State(state): State<AppState>,
) -> Result<Json<FinancialDashboard>, AppError> {
    let pool = &state.pool;
    let total_fuel_cost = round2(dashboard_repo::total_fuel_cost(pool).await?);
    let total_maintenance_cost = round2(dashboard_repo::total_maintenance_cost(pool).await?);

    Ok(Json(FinancialDashboard {
        total_fuel_cost,
        total_maintenance_cost,
        total_operational_cost: round2(total_fuel_cost + total_maintenance_cost),
        completed_trip_count: dashboard_repo::count_trips_with_status(pool, "completed").await?,
        cost_rows: cost_rows(&state).await?,
        completed_trips: dashboard_repo::recent_completed_trips(pool).await?,
        maintenance_recent: dashboard_repo::recent_maintenance(pool).await?,
        vehicles: VehicleRepository::new().list_options(pool).await?,
    }))
}

pub async fn create_fuel_log(
    State(state): State<AppState>,
    FormJson(payload): FormJson<CreateFuelLogPayload>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let log = payload.validate().map_err(|msg| AppError::BadRequest(msg.into()))?;
    VehicleRepository::new()
        .find_optional(&state.pool, log.vehicle_id)
        .await?
        .ok_or_else(|| AppError::NotFound(VEHICLE_NOT_FOUND.into()))?;
    fuel_repo::insert(&state.pool, &log).await?;

    tracing::info!(log_id = %log.id, vehicle_id = %log.vehicle_id, liters = log.liters, "fuel logged");
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Fuel log added.", "log": log })),
    ))
}

/// Per-vehicle cost report as a CSV download.
pub async fn export_costs(State(state): State<AppState>) -> Result<Response, AppError> {
    let rows: Vec<Vec<String>> = cost_rows(&state)
        .await?
        .into_iter()
        .map(export_row)
        .collect();
    let body = render_csv(&EXPORT_HEADER, &rows)?;

    let filename = format!(
        "vehicle_costs_{}.csv",
        today_local(&state.config.time_zone).format("%Y%m%d")
    );
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/csv; charset=utf-8"));
    headers.insert(
        CONTENT_DISPOSITION,
        HeaderValue::from_str(&format!("attachment; filename=\"{}\"", filename))
            .unwrap_or_else(|_| HeaderValue::from_static("attachment")),
    );
    Ok((headers, body).into_response())
}

fn export_row(row: VehicleCostRow) -> Vec<String> {
    vec![
        row.license_plate,
        row.model_name,
        format!("{:.2}", row.total_fuel_cost),
        format!("{:.2}", row.total_maintenance_cost),
        format!("{:.2}", row.total_operational_cost),
        row.completed_trips.to_string(),
        row.cost_per_trip
            .map(|value| format!("{:.2}", value))
            .unwrap_or_default(),
        row.id.to_string(),
    ]
}
