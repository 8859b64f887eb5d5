use axum::{extract::State, Json};

use crate::{
    error::AppError,
    models::dashboard::{round2, ManagerDashboard},
    repositories::{dashboard as dashboard_repo, user as user_repo},
    state::AppState,
    utils::time::today_local,
};

pub async fn manager_dashboard(
    State(state): State<AppState>,
) -> Result<Json<ManagerDashboard>, AppError> {
    let pool = &state.pool;
    let today = today_local(&state.config.time_zone);

    let fuel = dashboard_repo::total_fuel_cost(pool).await?;
    let maintenance = dashboard_repo::total_maintenance_cost(pool).await?;

    Ok(Json(ManagerDashboard {
        active_fleet: dashboard_repo::count_vehicles_with_status(pool, "on_trip").await?,
        in_maintenance: dashboard_repo::count_vehicles_with_status(pool, "in_shop").await?,
        available_vehicles: dashboard_repo::count_vehicles_with_status(pool, "available").await?,
        pending_trips: dashboard_repo::count_trips_with_status(pool, "draft").await?,
        expired_licenses: dashboard_repo::count_expired_licenses(pool, today).await?,
        avg_safety_score: dashboard_repo::average_safety_score(pool).await?,
        total_operational_cost: round2(fuel + maintenance),
        recent_trips: dashboard_repo::recent_trips(pool).await?,
        pending_role_requests: user_repo::pending_role_requests(pool).await?,
        approved_role_users: user_repo::approved_role_users(pool).await?,
    }))
}
