use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::{
    error::{unique_violation, AppError},
    models::user::{RegisterRequest, RegistrationOptions, RoleOption, User},
    repositories::user as user_repo,
    services::registration::{available_roles, check_registration},
    state::AppState,
    utils::password::hash_password,
    validation::FormJson,
};

const ROLE_INDEX: &str = "users_one_active_per_role";

pub async fn registration_options(
    State(state): State<AppState>,
) -> Result<Json<RegistrationOptions>, AppError> {
    let occupied = user_repo::occupied_roles(&state.pool).await?;
    let available = available_roles(&occupied);
    Ok(Json(RegistrationOptions {
        all_roles_assigned: available.is_empty(),
        available_roles: available.into_iter().map(RoleOption::from).collect(),
    }))
}

pub async fn register(
    State(state): State<AppState>,
    FormJson(payload): FormJson<RegisterRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let occupied = user_repo::occupied_roles(&state.pool).await?;
    let registration = check_registration(&payload, &available_roles(&occupied))?;

    let password_hash = hash_password(&registration.password)?;
    let user = User::pending_registration(
        registration.name,
        registration.email,
        password_hash,
        registration.role,
    );

    user_repo::insert(&state.pool, &user).await.map_err(|err| {
        match unique_violation(&err).as_deref() {
            Some(ROLE_INDEX) => AppError::Conflict("Selected role is not available".into()),
            Some(_) => AppError::Conflict("Email already registered".into()),
            None => err.into(),
        }
    })?;

    tracing::info!(user_id = %user.id, role = user.role.as_str(), "role request submitted");
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Request submitted", "id": user.id })),
    ))
}
