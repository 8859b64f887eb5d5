use axum::{
    extract::{Extension, Path, State},
    Json,
};
use serde_json::{json, Value};

use crate::{
    error::{unique_violation, AppError},
    models::user::User,
    repositories::{
        transaction::{begin_transaction, commit_transaction},
        user as user_repo,
    },
    services::registration::{check_reviewable, ReviewAction},
    state::AppState,
    types::UserId,
};

pub async fn approve_user(
    State(state): State<AppState>,
    Extension(manager): Extension<User>,
    Path(user_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    review(&state, &manager, &user_id, ReviewAction::Approve).await
}

pub async fn reject_user(
    State(state): State<AppState>,
    Extension(manager): Extension<User>,
    Path(user_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    review(&state, &manager, &user_id, ReviewAction::Reject).await
}

async fn review(
    state: &AppState,
    manager: &User,
    raw_id: &str,
    action: ReviewAction,
) -> Result<Json<Value>, AppError> {
    let not_found = || AppError::NotFound("Request not found".into());
    let user_id: UserId = raw_id.parse().map_err(|_| not_found())?;

    let mut tx = begin_transaction(&state.pool).await?;
    let candidate = user_repo::find_by_id(&mut *tx, user_id).await?;
    let candidate = check_reviewable(candidate.as_ref(), action)?;

    if action == ReviewAction::Approve
        && user_repo::role_conflict_exists(&mut *tx, candidate.role, candidate.id).await?
    {
        return Err(AppError::Conflict("Role already assigned".into()));
    }

    user_repo::set_status(&mut *tx, candidate.id, action.target_status())
        .await
        .map_err(|err| {
            if unique_violation(&err).is_some() {
                AppError::Conflict("Role already assigned".into())
            } else {
                err.into()
            }
        })?;
    commit_transaction(tx).await?;

    tracing::info!(
        manager_id = %manager.id,
        user_id = %user_id,
        status = action.target_status().as_str(),
        "role request reviewed"
    );
    Ok(Json(json!({ "message": action.success_message() })))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Extension(manager): Extension<User>,
    Path(user_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let not_found = || AppError::NotFound("User not found".into());
    let user_id: UserId = user_id.parse().map_err(|_| not_found())?;
    if user_id == manager.id {
        return Err(AppError::BadRequest("Manager cannot delete self".into()));
    }

    let target = user_repo::find_by_id(&state.pool, user_id)
        .await?
        .ok_or_else(not_found)?;
    if target.is_manager() {
        return Err(AppError::Forbidden("Manager cannot be removed".into()));
    }

    user_repo::delete(&state.pool, target.id).await?;
    tracing::info!(manager_id = %manager.id, user_id = %target.id, "user removed");
    Ok(Json(json!({ "message": "User removed" })))
}
