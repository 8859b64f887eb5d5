use std::time::Duration;

use axum::{
    body::Bytes,
    extract::{Extension, State},
    http::{header, HeaderMap, HeaderValue},
    Json,
};
use serde_json::{json, Value};

use crate::{
    error::AppError,
    middleware::auth::extract_token,
    models::user::{
        CurrentUserResponse, LoginRequest, LoginResponse, RefreshRequest, User, UserResponse,
        UserStatus,
    },
    repositories::{auth as auth_repo, user as user_repo},
    state::AppState,
    utils::{
        cookies::{
            build_auth_cookie, build_clear_cookie, extract_cookie_value, CookieOptions,
            ACCESS_COOKIE_NAME, ACCESS_COOKIE_PATH, REFRESH_COOKIE_NAME, REFRESH_COOKIE_PATH,
        },
        jwt::{
            create_access_token, create_refresh_token, decode_refresh_token,
            verify_access_token, verify_refresh_token,
        },
        password::verify_password,
    },
    validation::FormJson,
};

const INVALID_CREDENTIALS: &str = "Invalid username or password.";
const INVALID_REFRESH: &str = "Invalid or expired refresh token";

pub async fn login(
    State(state): State<AppState>,
    FormJson(payload): FormJson<LoginRequest>,
) -> Result<(HeaderMap, Json<LoginResponse>), AppError> {
    let identifier = payload.username.trim();
    let user = user_repo::find_by_login(&state.pool, identifier)
        .await?
        .ok_or_else(|| AppError::Unauthorized(INVALID_CREDENTIALS.into()))?;

    if !verify_password(&payload.password, &user.password_hash)? {
        tracing::info!(user_id = %user.id, "login rejected: wrong password");
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
    }
    ensure_login_allowed(&user)?;

    let (headers, response) = issue_session(&state, user).await?;
    tracing::info!(user_id = %response.user.id, role = response.user.role.as_str(), "user logged in");
    Ok((headers, Json(response)))
}

pub async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(HeaderMap, Json<LoginResponse>), AppError> {
    // The body is optional: browsers send the refresh cookie instead.
    let raw = serde_json::from_slice::<RefreshRequest>(&body)
        .ok()
        .map(|payload| payload.refresh_token)
        .filter(|token| !token.trim().is_empty())
        .or_else(|| {
            headers
                .get(header::COOKIE)
                .and_then(|value| value.to_str().ok())
                .and_then(|cookies| extract_cookie_value(cookies, REFRESH_COOKIE_NAME))
        })
        .ok_or_else(|| AppError::BadRequest("Refresh token is required".into()))?;

    let (token_id, secret) =
        decode_refresh_token(&raw).map_err(|_| AppError::Unauthorized(INVALID_REFRESH.into()))?;
    let stored = auth_repo::consume_refresh_token(&state.pool, &token_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized(INVALID_REFRESH.into()))?;
    if !verify_refresh_token(&secret, &stored.token_hash)? {
        return Err(AppError::Unauthorized(INVALID_REFRESH.into()));
    }

    let user = user_repo::find_by_id(&state.pool, stored.user_id)
        .await?
        .filter(User::is_approved)
        .ok_or_else(|| AppError::Unauthorized(INVALID_REFRESH.into()))?;

    let (headers, response) = issue_session(&state, user).await?;
    Ok((headers, Json(response)))
}

pub async fn logout(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    headers: HeaderMap,
) -> Result<(HeaderMap, Json<Value>), AppError> {
    if let Some(claims) = extract_token(&headers)
        .and_then(|token| verify_access_token(&token, &state.config.jwt_secret).ok())
    {
        auth_repo::delete_active_access_token(&state.pool, &claims.jti).await?;
    }
    auth_repo::delete_refresh_tokens_for_user(&state.pool, user.id).await?;
    tracing::info!(user_id = %user.id, "user logged out");

    let options = CookieOptions::from_config(&state.config);
    let mut response_headers = HeaderMap::new();
    append_cookie(
        &mut response_headers,
        build_clear_cookie(ACCESS_COOKIE_NAME, ACCESS_COOKIE_PATH, options),
    )?;
    append_cookie(
        &mut response_headers,
        build_clear_cookie(REFRESH_COOKIE_NAME, REFRESH_COOKIE_PATH, options),
    )?;
    Ok((response_headers, Json(json!({ "message": "Logged out." }))))
}

pub async fn me(Extension(user): Extension<User>) -> Json<CurrentUserResponse> {
    let home = user.role.home().to_string();
    Json(CurrentUserResponse {
        user: UserResponse::from(user),
        home,
    })
}

/// Pending and rejected accounts cannot sign in even with the right password.
pub fn ensure_login_allowed(user: &User) -> Result<(), AppError> {
    match user.status {
        UserStatus::Approved => Ok(()),
        UserStatus::Pending => Err(AppError::Forbidden("Awaiting manager approval".into())),
        UserStatus::Rejected => Err(AppError::Forbidden("Access denied by manager".into())),
    }
}

async fn issue_session(state: &AppState, user: User) -> Result<(HeaderMap, LoginResponse), AppError> {
    let config = &state.config;
    let (access_token, claims) = create_access_token(
        user.id.to_string(),
        user.username.clone(),
        user.role.as_str().to_string(),
        &config.jwt_secret,
        config.jwt_expiration_hours,
    )?;
    auth_repo::insert_active_access_token(&state.pool, &claims.jti, user.id, claims.expires_at())
        .await?;

    let refresh_token = create_refresh_token(user.id.to_string(), config.refresh_token_expiration_days)?;
    auth_repo::insert_refresh_token(&state.pool, &refresh_token).await?;
    let encoded_refresh = refresh_token.encoded();

    let options = CookieOptions::from_config(config);
    let mut headers = HeaderMap::new();
    append_cookie(
        &mut headers,
        build_auth_cookie(
            ACCESS_COOKIE_NAME,
            &access_token,
            Duration::from_secs(config.jwt_expiration_hours * 3600),
            ACCESS_COOKIE_PATH,
            options,
        ),
    )?;
    append_cookie(
        &mut headers,
        build_auth_cookie(
            REFRESH_COOKIE_NAME,
            &encoded_refresh,
            Duration::from_secs(config.refresh_token_expiration_days * 86_400),
            REFRESH_COOKIE_PATH,
            options,
        ),
    )?;

    let home = user.role.home().to_string();
    Ok((
        headers,
        LoginResponse {
            access_token,
            refresh_token: encoded_refresh,
            user: UserResponse::from(user),
            home,
        },
    ))
}

fn append_cookie(headers: &mut HeaderMap, cookie: String) -> Result<(), AppError> {
    let value = HeaderValue::from_str(&cookie)
        .map_err(|e| AppError::InternalServerError(anyhow::anyhow!(e)))?;
    headers.append(header::SET_COOKIE, value);
    Ok(())
}
