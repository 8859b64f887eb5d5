//! Session checks and role guards.
//!
//! `auth` resolves the caller from a bearer token or the access cookie and
//! stores the [`User`] and [`Claims`] in request extensions. The role guards
//! run inside it and only read those extensions.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::{
    error::AppError,
    models::user::{User, UserRole},
    repositories::{auth as auth_repo, user as user_repo},
    state::AppState,
    utils::{
        cookies::{extract_cookie_value, ACCESS_COOKIE_NAME},
        jwt::{verify_access_token, Claims},
    },
};

const SESSION_REQUIRED: &str = "Authentication required";

pub async fn auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_token(request.headers())
        .ok_or_else(|| AppError::Unauthorized(SESSION_REQUIRED.into()))?;
    let (claims, user) = authenticate(&state, &token).await?;

    request.extensions_mut().insert(claims);
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

pub async fn require_manager(request: Request, next: Next) -> Result<Response, AppError> {
    require_role(UserRole::Manager, request, next).await
}

pub async fn require_dispatcher(request: Request, next: Next) -> Result<Response, AppError> {
    require_role(UserRole::Dispatcher, request, next).await
}

pub async fn require_safety_officer(request: Request, next: Next) -> Result<Response, AppError> {
    require_role(UserRole::SafetyOfficer, request, next).await
}

pub async fn require_financial_analyst(
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    require_role(UserRole::FinancialAnalyst, request, next).await
}

async fn require_role(role: UserRole, request: Request, next: Next) -> Result<Response, AppError> {
    let user = request
        .extensions()
        .get::<User>()
        .ok_or_else(|| AppError::Unauthorized(SESSION_REQUIRED.into()))?;
    check_role(user, role)?;
    Ok(next.run(request).await)
}

/// Rejects callers whose role differs, pointing them back at their home screen.
pub fn check_role(user: &User, role: UserRole) -> Result<(), AppError> {
    if user.role != role {
        tracing::debug!(
            user_id = %user.id,
            role = user.role.as_str(),
            required = role.as_str(),
            "role guard rejected request"
        );
        return Err(AppError::AccessDenied {
            home: user.role.home(),
        });
    }
    Ok(())
}

async fn authenticate(state: &AppState, token: &str) -> Result<(Claims, User), AppError> {
    let claims = verify_access_token(token, &state.config.jwt_secret)
        .map_err(|_| AppError::Unauthorized("Invalid or expired token".into()))?;

    if !auth_repo::access_token_exists(&state.pool, &claims.jti).await? {
        return Err(AppError::Unauthorized("Session has ended".into()));
    }

    let user_id = claims
        .sub
        .parse()
        .map_err(|_| AppError::Unauthorized("Invalid or expired token".into()))?;
    let user = user_repo::find_by_id(&state.pool, user_id)
        .await?
        .filter(User::is_approved)
        .ok_or_else(|| AppError::Unauthorized(SESSION_REQUIRED.into()))?;

    Ok((claims, user))
}

fn parse_bearer_token(header: &str) -> Option<&str> {
    let (scheme, rest) = header.split_once(' ')?;
    if scheme.eq_ignore_ascii_case("bearer") {
        let token = rest.trim();
        return (!token.is_empty()).then_some(token);
    }
    None
}

/// Bearer header first, access cookie second.
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(parse_bearer_token)
        .map(str::to_owned);
    bearer.or_else(|| {
        headers
            .get(header::COOKIE)
            .and_then(|value| value.to_str().ok())
            .and_then(|raw| extract_cookie_value(raw, ACCESS_COOKIE_NAME))
    })
}
