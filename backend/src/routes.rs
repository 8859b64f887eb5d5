//! HTTP surface: route groups, role guards, and shared layers.

use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    config::Config,
    docs::ApiDoc,
    handlers,
    middleware::{self as app_middleware, request_id::REQUEST_ID_HEADER},
    state::AppState,
};

pub fn build_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/auth/refresh", post(handlers::auth::refresh))
        .route(
            "/api/auth/registration",
            get(handlers::registration::registration_options),
        )
        .route("/api/auth/register", post(handlers::registration::register));

    // Any signed-in role.
    let user_routes = Router::new()
        .route("/api/auth/logout", post(handlers::auth::logout))
        .route("/api/auth/me", get(handlers::auth::me))
        .route(
            "/api/drivers",
            get(handlers::drivers::list_drivers).post(handlers::drivers::create_driver),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            app_middleware::auth,
        ));

    let manager_routes = Router::new()
        .route("/api/dashboard", get(handlers::dashboard::manager_dashboard))
        .route("/api/users/{id}/approve", post(handlers::users::approve_user))
        .route("/api/users/{id}/reject", post(handlers::users::reject_user))
        .route(
            "/api/users/{id}",
            axum::routing::delete(handlers::users::delete_user),
        )
        .route(
            "/api/vehicles",
            get(handlers::vehicles::list_vehicles).post(handlers::vehicles::create_vehicle),
        )
        .route(
            "/api/vehicles/{id}",
            get(handlers::vehicles::get_vehicle)
                .put(handlers::vehicles::update_vehicle)
                .delete(handlers::vehicles::delete_vehicle),
        )
        .route(
            "/api/drivers/{id}",
            get(handlers::drivers::get_driver)
                .put(handlers::drivers::update_driver)
                .delete(handlers::drivers::delete_driver),
        )
        .route(
            "/api/maintenance",
            get(handlers::maintenance::maintenance_board)
                .post(handlers::maintenance::create_maintenance_log),
        )
        .route_layer(axum_middleware::from_fn(app_middleware::require_manager))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            app_middleware::auth,
        ));

    let dispatcher_routes = Router::new()
        .route(
            "/api/trips",
            get(handlers::trips::trip_board).post(handlers::trips::create_trip),
        )
        .route(
            "/api/trips/{id}/status",
            put(handlers::trips::update_trip_status),
        )
        .route(
            "/api/trips/{id}",
            axum::routing::delete(handlers::trips::delete_trip),
        )
        .route_layer(axum_middleware::from_fn(app_middleware::require_dispatcher))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            app_middleware::auth,
        ));

    let safety_routes = Router::new()
        .route("/api/safety/dashboard", get(handlers::safety::safety_dashboard))
        .route("/api/safety/drivers", get(handlers::safety::driver_compliance))
        .route(
            "/api/safety/drivers/{id}",
            put(handlers::safety::update_driver_compliance),
        )
        .route_layer(axum_middleware::from_fn(
            app_middleware::require_safety_officer,
        ))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            app_middleware::auth,
        ));

    let financial_routes = Router::new()
        .route(
            "/api/financial/dashboard",
            get(handlers::financial::financial_dashboard),
        )
        .route(
            "/api/financial/fuel-logs",
            post(handlers::financial::create_fuel_log),
        )
        .route("/api/financial/export", get(handlers::financial::export_costs))
        .route_layer(axum_middleware::from_fn(
            app_middleware::require_financial_analyst,
        ))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            app_middleware::auth,
        ));

    let cors = cors_layer(&state.config);

    Router::new()
        .merge(public_routes)
        .merge(user_routes)
        .merge(manager_routes)
        .merge(dispatcher_routes)
        .merge(safety_routes)
        .merge(financial_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(axum_middleware::from_fn(app_middleware::log_error_responses))
        .layer(axum_middleware::from_fn(app_middleware::request_id))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

/// `*` allows any origin without credentials; an explicit list allows the
/// session cookies to travel cross-origin.
pub fn cors_layer(config: &Config) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .max_age(Duration::from_secs(24 * 60 * 60));

    if config.cors_allow_origins.iter().any(|origin| origin == "*") {
        return base.allow_origin(Any).allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = config
        .cors_allow_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin.trim_end_matches('/')).ok())
        .collect();
    base.allow_origin(origins)
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
        .allow_credentials(true)
}
