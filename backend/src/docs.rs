#![allow(dead_code)] // OpenAPI doc stubs are only referenced by utoipa macros.

use crate::models::{
    dashboard::{
        CompletedTrip, FinancialDashboard, ManagerDashboard, RecentMaintenance, RecentTrip,
        SafetyDashboard, VehicleCostRow,
    },
    driver::{ComplianceUpdatePayload, Driver, DriverCompliance, DriverPayload, DriverStatus},
    fuel_log::{CreateFuelLogPayload, FuelLog},
    maintenance_log::{
        CreateMaintenancePayload, MaintenanceBoardResponse, MaintenanceListItem, MaintenanceLog,
    },
    trip::{
        CreateTripPayload, Trip, TripBoardResponse, TripListItem, TripStatus,
        UpdateTripStatusPayload,
    },
    user::{
        CurrentUserResponse, LoginRequest, LoginResponse, RefreshRequest, RegisterRequest,
        RegistrationOptions, RoleHolder, RoleOption, UserResponse, UserRole, UserStatus,
    },
    vehicle::{Vehicle, VehicleOption, VehiclePayload, VehicleStatus},
};
use utoipa::{
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
    Modify, OpenApi,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        login_doc,
        refresh_doc,
        logout_doc,
        me_doc,
        registration_options_doc,
        register_doc,
        approve_user_doc,
        reject_user_doc,
        delete_user_doc,
        manager_dashboard_doc,
        list_vehicles_doc,
        create_vehicle_doc,
        get_vehicle_doc,
        update_vehicle_doc,
        delete_vehicle_doc,
        list_drivers_doc,
        create_driver_doc,
        get_driver_doc,
        update_driver_doc,
        delete_driver_doc,
        trip_board_doc,
        create_trip_doc,
        update_trip_status_doc,
        delete_trip_doc,
        maintenance_board_doc,
        create_maintenance_doc,
        safety_dashboard_doc,
        driver_compliance_doc,
        update_driver_compliance_doc,
        financial_dashboard_doc,
        create_fuel_log_doc,
        export_costs_doc
    ),
    components(
        schemas(
            // auth
            LoginRequest,
            LoginResponse,
            RefreshRequest,
            CurrentUserResponse,
            RegisterRequest,
            RegistrationOptions,
            RoleOption,
            RoleHolder,
            UserResponse,
            UserRole,
            UserStatus,
            // fleet
            Vehicle,
            VehiclePayload,
            VehicleOption,
            VehicleStatus,
            Driver,
            DriverPayload,
            DriverStatus,
            DriverCompliance,
            ComplianceUpdatePayload,
            Trip,
            TripStatus,
            TripListItem,
            TripBoardResponse,
            CreateTripPayload,
            UpdateTripStatusPayload,
            MaintenanceLog,
            MaintenanceListItem,
            MaintenanceBoardResponse,
            CreateMaintenancePayload,
            FuelLog,
            CreateFuelLogPayload,
            // dashboards
            ManagerDashboard,
            RecentTrip,
            SafetyDashboard,
            FinancialDashboard,
            VehicleCostRow,
            CompletedTrip,
            RecentMaintenance
        )
    ),
    modifiers(&SecuritySchemes),
    tags(
        (name = "Auth", description = "Sessions and self-registration"),
        (name = "Manager", description = "Fleet records and role approvals"),
        (name = "Dispatch", description = "Trip board"),
        (name = "Safety", description = "Driver compliance"),
        (name = "Finance", description = "Fuel logs and cost reporting")
    ),
    security(("BearerAuth" = []))
)]
pub struct ApiDoc;

struct SecuritySchemes;

impl Modify for SecuritySchemes {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_default();

        let mut bearer = Http::new(HttpAuthScheme::Bearer);
        bearer.bearer_format = Some("JWT".to_string());

        components.add_security_scheme("BearerAuth", SecurityScheme::Http(bearer));
    }
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in; session cookies set", body = LoginResponse),
        (status = 401, description = "Invalid username or password."),
        (status = 403, description = "Account pending or rejected")
    ),
    tag = "Auth",
    security(())
)]
fn login_doc() {}

#[utoipa::path(
    post,
    path = "/api/auth/refresh",
    request_body = RefreshRequest,
    responses(
        (status = 200, body = LoginResponse),
        (status = 401, description = "Invalid or expired refresh token")
    ),
    tag = "Auth",
    security(())
)]
fn refresh_doc() {}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses((status = 200, body = serde_json::Value)),
    tag = "Auth"
)]
fn logout_doc() {}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses((status = 200, body = CurrentUserResponse)),
    tag = "Auth"
)]
fn me_doc() {}

#[utoipa::path(
    get,
    path = "/api/auth/registration",
    responses((status = 200, body = RegistrationOptions)),
    tag = "Auth",
    security(())
)]
fn registration_options_doc() {}

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Request submitted", body = serde_json::Value),
        (status = 400, description = "All fields are required"),
        (status = 409, description = "Role unavailable or email already registered")
    ),
    tag = "Auth",
    security(())
)]
fn register_doc() {}

#[utoipa::path(
    post,
    path = "/api/users/{id}/approve",
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, body = serde_json::Value),
        (status = 404, description = "Request not found"),
        (status = 409, description = "Request is not pending or role already assigned")
    ),
    tag = "Manager"
)]
fn approve_user_doc() {}

#[utoipa::path(
    post,
    path = "/api/users/{id}/reject",
    params(("id" = String, Path, description = "User ID")),
    responses((status = 200, body = serde_json::Value)),
    tag = "Manager"
)]
fn reject_user_doc() {}

#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, body = serde_json::Value),
        (status = 403, description = "Manager cannot be removed")
    ),
    tag = "Manager"
)]
fn delete_user_doc() {}

#[utoipa::path(
    get,
    path = "/api/dashboard",
    responses((status = 200, body = ManagerDashboard)),
    tag = "Manager"
)]
fn manager_dashboard_doc() {}

#[utoipa::path(
    get,
    path = "/api/vehicles",
    responses((status = 200, body = [Vehicle])),
    tag = "Manager"
)]
fn list_vehicles_doc() {}

#[utoipa::path(
    post,
    path = "/api/vehicles",
    request_body = VehiclePayload,
    responses(
        (status = 201, body = Vehicle),
        (status = 409, description = "License plate must be unique.")
    ),
    tag = "Manager"
)]
fn create_vehicle_doc() {}

#[utoipa::path(
    get,
    path = "/api/vehicles/{id}",
    params(("id" = String, Path, description = "Vehicle ID")),
    responses((status = 200, body = Vehicle)),
    tag = "Manager"
)]
fn get_vehicle_doc() {}

#[utoipa::path(
    put,
    path = "/api/vehicles/{id}",
    params(("id" = String, Path, description = "Vehicle ID")),
    request_body = VehiclePayload,
    responses((status = 200, body = Vehicle)),
    tag = "Manager"
)]
fn update_vehicle_doc() {}

#[utoipa::path(
    delete,
    path = "/api/vehicles/{id}",
    params(("id" = String, Path, description = "Vehicle ID")),
    responses(
        (status = 200, body = serde_json::Value),
        (status = 409, description = "Vehicle has trip, maintenance or fuel records")
    ),
    tag = "Manager"
)]
fn delete_vehicle_doc() {}

#[utoipa::path(
    get,
    path = "/api/drivers",
    responses((status = 200, body = [Driver])),
    tag = "Manager"
)]
fn list_drivers_doc() {}

#[utoipa::path(
    post,
    path = "/api/drivers",
    request_body = DriverPayload,
    responses(
        (status = 201, body = Driver),
        (status = 403, description = "Only managers can create drivers.")
    ),
    tag = "Manager"
)]
fn create_driver_doc() {}

#[utoipa::path(
    get,
    path = "/api/drivers/{id}",
    params(("id" = String, Path, description = "Driver ID")),
    responses((status = 200, body = Driver)),
    tag = "Manager"
)]
fn get_driver_doc() {}

#[utoipa::path(
    put,
    path = "/api/drivers/{id}",
    params(("id" = String, Path, description = "Driver ID")),
    request_body = DriverPayload,
    responses((status = 200, body = Driver)),
    tag = "Manager"
)]
fn update_driver_doc() {}

#[utoipa::path(
    delete,
    path = "/api/drivers/{id}",
    params(("id" = String, Path, description = "Driver ID")),
    responses((status = 200, body = serde_json::Value)),
    tag = "Manager"
)]
fn delete_driver_doc() {}

#[utoipa::path(
    get,
    path = "/api/trips",
    responses((status = 200, body = TripBoardResponse)),
    tag = "Dispatch"
)]
fn trip_board_doc() {}

#[utoipa::path(
    post,
    path = "/api/trips",
    request_body = CreateTripPayload,
    responses(
        (status = 201, body = Trip),
        (status = 400, description = "Assignment rule failed")
    ),
    tag = "Dispatch"
)]
fn create_trip_doc() {}

#[utoipa::path(
    put,
    path = "/api/trips/{id}/status",
    params(("id" = String, Path, description = "Trip ID")),
    request_body = UpdateTripStatusPayload,
    responses(
        (status = 200, body = serde_json::Value),
        (status = 404, description = "Trip not found.")
    ),
    tag = "Dispatch"
)]
fn update_trip_status_doc() {}

#[utoipa::path(
    delete,
    path = "/api/trips/{id}",
    params(("id" = String, Path, description = "Trip ID")),
    responses((status = 403, description = "Trip deletion is disabled by current role policy.")),
    tag = "Dispatch"
)]
fn delete_trip_doc() {}

#[utoipa::path(
    get,
    path = "/api/maintenance",
    responses((status = 200, body = MaintenanceBoardResponse)),
    tag = "Manager"
)]
fn maintenance_board_doc() {}

#[utoipa::path(
    post,
    path = "/api/maintenance",
    request_body = CreateMaintenancePayload,
    responses((status = 201, body = serde_json::Value)),
    tag = "Manager"
)]
fn create_maintenance_doc() {}

#[utoipa::path(
    get,
    path = "/api/safety/dashboard",
    responses((status = 200, body = SafetyDashboard)),
    tag = "Safety"
)]
fn safety_dashboard_doc() {}

#[utoipa::path(
    get,
    path = "/api/safety/drivers",
    responses((status = 200, body = [DriverCompliance])),
    tag = "Safety"
)]
fn driver_compliance_doc() {}

#[utoipa::path(
    put,
    path = "/api/safety/drivers/{id}",
    params(("id" = String, Path, description = "Driver ID")),
    request_body = ComplianceUpdatePayload,
    responses(
        (status = 200, body = serde_json::Value),
        (status = 409, description = "Cannot suspend a driver currently on trip.")
    ),
    tag = "Safety"
)]
fn update_driver_compliance_doc() {}

#[utoipa::path(
    get,
    path = "/api/financial/dashboard",
    responses((status = 200, body = FinancialDashboard)),
    tag = "Finance"
)]
fn financial_dashboard_doc() {}

#[utoipa::path(
    post,
    path = "/api/financial/fuel-logs",
    request_body = CreateFuelLogPayload,
    responses((status = 201, body = serde_json::Value)),
    tag = "Finance"
)]
fn create_fuel_log_doc() {}

#[utoipa::path(
    get,
    path = "/api/financial/export",
    responses((status = 200, description = "Per-vehicle cost CSV", content_type = "text/csv", body = String)),
    tag = "Finance"
)]
fn export_costs_doc() {}
