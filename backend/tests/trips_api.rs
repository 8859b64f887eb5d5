use axum::http::StatusCode;
use fleetflow_backend::{
    models::{driver::DriverStatus, user::UserRole, vehicle::VehicleStatus},
    repositories::{DriverRepository, Repository, VehicleRepository},
    types::{DriverId, VehicleId},
};
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::ServiceExt;

mod support;

use support::{
    body_json, far_future, integration_guard, json_request, long_ago, seed_approved, seed_driver,
    seed_vehicle,
};

fn trip(vehicle_id: VehicleId, driver_id: DriverId, cargo_weight: f64, status: &str) -> Value {
    json!({
        "vehicle_id": vehicle_id.to_string(),
        "driver_id": driver_id.to_string(),
        "cargo_weight": cargo_weight,
        "origin": "Nagpur",
        "destination": "Hyderabad",
        "status": status,
    })
}

async fn statuses(pool: &PgPool, vehicle_id: VehicleId, driver_id: DriverId) -> (VehicleStatus, DriverStatus) {
    let vehicle = VehicleRepository::new().find_by_id(pool, vehicle_id).await.unwrap();
    let driver = DriverRepository::new().find_by_id(pool, driver_id).await.unwrap();
    (vehicle.status, driver.status)
}

async fn dispatcher_token(pool: &PgPool) -> String {
    let dispatcher = seed_approved(pool, UserRole::Dispatcher).await;
    support::token_for(pool, &dispatcher).await
}

#[tokio::test]
async fn dispatch_then_complete_moves_availability() {
    let _guard = integration_guard().await;
    let Some(pool) = support::test_pool().await else {
        return;
    };
    let token = dispatcher_token(&pool).await;
    let vehicle = seed_vehicle(&pool, "MH-12-1", 2000.0, VehicleStatus::Available).await;
    let driver = seed_driver(&pool, "sunil", far_future(), DriverStatus::Available).await;
    let app = support::app(&pool);

    let (status, created) = body_json(
        app.clone()
            .oneshot(json_request(
                "POST",
                "/api/trips",
                Some(&token),
                Some(trip(vehicle.id, driver.id, 1500.0, "Dispatched")),
            ))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["status"], "dispatched");
    assert_eq!(
        statuses(&pool, vehicle.id, driver.id).await,
        (VehicleStatus::OnTrip, DriverStatus::OnTrip)
    );

    let (status, board) = body_json(
        app.clone()
            .oneshot(json_request("GET", "/api/trips", Some(&token), None))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(board["trips"][0]["license_plate"], "MH-12-1");
    assert_eq!(board["trips"][0]["driver_name"], "sunil");
    assert_eq!(board["drivers"], json!([]));

    let trip_id = created["id"].as_str().unwrap();
    let (status, body) = body_json(
        app.oneshot(json_request(
            "PUT",
            &format!("/api/trips/{}/status", trip_id),
            Some(&token),
            Some(json!({ "status": "completed" })),
        ))
        .await
        .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Trip status updated.");
    assert_eq!(
        statuses(&pool, vehicle.id, driver.id).await,
        (VehicleStatus::Available, DriverStatus::Available)
    );
}

#[tokio::test]
async fn returning_dispatched_trip_to_draft_releases_assets() {
    let _guard = integration_guard().await;
    let Some(pool) = support::test_pool().await else {
        return;
    };
    let token = dispatcher_token(&pool).await;
    let vehicle = seed_vehicle(&pool, "MH-12-5", 2000.0, VehicleStatus::Available).await;
    let driver = seed_driver(&pool, "meera", far_future(), DriverStatus::Available).await;
    let app = support::app(&pool);

    let mut payload = trip(vehicle.id, driver.id, 0.0, "dispatched");
    payload["cargo_weight"] = json!("900");
    let (status, created) = body_json(
        app.clone()
            .oneshot(json_request("POST", "/api/trips", Some(&token), Some(payload)))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["cargo_weight"], 900.0);
    assert_eq!(
        statuses(&pool, vehicle.id, driver.id).await,
        (VehicleStatus::OnTrip, DriverStatus::OnTrip)
    );

    let trip_id = created["id"].as_str().unwrap();
    let (status, body) = body_json(
        app.clone()
            .oneshot(json_request(
                "PUT",
                &format!("/api/trips/{}/status", trip_id),
                Some(&token),
                Some(json!({ "status": "parked" })),
            ))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid trip status.");

    let (status, body) = body_json(
        app.oneshot(json_request(
            "PUT",
            &format!("/api/trips/{}/status", trip_id),
            Some(&token),
            Some(json!({ "status": "Draft" })),
        ))
        .await
        .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Trip status updated.");
    assert_eq!(
        statuses(&pool, vehicle.id, driver.id).await,
        (VehicleStatus::Available, DriverStatus::Available)
    );
}

#[tokio::test]
async fn draft_trip_leaves_availability_alone() {
    let _guard = integration_guard().await;
    let Some(pool) = support::test_pool().await else {
        return;
    };
    let token = dispatcher_token(&pool).await;
    let vehicle = seed_vehicle(&pool, "MH-12-2", 2000.0, VehicleStatus::Available).await;
    let driver = seed_driver(&pool, "anil", far_future(), DriverStatus::Available).await;
    let app = support::app(&pool);

    let mut payload = trip(vehicle.id, driver.id, 100.0, "");
    payload.as_object_mut().unwrap().remove("status");
    let (status, created) = body_json(
        app.clone()
            .oneshot(json_request("POST", "/api/trips", Some(&token), Some(payload)))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["status"], "draft");
    assert_eq!(
        statuses(&pool, vehicle.id, driver.id).await,
        (VehicleStatus::Available, DriverStatus::Available)
    );

    let (status, body) = body_json(
        app.oneshot(json_request(
            "PUT",
            &format!("/api/trips/{}/status", created["id"].as_str().unwrap()),
            Some(&token),
            Some(json!({ "status": "draft" })),
        ))
        .await
        .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Trip status unchanged.");
}

#[tokio::test]
async fn assignment_rules_reject_bad_trips() {
    let _guard = integration_guard().await;
    let Some(pool) = support::test_pool().await else {
        return;
    };
    let token = dispatcher_token(&pool).await;
    let truck = seed_vehicle(&pool, "SMALL-1", 500.0, VehicleStatus::Available).await;
    let in_shop = seed_vehicle(&pool, "SHOP-2", 500.0, VehicleStatus::InShop).await;
    let ready = seed_driver(&pool, "ready", far_future(), DriverStatus::Available).await;
    let expired = seed_driver(&pool, "expired", long_ago(), DriverStatus::Available).await;
    let suspended = seed_driver(&pool, "suspended", far_future(), DriverStatus::Suspended).await;
    let app = support::app(&pool);

    let cases = [
        (trip(truck.id, ready.id, 0.0, "draft"), "Cargo weight must be a positive number."),
        (trip(truck.id, ready.id, 501.0, "draft"), "Cargo weight exceeds vehicle maximum capacity."),
        (trip(in_shop.id, ready.id, 10.0, "draft"), "Vehicle in shop cannot be assigned to trip."),
        (trip(truck.id, expired.id, 10.0, "draft"), "Driver license is expired and cannot be assigned."),
        (trip(truck.id, suspended.id, 10.0, "draft"), "Driver is not available for assignment."),
    ];
    for (payload, message) in cases {
        let (status, body) = body_json(
            app.clone()
                .oneshot(json_request("POST", "/api/trips", Some(&token), Some(payload)))
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", message);
        assert_eq!(body["error"], message);
    }

    let (status, body) = body_json(
        app.clone()
            .oneshot(json_request(
                "POST",
                "/api/trips",
                Some(&token),
                Some(trip(VehicleId::new(), ready.id, 10.0, "draft")),
            ))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Vehicle or driver not found.");

    let mut unknown_status = trip(truck.id, ready.id, 10.0, "in_transit");
    unknown_status["origin"] = json!("");
    let (status, body) = body_json(
        app.clone()
            .oneshot(json_request("POST", "/api/trips", Some(&token), Some(unknown_status)))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid trip status.");

    let mut missing_origin = trip(truck.id, ready.id, 10.0, "draft");
    missing_origin["origin"] = json!(" ");
    let (status, body) = body_json(
        app.oneshot(json_request("POST", "/api/trips", Some(&token), Some(missing_origin)))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "All trip fields are required.");
}

#[tokio::test]
async fn busy_vehicle_cannot_be_dispatched_twice() {
    let _guard = integration_guard().await;
    let Some(pool) = support::test_pool().await else {
        return;
    };
    let token = dispatcher_token(&pool).await;
    let vehicle = seed_vehicle(&pool, "BUSY-1", 1000.0, VehicleStatus::Available).await;
    let first = seed_driver(&pool, "first", far_future(), DriverStatus::Available).await;
    let second = seed_driver(&pool, "second", far_future(), DriverStatus::Available).await;
    let app = support::app(&pool);

    let (status, _) = body_json(
        app.clone()
            .oneshot(json_request(
                "POST",
                "/api/trips",
                Some(&token),
                Some(trip(vehicle.id, first.id, 10.0, "dispatched")),
            ))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = body_json(
        app.oneshot(json_request(
            "POST",
            "/api/trips",
            Some(&token),
            Some(trip(vehicle.id, second.id, 10.0, "dispatched")),
        ))
        .await
        .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Vehicle must be available to dispatch.");
    assert_eq!(
        statuses(&pool, vehicle.id, second.id).await,
        (VehicleStatus::OnTrip, DriverStatus::Available)
    );
}

#[tokio::test]
async fn trips_cannot_be_deleted_and_are_dispatcher_only() {
    let _guard = integration_guard().await;
    let Some(pool) = support::test_pool().await else {
        return;
    };
    let token = dispatcher_token(&pool).await;
    let manager = seed_approved(&pool, UserRole::Manager).await;
    let manager_token = support::token_for(&pool, &manager).await;
    let app = support::app(&pool);

    let (status, body) = body_json(
        app.clone()
            .oneshot(json_request("DELETE", "/api/trips/anything", Some(&token), None))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Trip deletion is disabled by current role policy.");

    let (status, body) = body_json(
        app.oneshot(json_request("GET", "/api/trips", Some(&manager_token), None))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["details"]["home"], "dashboard");
}
