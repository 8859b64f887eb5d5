//! Assignment rules shared by trip creation and trip status changes.

use chrono::NaiveDate;
use thiserror::Error;

use crate::{
    error::AppError,
    models::{
        driver::{Driver, DriverStatus},
        trip::TripStatus,
        vehicle::{Vehicle, VehicleStatus},
    },
    utils::time::is_license_expired,
    validation::rules,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TripAssignmentError {
    #[error("Vehicle or driver not found.")]
    NotFound,
    #[error("Cargo weight must be a positive number.")]
    InvalidCargo,
    #[error("Cargo weight exceeds vehicle maximum capacity.")]
    OverCapacity,
    #[error("Vehicle in shop cannot be assigned to trip.")]
    VehicleInShop,
    #[error("Driver license is expired and cannot be assigned.")]
    LicenseExpired,
    #[error("Driver is not available for assignment.")]
    DriverUnavailable,
    #[error("Vehicle must be available to dispatch.")]
    VehicleNotDispatchable,
    #[error("Driver must be available to dispatch.")]
    DriverNotDispatchable,
}

impl From<TripAssignmentError> for AppError {
    fn from(err: TripAssignmentError) -> Self {
        match err {
            TripAssignmentError::NotFound => AppError::NotFound(err.to_string()),
            _ => AppError::BadRequest(err.to_string()),
        }
    }
}

/// What a trip write is about to do.
#[derive(Debug, Clone, Copy)]
pub struct Assignment<'a> {
    pub vehicle: Option<&'a Vehicle>,
    pub driver: Option<&'a Driver>,
    pub cargo_weight: Option<f64>,
    pub status: TripStatus,
    /// `None` when the trip is being created.
    pub old_status: Option<TripStatus>,
    pub today: NaiveDate,
}

/// Checks an assignment in a fixed order; the first failing rule wins.
/// Returns the accepted cargo weight.
pub fn validate_trip_assignment(assignment: &Assignment<'_>) -> Result<f64, TripAssignmentError> {
    let (vehicle, driver) = match (assignment.vehicle, assignment.driver) {
        (Some(vehicle), Some(driver)) => (vehicle, driver),
        _ => return Err(TripAssignmentError::NotFound),
    };

    let cargo_weight = match assignment.cargo_weight {
        Some(weight) if rules::is_positive(weight) => weight,
        _ => return Err(TripAssignmentError::InvalidCargo),
    };
    if cargo_weight > vehicle.max_capacity_kg {
        return Err(TripAssignmentError::OverCapacity);
    }
    if vehicle.status == VehicleStatus::InShop {
        return Err(TripAssignmentError::VehicleInShop);
    }
    if is_license_expired(driver.license_expiry_date, assignment.today) {
        return Err(TripAssignmentError::LicenseExpired);
    }

    let was_dispatched = assignment.old_status == Some(TripStatus::Dispatched);
    if driver.status != DriverStatus::Available && !was_dispatched {
        return Err(TripAssignmentError::DriverUnavailable);
    }
    if assignment.status == TripStatus::Dispatched && !was_dispatched {
        if vehicle.status != VehicleStatus::Available {
            return Err(TripAssignmentError::VehicleNotDispatchable);
        }
        if driver.status != DriverStatus::Available {
            return Err(TripAssignmentError::DriverNotDispatchable);
        }
    }

    Ok(cargo_weight)
}

/// Availability flags implied by a trip landing in `status`.
///
/// Dispatching puts both on trip; finishing or cancelling releases them.
/// Moving an existing trip back to draft releases them too, while a freshly
/// created draft leaves both untouched.
pub fn availability_effect(
    old_status: Option<TripStatus>,
    status: TripStatus,
) -> Option<(VehicleStatus, DriverStatus)> {
    match status {
        TripStatus::Dispatched => Some((VehicleStatus::OnTrip, DriverStatus::OnTrip)),
        TripStatus::Completed | TripStatus::Cancelled => {
            Some((VehicleStatus::Available, DriverStatus::Available))
        }
        TripStatus::Draft if old_status.is_some() => {
            Some((VehicleStatus::Available, DriverStatus::Available))
        }
        TripStatus::Draft => None,
    }
}
