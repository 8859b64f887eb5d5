pub mod registration;
pub mod trip_assignment;
