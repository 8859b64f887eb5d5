pub mod auth;
pub mod dashboard;
pub mod driver;
pub mod fuel_log;
pub mod maintenance_log;
pub mod repository;
pub mod transaction;
pub mod trip;
pub mod user;
pub mod vehicle;

pub use driver::DriverRepository;
pub use repository::Repository;
pub use transaction::*;
pub use vehicle::VehicleRepository;
