pub mod dashboard;
pub mod driver;
pub mod fuel_log;
pub mod maintenance_log;
pub mod trip;
pub mod user;
pub mod vehicle;
