pub mod auth;
pub mod dashboard;
pub mod drivers;
pub mod financial;
pub mod maintenance;
pub mod registration;
pub mod safety;
pub mod trips;
pub mod users;
pub mod vehicles;
