//! Form validation helpers.
//!
//! Screen forms report the first failing rule as a single message.

pub mod form;
pub mod rules;

pub use form::FormJson;
