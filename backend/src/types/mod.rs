//! Strongly typed identifiers shared across models and repositories.

pub mod id;

pub use id::*;
