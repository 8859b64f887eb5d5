//! Request body decoding for the screen forms.
//!
//! Numeric inputs arrive as JSON numbers or as the text a form field holds.
//! Anything that does not read as a number is treated as missing, so the
//! payload's own checks report it with their usual message.

use axum::extract::FromRequest;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::AppError;

/// `Json` whose rejections render through [`AppError`].
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct FormJson<T>(pub T);

pub fn number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(raw) => raw.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(value.filter(|v| v.is_finite()))
}

/// Whole numbers only; `"12.5"` and out-of-range values read as missing.
pub fn integer<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<i64>,
{
    let value = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_i64(),
        Value::String(raw) => raw.trim().parse::<i64>().ok(),
        _ => None,
    };
    Ok(value.and_then(|v| T::try_from(v).ok()))
}
