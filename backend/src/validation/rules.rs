//! Common validation rules shared across form payloads.

/// Trims an optional form field, treating a missing field as empty.
pub fn trimmed(value: Option<&str>) -> String {
    value.map(str::trim).unwrap_or_default().to_string()
}

/// Folds `"On Trip"`, `"on-trip"` and `"ON_TRIP"` into `"on_trip"`.
pub fn normalize_enum_token(raw: &str) -> String {
    raw.trim()
        .to_ascii_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}

/// Strictly positive and finite.
pub fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

pub fn is_non_negative(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

pub fn is_safety_score(score: i32) -> bool {
    (0..=100).contains(&score)
}
