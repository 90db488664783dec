//! Permissive numeric coercion shared by every quoting input.
//!
//! Home records and legacy config rows carry numbers as JSON numbers, numeric
//! strings, or garbage. Anything that does not read as a finite, non-negative
//! number becomes `0.0`; callers never see a parse error.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Parses `raw` as a float, falling back to `0.0`.
pub fn coerce_str(raw: &str) -> f64 {
    sanitize(raw.trim().parse::<f64>().unwrap_or(0.0))
}

/// Reads a JSON value as a number, falling back to `0.0`.
pub fn coerce_value(value: &Value) -> f64 {
    match value {
        Value::Bool(true) => 1.0,
        other => sanitize(parse_number(other).unwrap_or(0.0)),
    }
}

/// Clamps NaN, infinities and negatives to zero.
pub fn sanitize(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

// Numbers and numeric strings, sign kept. Anything else is `None`.
fn parse_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(raw) => raw.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// `deserialize_with` adapter for fields that must never reject a payload.
pub(crate) fn lenient_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_value(&value))
}

/// Config amounts: garbage reads as `0.0`, but negatives keep their sign so
/// `PricingConfig::validate` can reject them.
pub(crate) fn signed_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(parse_number(&value).unwrap_or(0.0))
}

/// Optional numbers. `null`, missing and non-numeric values are `None`; a
/// numeric value keeps its sign.
pub(crate) fn lenient_optional_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(parse_number))
}
