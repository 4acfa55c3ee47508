//! Lenient number fields for service parameters
//!
//! Callers send numbers as JSON numbers or as strings (`"80"`, `"21.5"`).
//! Integers accept floats and drop the fraction. Booleans, nulls and
//! non-finite values are rejected.

use serde::de::Error;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub fn int<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    to_int(&value).ok_or_else(|| D::Error::custom(format!("expected an integer, got {}", value)))
}

pub fn float<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    to_float(&value).ok_or_else(|| D::Error::custom(format!("expected a number, got {}", value)))
}

fn to_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.abs() < i64::MAX as f64)
                .map(|f| f.trunc() as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn to_float(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    parsed.filter(|f: &f64| f.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_int_coercion() {
        assert_eq!(to_int(&json!(80)), Some(80));
        assert_eq!(to_int(&json!(80.9)), Some(80));
        assert_eq!(to_int(&json!(" 75 ")), Some(75));
        assert_eq!(to_int(&json!("80.5")), None);
        assert_eq!(to_int(&json!(true)), None);
        assert_eq!(to_int(&json!(null)), None);
    }

    #[test]
    fn test_float_coercion() {
        assert_eq!(to_float(&json!(21)), Some(21.0));
        assert_eq!(to_float(&json!("19.5")), Some(19.5));
        assert_eq!(to_float(&json!("NaN")), None);
        assert_eq!(to_float(&json!("warm")), None);
        assert_eq!(to_float(&json!([21])), None);
    }
}
