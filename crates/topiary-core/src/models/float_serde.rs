//! Serde helpers for floats that may be non-finite.
//!
//! JSON has no infinity, and `serde_json` writes it as `null`, which then
//! fails to read back as `f64`. These helpers write `"inf"`, `"-inf"` and
//! `"nan"` as strings and accept either form on input.

use serde::{Deserialize, Deserializer, Serializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum FloatRepr {
    Number(f64),
    Text(String),
}

pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.is_finite() {
        serializer.serialize_f64(*value)
    } else if value.is_nan() {
        serializer.serialize_str("nan")
    } else if *value > 0.0 {
        serializer.serialize_str("inf")
    } else {
        serializer.serialize_str("-inf")
    }
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    match FloatRepr::deserialize(deserializer)? {
        FloatRepr::Number(n) => Ok(n),
        FloatRepr::Text(s) => match s.as_str() {
            "inf" | "+inf" | "infinity" => Ok(f64::INFINITY),
            "-inf" | "-infinity" => Ok(f64::NEG_INFINITY),
            "nan" => Ok(f64::NAN),
            other => other.parse().map_err(serde::de::Error::custom),
        },
    }
}
