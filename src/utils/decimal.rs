//! Serde helpers for `BigDecimal` amounts.
//!
//! Amounts go out as JSON strings so clients never round-trip them through a
//! binary float. Incoming amounts may be strings or numbers; numbers are read
//! from their shortest decimal rendering rather than converted from `f64`.

use std::str::FromStr;

use bigdecimal::BigDecimal;
use serde::{de, Deserialize, Deserializer, Serializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum DecimalInput {
    Text(String),
    Number(serde_json::Number),
}

pub fn serialize<S>(value: &BigDecimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&value.to_string())
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<BigDecimal, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = match DecimalInput::deserialize(deserializer)
        .map_err(|_| de::Error::custom("amount must be a decimal string or number"))?
    {
        DecimalInput::Text(text) => text,
        DecimalInput::Number(number) => number.to_string(),
    };

    BigDecimal::from_str(raw.trim())
        .map_err(|_| de::Error::custom(format!("invalid decimal amount: {raw}")))
}
