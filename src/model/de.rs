// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Lenient field deserializers.
//!
//! The API is not consistent about JSON types: the same field can arrive as a
//! number, a numeric string or an empty string depending on the endpoint.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::de::{Deserializer, Error as _};
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Bool(bool),
    Unsigned(u64),
    Signed(i64),
    Float(f64),
    Text(String),
}

/// Number or numeric string; `null` and `""` become `None`
pub fn optional_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Scalar>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Scalar::Unsigned(n)) => Ok(Some(n)),
        Some(Scalar::Signed(n)) => u64::try_from(n)
            .map(Some)
            .map_err(|_| D::Error::custom(format!("negative value {n}"))),
        Some(Scalar::Float(f)) if f.is_finite() && f >= 0.0 => Ok(Some(f.round() as u64)),
        Some(Scalar::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(Scalar::Text(s)) => {
            let s = s.trim();
            if let Ok(n) = s.parse::<u64>() {
                return Ok(Some(n));
            }
            match s.parse::<f64>() {
                Ok(f) if f.is_finite() && f >= 0.0 => Ok(Some(f.round() as u64)),
                _ => Err(D::Error::custom(format!(
                    "expected a non-negative number, got '{s}'"
                ))),
            }
        }
        Some(_) => Err(D::Error::custom("expected a non-negative number")),
    }
}

/// Like [`optional_u64`], with missing values read as zero
pub fn u64_or_zero<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    optional_u64(deserializer).map(Option::unwrap_or_default)
}

/// Boolean flag given as a bool, an integer or a string
pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Scalar>::deserialize(deserializer)? {
        None => Ok(false),
        Some(Scalar::Bool(b)) => Ok(b),
        Some(Scalar::Unsigned(n)) => Ok(n != 0),
        Some(Scalar::Signed(n)) => Ok(n != 0),
        Some(Scalar::Float(f)) => Ok(f != 0.0),
        Some(Scalar::Text(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "" | "0" | "false" => Ok(false),
            "1" | "true" => Ok(true),
            other => Err(D::Error::custom(format!("expected a flag, got '{other}'"))),
        },
    }
}

/// Timestamp in RFC 3339 or `YYYY-MM-DD HH:MM:SS` (UTC) form
pub fn timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    parse_timestamp(raw)
        .map(Some)
        .ok_or_else(|| D::Error::custom(format!("invalid timestamp '{raw}'")))
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    let formats = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];
    formats
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
}

/// String field that may be `null`
pub fn string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}
