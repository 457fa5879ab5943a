//! Raw backend payloads.
//!
//! Activity payloads arrive as loosely-shaped JSON: the same quantity can live
//! under several legacy keys, nested under `file_datas`, stored as a number or
//! a numeric string. [`RawActivity`] keeps the payload untouched and offers
//! path lookups; nothing here decides which key wins (see `resolve`).

use crate::error::{MetricsError, OptionExt, Result};
use crate::units::SourceUnit;
use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Candidate list paths for the per-sample record stream.
const RECORD_LIST_PATHS: &[&str] = &["file_datas.records", "records"];

/// Candidate list paths for the lap list.
const LAP_LIST_PATHS: &[&str] = &["file_datas.laps", "laps"];

/// A raw activity/session payload as delivered by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawActivity(Value);

impl RawActivity {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Parse a JSON payload. The top level must be an object.
    pub fn from_json(text: &str) -> Result<Self> {
        let value: Value =
            serde_json::from_str(text).map_err(|source| MetricsError::InvalidPayload {
                what: "activity",
                source,
            })?;
        value
            .is_object()
            .then_some(Self(value))
            .ok_or_malformed("activity", "top level is not a JSON object")
    }

    pub fn value(&self) -> &Value {
        &self.0
    }

    /// Look up a dotted path such as `file_datas.avg_power`. JSON `null` is absent.
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        lookup_path(&self.0, path)
    }

    /// Numeric value at `path`, if present and finite.
    pub fn number(&self, path: &str) -> Option<f64> {
        self.lookup(path).and_then(as_number)
    }

    /// Non-empty string at `path`.
    pub fn text(&self, path: &str) -> Option<&str> {
        self.lookup(path)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// First non-empty string among `paths`.
    pub fn first_text(&self, paths: &[&str]) -> Option<&str> {
        paths.iter().find_map(|path| self.text(path))
    }

    /// First array found among `paths`.
    pub fn first_array(&self, paths: &[&str]) -> Option<&Vec<Value>> {
        paths
            .iter()
            .find_map(|path| self.lookup(path).and_then(Value::as_array))
    }

    /// Per-sample records, parsed in stream order.
    pub fn records(&self) -> Vec<RawRecord> {
        self.first_array(RECORD_LIST_PATHS)
            .map(|items| items.iter().map(RawRecord::from_value).collect())
            .unwrap_or_default()
    }

    /// Raw lap objects, in temporal order.
    pub fn lap_values(&self) -> &[Value] {
        self.first_array(LAP_LIST_PATHS)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

impl From<Value> for RawActivity {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

pub(crate) fn lookup_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(value, |node, key| node.get(key))
        .filter(|v| !v.is_null())
}

/// Interpret a JSON value as a finite number. Numeric strings are accepted.
pub fn as_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}

/// First finite number among `sources`, converted to its canonical unit.
pub(crate) fn first_number(value: &Value, sources: &[(&str, SourceUnit)]) -> Option<f64> {
    sources.iter().find_map(|&(path, unit)| {
        lookup_path(value, path)
            .and_then(as_number)
            .map(|n| unit.to_canonical(n))
    })
}

/// Parse a record timestamp: epoch seconds, RFC 3339, or a naive UTC datetime.
pub(crate) fn parse_timestamp(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|t| t.is_finite()).map(|t| t as i64),
        Value::String(s) => {
            let s = s.trim();
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return Some(dt.timestamp());
            }
            NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
                .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
                .ok()
                .map(|naive| naive.and_utc().timestamp())
        }
        _ => None,
    }
}

const LAT_SOURCES: &[(&str, SourceUnit)] = &[
    ("position_lat", SourceUnit::Canonical),
    ("lat", SourceUnit::Canonical),
    ("latitude", SourceUnit::Canonical),
];
const LON_SOURCES: &[(&str, SourceUnit)] = &[
    ("position_long", SourceUnit::Canonical),
    ("position_lon", SourceUnit::Canonical),
    ("lon", SourceUnit::Canonical),
    ("lng", SourceUnit::Canonical),
    ("longitude", SourceUnit::Canonical),
];
const ALTITUDE_SOURCES: &[(&str, SourceUnit)] = &[
    ("enhanced_altitude", SourceUnit::Canonical),
    ("altitude", SourceUnit::Canonical),
    ("elevation", SourceUnit::Canonical),
];
const POWER_SOURCES: &[(&str, SourceUnit)] = &[
    ("power", SourceUnit::Canonical),
    ("watts", SourceUnit::Canonical),
];
const HEART_RATE_SOURCES: &[(&str, SourceUnit)] = &[
    ("heart_rate", SourceUnit::Canonical),
    ("hr", SourceUnit::Canonical),
];
const CADENCE_SOURCES: &[(&str, SourceUnit)] = &[("cadence", SourceUnit::Canonical)];
// Device records store speed in m/s
const SPEED_SOURCES: &[(&str, SourceUnit)] = &[
    ("enhanced_speed", SourceUnit::MetersPerSecond),
    ("speed", SourceUnit::MetersPerSecond),
];
const DISTANCE_SOURCES: &[(&str, SourceUnit)] = &[("distance", SourceUnit::Canonical)];
const TIMESTAMP_KEYS: &[&str] = &["timestamp", "time"];

/// One raw sample of the recorded stream.
///
/// Coordinates are kept exactly as stored (degrees or semicircles); the GPS
/// normalizer decides which encoding is in use. Other channels are already in
/// canonical units.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    pub position_lat: Option<f64>,
    pub position_long: Option<f64>,
    /// Altitude in meters
    pub altitude: Option<f64>,
    /// Unix timestamp (seconds)
    pub timestamp: Option<i64>,
    /// Power in watts
    pub power: Option<f64>,
    /// Heart rate in bpm
    pub heart_rate: Option<f64>,
    /// Cadence as stored by the device (rpm or half-steps/min)
    pub cadence: Option<f64>,
    /// Speed in km/h
    pub speed: Option<f64>,
    /// Cumulative distance in meters
    pub distance: Option<f64>,
}

impl RawRecord {
    /// Build a record from one element of a raw `records` array.
    pub fn from_value(value: &Value) -> Self {
        Self {
            position_lat: first_number(value, LAT_SOURCES),
            position_long: first_number(value, LON_SOURCES),
            altitude: first_number(value, ALTITUDE_SOURCES),
            timestamp: TIMESTAMP_KEYS
                .iter()
                .find_map(|key| lookup_path(value, key).and_then(parse_timestamp)),
            power: first_number(value, POWER_SOURCES),
            heart_rate: first_number(value, HEART_RATE_SOURCES),
            cadence: first_number(value, CADENCE_SOURCES),
            speed: first_number(value, SPEED_SOURCES),
            distance: first_number(value, DISTANCE_SOURCES),
        }
    }
}
