//! Unit conversions and display formatting.
//!
//! Canonical values inside the crate are meters, seconds, watts, bpm and km/h.
//! The helpers here convert raw source units into those, and turn canonical
//! values into the short strings shown on session screens.

use serde::{Deserialize, Serialize};

/// Number of semicircle units in 180 degrees (2^31).
pub const SEMICIRCLES_PER_180_DEG: f64 = 2_147_483_648.0;

/// Conversion factor from semicircles to degrees.
pub const SEMICIRCLE_TO_DEGREES: f64 = 180.0 / SEMICIRCLES_PER_180_DEG;

/// Unit a raw source field is stored in.
///
/// Every source path in the resolution tables declares one of these; the value
/// is converted to the canonical unit of its metric when it is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceUnit {
    /// Already canonical (seconds, watts, bpm, meters, km/h, kcal...)
    Canonical,
    /// Kilometers, canonical is meters
    Kilometers,
    /// Meters per second, canonical is km/h
    MetersPerSecond,
    /// Joules, canonical is kilojoules
    Joules,
    /// Milliseconds, canonical is seconds
    Milliseconds,
}

impl SourceUnit {
    /// Convert a raw value stored in this unit into the canonical unit.
    pub fn to_canonical(self, value: f64) -> f64 {
        match self {
            SourceUnit::Canonical => value,
            SourceUnit::Kilometers => km_to_m(value),
            SourceUnit::MetersPerSecond => ms_to_kmh(value),
            SourceUnit::Joules => value / 1000.0,
            SourceUnit::Milliseconds => value / 1000.0,
        }
    }
}

/// Distance unit a pace is expressed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Enum))]
#[serde(rename_all = "snake_case")]
pub enum PaceUnit {
    /// Seconds per kilometer (running)
    PerKilometer,
    /// Seconds per 100 meters (swimming)
    PerHundredMeters,
}

impl PaceUnit {
    pub fn suffix(self) -> &'static str {
        match self {
            PaceUnit::PerKilometer => "/km",
            PaceUnit::PerHundredMeters => "/100m",
        }
    }
}

pub fn km_to_m(km: f64) -> f64 {
    km * 1000.0
}

pub fn ms_to_kmh(meters_per_second: f64) -> f64 {
    meters_per_second * 3.6
}

pub fn kmh_to_ms(kmh: f64) -> f64 {
    kmh / 3.6
}

/// Convert a semicircle fixed-point coordinate to degrees.
pub fn semicircles_to_degrees(semicircles: f64) -> f64 {
    semicircles * SEMICIRCLE_TO_DEGREES
}

/// Format a duration in seconds as `h:mm:ss`, or `m:ss` below one hour.
pub fn format_duration(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "--".to_string();
    }
    let total = seconds.round() as u64;
    let hours = total / 3600;
    let mins = (total % 3600) / 60;
    let secs = total % 60;
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, mins, secs)
    } else {
        format!("{}:{:02}", mins, secs)
    }
}

/// Format a pace given in seconds per unit, e.g. `5:00 /km`.
pub fn format_pace(seconds_per_unit: f64, unit: PaceUnit) -> String {
    if !seconds_per_unit.is_finite() || seconds_per_unit <= 0.0 {
        return "--".to_string();
    }
    // Round before splitting so 299.7s reads 5:00, never 4:60
    let total = seconds_per_unit.round() as u64;
    format!("{}:{:02} {}", total / 60, total % 60, unit.suffix())
}

/// Format a distance in meters: whole meters below 1 km, km with 2 decimals above.
pub fn format_distance(meters: f64) -> String {
    if !meters.is_finite() || meters < 0.0 {
        return "--".to_string();
    }
    if meters < 1000.0 {
        format!("{} m", meters.round() as i64)
    } else {
        format!("{:.2} km", meters / 1000.0)
    }
}

pub fn format_speed(kmh: f64) -> String {
    if !kmh.is_finite() || kmh < 0.0 {
        return "--".to_string();
    }
    format!("{:.1} km/h", kmh)
}

pub fn format_power(watts: f64) -> String {
    if !watts.is_finite() || watts < 0.0 {
        return "--".to_string();
    }
    format!("{} W", watts.round() as i64)
}

pub fn format_heart_rate(bpm: f64) -> String {
    if !bpm.is_finite() || bpm <= 0.0 {
        return "--".to_string();
    }
    format!("{} bpm", bpm.round() as i64)
}
