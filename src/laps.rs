//! Lap / interval comparison.
//!
//! Laps are ranked against the best lap of the session on the discipline's
//! primary metric: power for cycling, speed for everything else (a faster
//! speed is a better pace). Every lap that reaches the session maximum is
//! flagged as best, so tied laps are all highlighted.
//!
//! ## Example
//! ```rust
//! use activity_metrics::laps::{compute_lap_context, lap_ratio, LapRecord};
//! use activity_metrics::Discipline;
//!
//! let laps: Vec<LapRecord> = [200.0, 250.0, 250.0]
//!     .iter()
//!     .map(|&w| LapRecord { avg_power: Some(w), ..Default::default() })
//!     .collect();
//! let context = compute_lap_context(&laps);
//! let best: Vec<bool> = laps
//!     .iter()
//!     .map(|lap| lap_ratio(lap, &context, Discipline::Cycling).map_or(false, |r| r.is_best))
//!     .collect();
//! assert_eq!(best, vec![false, true, true]);
//! ```

use crate::derived::{pace, Pace};
use crate::discipline::Discipline;
use crate::raw::{first_number, RawActivity};
use crate::units::SourceUnit;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One interval of a session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct LapRecord {
    /// Seconds
    pub duration: Option<f64>,
    /// Meters
    pub distance: Option<f64>,
    /// Watts
    pub avg_power: Option<f64>,
    pub max_power: Option<f64>,
    /// bpm
    pub avg_heart_rate: Option<f64>,
    pub max_heart_rate: Option<f64>,
    /// km/h
    pub avg_speed: Option<f64>,
    pub max_speed: Option<f64>,
    /// As stored by the device
    pub avg_cadence: Option<f64>,
    /// Meters
    pub ascent: Option<f64>,
}

const LAP_DURATION: &[(&str, SourceUnit)] = &[
    ("total_timer_time", SourceUnit::Canonical),
    ("duration", SourceUnit::Canonical),
    ("total_elapsed_time", SourceUnit::Canonical),
    ("elapsed_time", SourceUnit::Canonical),
];
const LAP_DISTANCE: &[(&str, SourceUnit)] = &[
    ("total_distance", SourceUnit::Canonical),
    ("distance", SourceUnit::Canonical),
];
const LAP_AVG_POWER: &[(&str, SourceUnit)] = &[
    ("avg_power", SourceUnit::Canonical),
    ("avg_watt", SourceUnit::Canonical),
];
const LAP_MAX_POWER: &[(&str, SourceUnit)] = &[
    ("max_power", SourceUnit::Canonical),
    ("max_watt", SourceUnit::Canonical),
];
const LAP_AVG_HR: &[(&str, SourceUnit)] = &[
    ("avg_heart_rate", SourceUnit::Canonical),
    ("avg_hr", SourceUnit::Canonical),
];
const LAP_MAX_HR: &[(&str, SourceUnit)] = &[
    ("max_heart_rate", SourceUnit::Canonical),
    ("max_hr", SourceUnit::Canonical),
];
const LAP_AVG_SPEED: &[(&str, SourceUnit)] = &[
    ("avg_speed", SourceUnit::Canonical),
    ("enhanced_avg_speed", SourceUnit::MetersPerSecond),
];
const LAP_MAX_SPEED: &[(&str, SourceUnit)] = &[
    ("max_speed", SourceUnit::Canonical),
    ("enhanced_max_speed", SourceUnit::MetersPerSecond),
];
const LAP_AVG_CADENCE: &[(&str, SourceUnit)] = &[("avg_cadence", SourceUnit::Canonical)];
const LAP_ASCENT: &[(&str, SourceUnit)] = &[
    ("total_ascent", SourceUnit::Canonical),
    ("ascent", SourceUnit::Canonical),
    ("elevation_gain", SourceUnit::Canonical),
];

impl LapRecord {
    /// Build a lap from one element of a raw lap list.
    pub fn from_value(value: &Value) -> Self {
        Self {
            duration: first_number(value, LAP_DURATION),
            distance: first_number(value, LAP_DISTANCE),
            avg_power: first_number(value, LAP_AVG_POWER),
            max_power: first_number(value, LAP_MAX_POWER),
            avg_heart_rate: first_number(value, LAP_AVG_HR),
            max_heart_rate: first_number(value, LAP_MAX_HR),
            avg_speed: first_number(value, LAP_AVG_SPEED),
            max_speed: first_number(value, LAP_MAX_SPEED),
            avg_cadence: first_number(value, LAP_AVG_CADENCE),
            ascent: first_number(value, LAP_ASCENT),
        }
    }

    /// Laps of an activity, in temporal order.
    pub fn list_from_raw(raw: &RawActivity) -> Vec<Self> {
        raw.lap_values().iter().map(Self::from_value).collect()
    }

    /// Lap average for a comparison metric.
    pub fn value(&self, metric: LapMetric) -> Option<f64> {
        match metric {
            LapMetric::Power => self.avg_power,
            LapMetric::HeartRate => self.avg_heart_rate,
            LapMetric::Speed => self.avg_speed,
            LapMetric::Cadence => self.avg_cadence,
        }
    }
}

/// Metric a lap can be compared on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Enum))]
#[serde(rename_all = "snake_case")]
pub enum LapMetric {
    Power,
    HeartRate,
    Speed,
    Cadence,
}

impl LapMetric {
    /// Metric used to rank laps for a discipline.
    pub fn primary(discipline: Discipline) -> Self {
        match discipline {
            Discipline::Cycling => LapMetric::Power,
            Discipline::Running | Discipline::Swimming | Discipline::Other => LapMetric::Speed,
        }
    }
}

/// Session-wide maxima of the lap averages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct LapContext {
    pub max_power: Option<f64>,
    pub max_heart_rate: Option<f64>,
    pub max_speed: Option<f64>,
    pub max_cadence: Option<f64>,
}

impl LapContext {
    pub fn max(&self, metric: LapMetric) -> Option<f64> {
        match metric {
            LapMetric::Power => self.max_power,
            LapMetric::HeartRate => self.max_heart_rate,
            LapMetric::Speed => self.max_speed,
            LapMetric::Cadence => self.max_cadence,
        }
    }
}

fn fold_max(acc: Option<f64>, value: Option<f64>) -> Option<f64> {
    match (acc, value.filter(|v| v.is_finite())) {
        (Some(a), Some(v)) => Some(a.max(v)),
        (None, v) => v,
        (a, None) => a,
    }
}

/// Single pass over the laps; missing values are ignored, not treated as 0.
pub fn compute_lap_context(laps: &[LapRecord]) -> LapContext {
    laps.iter().fold(LapContext::default(), |ctx, lap| LapContext {
        max_power: fold_max(ctx.max_power, lap.avg_power),
        max_heart_rate: fold_max(ctx.max_heart_rate, lap.avg_heart_rate),
        max_speed: fold_max(ctx.max_speed, lap.avg_speed),
        max_cadence: fold_max(ctx.max_cadence, lap.avg_cadence),
    })
}

/// A lap's standing on one metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct LapRatio {
    pub metric: LapMetric,
    pub value: f64,
    /// value / session max, 0 when the max is 0
    pub ratio: f64,
    /// value >= session max
    pub is_best: bool,
}

/// Compare a lap to the session on any metric. `None` when the lap lacks it.
pub fn lap_metric_ratio(
    lap: &LapRecord,
    context: &LapContext,
    metric: LapMetric,
) -> Option<LapRatio> {
    let value = lap.value(metric).filter(|v| v.is_finite())?;
    let max = context.max(metric).unwrap_or(0.0);
    let ratio = if max > 0.0 { value / max } else { 0.0 };
    Some(LapRatio {
        metric,
        value,
        ratio,
        is_best: value >= max,
    })
}

/// Compare a lap to the session on the discipline's primary metric.
pub fn lap_ratio(
    lap: &LapRecord,
    context: &LapContext,
    discipline: Discipline,
) -> Option<LapRatio> {
    lap_metric_ratio(lap, context, LapMetric::primary(discipline))
}

/// Presentation-ready view of one lap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct LapSummary {
    /// 1-based lap number
    pub number: u32,
    pub lap: LapRecord,
    pub primary: Option<LapRatio>,
    pub heart_rate: Option<LapRatio>,
    pub pace: Option<Pace>,
}

/// Summaries for every lap, against a context computed from the same list.
pub fn analyze_laps(laps: &[LapRecord], discipline: Discipline) -> (LapContext, Vec<LapSummary>) {
    let context = compute_lap_context(laps);
    let summaries: Vec<LapSummary> = laps
        .iter()
        .enumerate()
        .map(|(i, lap)| LapSummary {
            number: i as u32 + 1,
            lap: lap.clone(),
            primary: lap_ratio(lap, &context, discipline),
            heart_rate: lap_metric_ratio(lap, &context, LapMetric::HeartRate),
            pace: pace(lap.avg_speed, discipline),
        })
        .collect();

    log::debug!(
        "[Laps] {} laps, {} marked best",
        summaries.len(),
        summaries
            .iter()
            .filter(|s| s.primary.map_or(false, |r| r.is_best))
            .count()
    );
    (context, summaries)
}
