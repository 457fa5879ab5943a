//! Field resolution chain.
//!
//! Each logical metric has a fixed, ordered list of candidate source paths in
//! the raw payload. The first path holding a finite number wins and is
//! converted to the metric's canonical unit. The tables below are the single
//! place where field precedence is decided.
//!
//! ```rust
//! use activity_metrics::{resolve, MetricKey, RawActivity};
//! use serde_json::json;
//!
//! let raw = RawActivity::new(json!({
//!     "avg_watt": 180,
//!     "file_datas": { "avg_power": 185, "distance": 42.5 }
//! }));
//! assert_eq!(resolve(&raw, MetricKey::AvgPower), Some(185.0));
//! assert_eq!(resolve(&raw, MetricKey::Distance), Some(42_500.0));
//! assert_eq!(resolve(&raw, MetricKey::NormalizedPower), None);
//! ```

use crate::raw::RawActivity;
use crate::units::SourceUnit;
use serde::{Deserialize, Serialize};

/// Logical metrics that can be resolved from a raw activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKey {
    /// Seconds
    Duration,
    /// Meters
    Distance,
    /// Watts
    AvgPower,
    MaxPower,
    /// bpm
    AvgHeartRate,
    MaxHeartRate,
    MinHeartRate,
    /// As stored (rpm or half-steps/min)
    AvgCadence,
    MaxCadence,
    /// km/h
    AvgSpeed,
    MaxSpeed,
    /// Meters
    ElevationGain,
    ElevationLoss,
    AltitudeMin,
    AltitudeMax,
    AltitudeAvg,
    /// kcal
    Calories,
    /// Watts
    NormalizedPower,
    Ftp,
    /// kg
    Weight,
    Tss,
    Trimp,
    /// kJ
    Kilojoules,
}

impl MetricKey {
    pub const ALL: [MetricKey; 23] = [
        MetricKey::Duration,
        MetricKey::Distance,
        MetricKey::AvgPower,
        MetricKey::MaxPower,
        MetricKey::AvgHeartRate,
        MetricKey::MaxHeartRate,
        MetricKey::MinHeartRate,
        MetricKey::AvgCadence,
        MetricKey::MaxCadence,
        MetricKey::AvgSpeed,
        MetricKey::MaxSpeed,
        MetricKey::ElevationGain,
        MetricKey::ElevationLoss,
        MetricKey::AltitudeMin,
        MetricKey::AltitudeMax,
        MetricKey::AltitudeAvg,
        MetricKey::Calories,
        MetricKey::NormalizedPower,
        MetricKey::Ftp,
        MetricKey::Weight,
        MetricKey::Tss,
        MetricKey::Trimp,
        MetricKey::Kilojoules,
    ];

    /// Ordered candidate sources, highest priority first.
    pub fn sources(self) -> &'static [(&'static str, SourceUnit)] {
        use SourceUnit::*;
        match self {
            MetricKey::Duration => &[
                ("file_datas.duration", Canonical),
                ("file_datas.total_timer_time", Canonical),
                ("duration", Canonical),
                ("moving_time", Canonical),
                ("elapsed_time", Canonical),
                ("duration_ms", Milliseconds),
            ],
            MetricKey::Distance => &[
                ("file_datas.total_distance", Canonical),
                ("file_datas.distance", Kilometers),
                ("distance", Kilometers),
                ("distance_m", Canonical),
            ],
            MetricKey::AvgPower => &[
                ("file_datas.avg_power", Canonical),
                ("avg_watt", Canonical),
                ("avg_power", Canonical),
            ],
            MetricKey::MaxPower => &[
                ("file_datas.max_power", Canonical),
                ("max_watt", Canonical),
                ("max_power", Canonical),
            ],
            MetricKey::AvgHeartRate => &[
                ("file_datas.avg_heart_rate", Canonical),
                ("file_datas.avg_hr", Canonical),
                ("avg_hr", Canonical),
                ("avg_heart_rate", Canonical),
            ],
            MetricKey::MaxHeartRate => &[
                ("file_datas.max_heart_rate", Canonical),
                ("file_datas.max_hr", Canonical),
                ("max_hr", Canonical),
                ("max_heart_rate", Canonical),
            ],
            MetricKey::MinHeartRate => &[
                ("file_datas.min_heart_rate", Canonical),
                ("file_datas.min_hr", Canonical),
                ("min_hr", Canonical),
                ("min_heart_rate", Canonical),
            ],
            MetricKey::AvgCadence => &[
                ("file_datas.avg_cadence", Canonical),
                ("avg_cadence", Canonical),
            ],
            MetricKey::MaxCadence => &[
                ("file_datas.max_cadence", Canonical),
                ("max_cadence", Canonical),
            ],
            MetricKey::AvgSpeed => &[
                ("file_datas.avg_speed", Canonical),
                ("file_datas.enhanced_avg_speed", MetersPerSecond),
                ("avg_speed", Canonical),
            ],
            MetricKey::MaxSpeed => &[
                ("file_datas.max_speed", Canonical),
                ("file_datas.enhanced_max_speed", MetersPerSecond),
                ("max_speed", Canonical),
            ],
            MetricKey::ElevationGain => &[
                ("file_datas.total_ascent", Canonical),
                ("file_datas.elevation_gain", Canonical),
                ("elevation_gain", Canonical),
                ("total_elevation_gain", Canonical),
            ],
            MetricKey::ElevationLoss => &[
                ("file_datas.total_descent", Canonical),
                ("file_datas.elevation_loss", Canonical),
                ("elevation_loss", Canonical),
            ],
            MetricKey::AltitudeMin => &[
                ("file_datas.min_altitude", Canonical),
                ("altitude_min", Canonical),
                ("min_altitude", Canonical),
            ],
            MetricKey::AltitudeMax => &[
                ("file_datas.max_altitude", Canonical),
                ("altitude_max", Canonical),
                ("max_altitude", Canonical),
            ],
            MetricKey::AltitudeAvg => &[
                ("file_datas.avg_altitude", Canonical),
                ("altitude_avg", Canonical),
                ("avg_altitude", Canonical),
            ],
            MetricKey::Calories => &[
                ("file_datas.total_calories", Canonical),
                ("file_datas.calories", Canonical),
                ("calories", Canonical),
            ],
            MetricKey::NormalizedPower => &[
                ("file_datas.normalized_power", Canonical),
                ("file_datas.np", Canonical),
                ("normalized_power", Canonical),
                ("np", Canonical),
            ],
            MetricKey::Ftp => &[
                ("file_datas.ftp", Canonical),
                ("ftp", Canonical),
                ("athlete.ftp", Canonical),
            ],
            MetricKey::Weight => &[
                ("weight", Canonical),
                ("athlete.weight", Canonical),
                ("file_datas.weight", Canonical),
            ],
            MetricKey::Tss => &[("file_datas.tss", Canonical), ("tss", Canonical)],
            MetricKey::Trimp => &[("file_datas.trimp", Canonical), ("trimp", Canonical)],
            MetricKey::Kilojoules => &[
                ("file_datas.total_work", Joules),
                ("kilojoules", Canonical),
                ("file_datas.kilojoules", Canonical),
            ],
        }
    }

    /// Metrics for which a stored 0 means "not set".
    ///
    /// FTP is only ever used as a divisor.
    pub fn zero_means_absent(self) -> bool {
        matches!(self, MetricKey::Ftp)
    }
}

/// Resolve one metric from a raw activity, in canonical units.
///
/// Walks the metric's source list and returns the first finite value. Absent
/// input is always `None`; this never fails.
pub fn resolve(raw: &RawActivity, metric: MetricKey) -> Option<f64> {
    metric.sources().iter().find_map(|&(path, unit)| {
        let value = unit.to_canonical(raw.number(path)?);
        if metric.zero_means_absent() && value == 0.0 {
            // A zero placeholder does not shadow a lower-priority real value
            None
        } else {
            Some(value)
        }
    })
}

/// Paths consulted for the sport label, highest priority first.
pub const SPORT_LABEL_PATHS: &[&str] = &[
    "sport",
    "file_datas.sport",
    "discipline",
    "sport_type",
    "type",
];

/// Resolve the free-text sport label of an activity.
pub fn resolve_sport_label(raw: &RawActivity) -> Option<&str> {
    raw.first_text(SPORT_LABEL_PATHS)
}

/// Resolved, unit-normalized primary metrics of one activity.
///
/// Built once from a [`RawActivity`]; nothing downstream looks at the raw
/// payload again.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct CanonicalMetrics {
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
    pub min_heart_rate: Option<f64>,
    /// As stored by the device
    pub avg_cadence: Option<f64>,
    pub max_cadence: Option<f64>,
    /// km/h
    pub avg_speed: Option<f64>,
    pub max_speed: Option<f64>,
    /// Meters
    pub elevation_gain: Option<f64>,
    pub elevation_loss: Option<f64>,
    pub altitude_min: Option<f64>,
    pub altitude_max: Option<f64>,
    pub altitude_avg: Option<f64>,
    /// kcal
    pub calories: Option<f64>,
    /// Watts
    pub normalized_power: Option<f64>,
    pub ftp: Option<f64>,
    /// kg
    pub weight: Option<f64>,
    pub tss: Option<f64>,
    pub trimp: Option<f64>,
    /// kJ
    pub kilojoules: Option<f64>,
}

impl CanonicalMetrics {
    pub fn from_raw(raw: &RawActivity) -> Self {
        let get = |metric| resolve(raw, metric);
        let metrics = Self {
            duration: get(MetricKey::Duration),
            distance: get(MetricKey::Distance),
            avg_power: get(MetricKey::AvgPower),
            max_power: get(MetricKey::MaxPower),
            avg_heart_rate: get(MetricKey::AvgHeartRate),
            max_heart_rate: get(MetricKey::MaxHeartRate),
            min_heart_rate: get(MetricKey::MinHeartRate),
            avg_cadence: get(MetricKey::AvgCadence),
            max_cadence: get(MetricKey::MaxCadence),
            avg_speed: get(MetricKey::AvgSpeed),
            max_speed: get(MetricKey::MaxSpeed),
            elevation_gain: get(MetricKey::ElevationGain),
            elevation_loss: get(MetricKey::ElevationLoss),
            altitude_min: get(MetricKey::AltitudeMin),
            altitude_max: get(MetricKey::AltitudeMax),
            altitude_avg: get(MetricKey::AltitudeAvg),
            calories: get(MetricKey::Calories),
            normalized_power: get(MetricKey::NormalizedPower),
            ftp: get(MetricKey::Ftp),
            weight: get(MetricKey::Weight),
            tss: get(MetricKey::Tss),
            trimp: get(MetricKey::Trimp),
            kilojoules: get(MetricKey::Kilojoules),
        };
        log::debug!(
            "[Resolve] Resolved {}/{} metrics",
            metrics.resolved_count(),
            MetricKey::ALL.len()
        );
        metrics
    }

    /// Canonical value of one metric.
    pub fn get(&self, metric: MetricKey) -> Option<f64> {
        match metric {
            MetricKey::Duration => self.duration,
            MetricKey::Distance => self.distance,
            MetricKey::AvgPower => self.avg_power,
            MetricKey::MaxPower => self.max_power,
            MetricKey::AvgHeartRate => self.avg_heart_rate,
            MetricKey::MaxHeartRate => self.max_heart_rate,
            MetricKey::MinHeartRate => self.min_heart_rate,
            MetricKey::AvgCadence => self.avg_cadence,
            MetricKey::MaxCadence => self.max_cadence,
            MetricKey::AvgSpeed => self.avg_speed,
            MetricKey::MaxSpeed => self.max_speed,
            MetricKey::ElevationGain => self.elevation_gain,
            MetricKey::ElevationLoss => self.elevation_loss,
            MetricKey::AltitudeMin => self.altitude_min,
            MetricKey::AltitudeMax => self.altitude_max,
            MetricKey::AltitudeAvg => self.altitude_avg,
            MetricKey::Calories => self.calories,
            MetricKey::NormalizedPower => self.normalized_power,
            MetricKey::Ftp => self.ftp,
            MetricKey::Weight => self.weight,
            MetricKey::Tss => self.tss,
            MetricKey::Trimp => self.trimp,
            MetricKey::Kilojoules => self.kilojoules,
        }
    }

    pub fn resolved_count(&self) -> usize {
        MetricKey::ALL
            .iter()
            .filter(|&&metric| self.get(metric).is_some())
            .count()
    }
}
