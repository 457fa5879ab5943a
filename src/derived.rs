//! Discipline-specific secondary metrics.
//!
//! Every function takes canonical values and returns `None` when its
//! preconditions are not met. A derived metric is never reported as 0 or NaN
//! in place of "unknown".

use crate::discipline::Discipline;
use crate::resolve::CanonicalMetrics;
use crate::units::{format_pace, PaceUnit};
use serde::{Deserialize, Serialize};

/// Elevation gain (m) below which VAM is not reported.
pub const VAM_MIN_ELEVATION_GAIN: f64 = 100.0;

/// Pace expressed as seconds per unit distance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct Pace {
    pub seconds: f64,
    pub unit: PaceUnit,
}

impl Pace {
    pub fn minutes(&self) -> f64 {
        self.seconds / 60.0
    }

    /// Display string, e.g. `5:00 /km`.
    pub fn format(&self) -> String {
        format_pace(self.seconds, self.unit)
    }
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

/// Pace from average speed (km/h).
///
/// Running: seconds per km. Swimming: seconds per 100 m. Cycling and other
/// disciplines display speed instead, so there is no pace.
pub fn pace(avg_speed_kmh: Option<f64>, discipline: Discipline) -> Option<Pace> {
    let speed = finite(avg_speed_kmh).filter(|&s| s > 0.0)?;
    match discipline {
        Discipline::Running => Some(Pace {
            seconds: 3600.0 / speed,
            unit: PaceUnit::PerKilometer,
        }),
        Discipline::Swimming => Some(Pace {
            seconds: 360.0 / speed,
            unit: PaceUnit::PerHundredMeters,
        }),
        Discipline::Cycling | Discipline::Other => None,
    }
}

/// IF = NP / FTP
pub fn intensity_factor(np: Option<f64>, ftp: Option<f64>) -> Option<f64> {
    match (finite(np), finite(ftp)) {
        (Some(n), Some(f)) if f > 0.0 => Some(n / f),
        _ => None,
    }
}

/// W/kg = power / weight
pub fn watts_per_kg(avg_power: Option<f64>, weight: Option<f64>) -> Option<f64> {
    match (finite(avg_power), finite(weight)) {
        (Some(p), Some(w)) if w > 0.0 => Some(p / w),
        _ => None,
    }
}

/// VAM (m/h) = elevation gain / duration × 3600, cycling only.
///
/// Requires more than [`VAM_MIN_ELEVATION_GAIN`] meters of climbing.
pub fn vam(
    elevation_gain: Option<f64>,
    duration_seconds: Option<f64>,
    discipline: Discipline,
) -> Option<f64> {
    if discipline != Discipline::Cycling {
        return None;
    }
    match (finite(elevation_gain), finite(duration_seconds)) {
        (Some(gain), Some(secs)) if gain > VAM_MIN_ELEVATION_GAIN && secs > 0.0 => {
            Some(gain * 3600.0 / secs)
        }
        _ => None,
    }
}

/// Cadence as displayed: running cadence is stored per leg and doubled.
pub fn cadence_display(raw_cadence: Option<f64>, discipline: Discipline) -> Option<f64> {
    finite(raw_cadence).map(|c| c * discipline.cadence_multiplier())
}

/// VI = NP / average power
pub fn variability_index(np: Option<f64>, avg_power: Option<f64>) -> Option<f64> {
    match (finite(np), finite(avg_power)) {
        (Some(n), Some(a)) if a > 0.0 => Some(n / a),
        _ => None,
    }
}

/// EF = NP / average heart rate
pub fn efficiency_factor(np: Option<f64>, avg_hr: Option<f64>) -> Option<f64> {
    match (finite(np), finite(avg_hr)) {
        (Some(n), Some(h)) if h > 0.0 => Some(n / h),
        _ => None,
    }
}

/// All secondary metrics of one activity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct DerivedMetrics {
    pub pace: Option<Pace>,
    pub intensity_factor: Option<f64>,
    /// W/kg from average power
    pub watts_per_kg: Option<f64>,
    /// W/kg from normalized power
    pub np_watts_per_kg: Option<f64>,
    /// m/h
    pub vam: Option<f64>,
    pub avg_cadence: Option<f64>,
    pub max_cadence: Option<f64>,
    pub variability_index: Option<f64>,
    pub efficiency_factor: Option<f64>,
}

impl DerivedMetrics {
    pub fn compute(metrics: &CanonicalMetrics, discipline: Discipline) -> Self {
        Self {
            pace: pace(metrics.avg_speed, discipline),
            intensity_factor: intensity_factor(metrics.normalized_power, metrics.ftp),
            watts_per_kg: watts_per_kg(metrics.avg_power, metrics.weight),
            np_watts_per_kg: watts_per_kg(metrics.normalized_power, metrics.weight),
            vam: vam(metrics.elevation_gain, metrics.duration, discipline),
            avg_cadence: cadence_display(metrics.avg_cadence, discipline),
            max_cadence: cadence_display(metrics.max_cadence, discipline),
            variability_index: variability_index(metrics.normalized_power, metrics.avg_power),
            efficiency_factor: efficiency_factor(metrics.normalized_power, metrics.avg_heart_rate),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_running_pace() {
        let p = pace(Some(12.0), Discipline::Running).unwrap();
        assert!((p.seconds - 300.0).abs() < 1e-9);
        assert!((p.minutes() - 5.0).abs() < 1e-9);
        assert_eq!(p.unit, PaceUnit::PerKilometer);
        assert_eq!(p.format(), "5:00 /km");
    }

    #[test]
    fn test_swimming_pace() {
        // 3 km/h = 2:00 per 100 m
        let p = pace(Some(3.0), Discipline::Swimming).unwrap();
        assert!((p.seconds - 120.0).abs() < 1e-9);
        assert_eq!(p.unit, PaceUnit::PerHundredMeters);
    }

    #[test]
    fn test_pace_guards() {
        assert_eq!(pace(Some(0.0), Discipline::Running), None);
        assert_eq!(pace(Some(-4.0), Discipline::Running), None);
        assert_eq!(pace(None, Discipline::Running), None);
        assert_eq!(pace(Some(30.0), Discipline::Cycling), None);
        assert_eq!(pace(Some(10.0), Discipline::Other), None);
    }

    #[test]
    fn test_intensity_factor() {
        assert_eq!(intensity_factor(Some(250.0), Some(0.0)), None);
        assert_eq!(intensity_factor(Some(250.0), Some(250.0)), Some(1.0));
        assert_eq!(intensity_factor(None, Some(250.0)), None);
        assert_eq!(intensity_factor(Some(250.0), None), None);
    }

    #[test]
    fn test_watts_per_kg() {
        assert_eq!(watts_per_kg(Some(280.0), Some(70.0)), Some(4.0));
        assert_eq!(watts_per_kg(Some(280.0), Some(0.0)), None);
        assert_eq!(watts_per_kg(None, Some(70.0)), None);
    }

    #[test]
    fn test_vam() {
        assert_eq!(vam(Some(500.0), Some(3600.0), Discipline::Cycling), Some(500.0));
        assert_eq!(vam(Some(50.0), Some(3600.0), Discipline::Cycling), None);
        assert_eq!(vam(Some(100.0), Some(3600.0), Discipline::Cycling), None);
        assert_eq!(vam(Some(500.0), Some(0.0), Discipline::Cycling), None);
        assert_eq!(vam(Some(500.0), Some(3600.0), Discipline::Running), None);
    }

    #[test]
    fn test_cadence_display() {
        assert_eq!(cadence_display(Some(85.0), Discipline::Running), Some(170.0));
        assert_eq!(cadence_display(Some(90.0), Discipline::Cycling), Some(90.0));
        assert_eq!(cadence_display(Some(30.0), Discipline::Swimming), Some(30.0));
        assert_eq!(cadence_display(None, Discipline::Running), None);
    }

    #[test]
    fn test_non_finite_inputs_are_absent() {
        assert_eq!(intensity_factor(Some(f64::NAN), Some(250.0)), None);
        assert_eq!(pace(Some(f64::INFINITY), Discipline::Running), None);
        assert_eq!(watts_per_kg(Some(200.0), Some(f64::NAN)), None);
    }

    #[test]
    fn test_compute_all() {
        let metrics = CanonicalMetrics {
            duration: Some(7200.0),
            avg_power: Some(200.0),
            normalized_power: Some(220.0),
            ftp: Some(275.0),
            weight: Some(80.0),
            elevation_gain: Some(1200.0),
            avg_heart_rate: Some(140.0),
            avg_cadence: Some(88.0),
            avg_speed: Some(28.0),
            ..Default::default()
        };
        let derived = DerivedMetrics::compute(&metrics, Discipline::Cycling);
        assert_eq!(derived.pace, None);
        assert!((derived.intensity_factor.unwrap() - 0.8).abs() < 1e-9);
        assert_eq!(derived.watts_per_kg, Some(2.5));
        assert_eq!(derived.vam, Some(600.0));
        assert_eq!(derived.avg_cadence, Some(88.0));
        assert_eq!(derived.max_cadence, None);
        assert!((derived.variability_index.unwrap() - 1.1).abs() < 1e-9);
        assert!((derived.efficiency_factor.unwrap() - 220.0 / 140.0).abs() < 1e-9);
    }
}
