//! Zone distribution for heart rate and power.
//!
//! Zone boundaries are never derived here: the athlete profile provides them
//! (or the backend provides time-in-zone directly). This module turns
//! time-in-zone into a percentage distribution, and counts time-in-zone from a
//! 1 Hz stream when only the boundaries are known.
//!
//! ## Example
//! ```rust
//! use activity_metrics::zones::{aggregate_zones, ZoneTime};
//!
//! let breakdown = aggregate_zones(&[
//!     ZoneTime::new(2, 40.0),
//!     ZoneTime::new(1, 60.0),
//! ]);
//! assert_eq!(breakdown.get_zone_percent(1), 60.0);
//! assert_eq!(breakdown.get_zone_percent(2), 40.0);
//! ```

use crate::raw::{as_number, RawActivity};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Time spent in one zone (1-based).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct ZoneTime {
    pub zone: u32,
    #[serde(alias = "time", alias = "duration")]
    pub seconds: f64,
}

impl ZoneTime {
    pub fn new(zone: u32, seconds: f64) -> Self {
        Self { zone, seconds }
    }
}

/// One row of a zone distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct ZoneShare {
    pub zone: u32,
    pub seconds: f64,
    /// 0-100, share of the total time across all zones
    pub percentage: f64,
}

/// Ordered zone distribution (zone 1 first, no gaps).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct ZoneBreakdown {
    pub zones: Vec<ZoneShare>,
    pub total_seconds: f64,
}

impl ZoneBreakdown {
    /// Get percentage for a specific zone (1-based); 0 for unknown zones.
    pub fn get_zone_percent(&self, zone: u32) -> f64 {
        self.zones
            .iter()
            .find(|z| z.zone == zone)
            .map_or(0.0, |z| z.percentage)
    }

    /// Percentages add up to 100 (within rounding), or the breakdown is empty of time.
    pub fn is_coherent(&self) -> bool {
        if self.total_seconds <= 0.0 {
            return self.zones.iter().all(|z| z.percentage == 0.0);
        }
        let sum: f64 = self.zones.iter().map(|z| z.percentage).sum();
        (sum - 100.0).abs() < 1e-6
    }

    /// Zone holding the most time, ties resolved to the lower zone.
    pub fn dominant_zone(&self) -> Option<u32> {
        self.zones
            .iter()
            .filter(|z| z.seconds > 0.0)
            .fold(None::<&ZoneShare>, |best, z| match best {
                Some(b) if b.seconds >= z.seconds => Some(b),
                _ => Some(z),
            })
            .map(|z| z.zone)
    }
}

/// Build a percentage distribution from time-in-zone entries.
///
/// Percentages are `100 × seconds / total` (0 when the total is 0). Entries for
/// the same zone are merged, zone 0 is ignored, negative or non-finite times
/// count as 0, and missing zones between 1 and the highest zone are filled
/// with 0 s.
pub fn aggregate_zones(zone_times: &[ZoneTime]) -> ZoneBreakdown {
    let mut by_zone: BTreeMap<u32, f64> = BTreeMap::new();
    for entry in zone_times.iter().filter(|z| z.zone >= 1) {
        let seconds = if entry.seconds.is_finite() && entry.seconds > 0.0 {
            entry.seconds
        } else {
            0.0
        };
        *by_zone.entry(entry.zone).or_insert(0.0) += seconds;
    }

    let Some(&max_zone) = by_zone.keys().next_back() else {
        return ZoneBreakdown::default();
    };

    let total: f64 = by_zone.values().sum();
    if total <= 0.0 {
        log::debug!("[Zones] No time recorded across {} zones", max_zone);
    }
    let zones = (1..=max_zone)
        .map(|zone| {
            let seconds = by_zone.get(&zone).copied().unwrap_or(0.0);
            let percentage = if total > 0.0 {
                100.0 * seconds / total
            } else {
                0.0
            };
            ZoneShare {
                zone,
                seconds,
                percentage,
            }
        })
        .collect();

    ZoneBreakdown {
        zones,
        total_seconds: total,
    }
}

/// Which zone model a breakdown belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneKind {
    HeartRate,
    Power,
}

impl ZoneKind {
    /// Candidate payload paths holding time-in-zone, highest priority first.
    pub fn source_paths(self) -> &'static [&'static str] {
        match self {
            ZoneKind::HeartRate => &[
                "file_datas.hr_zones",
                "file_datas.time_in_hr_zones",
                "hr_zones",
                "time_in_hr_zones",
                "zones",
            ],
            ZoneKind::Power => &[
                "file_datas.power_zones",
                "file_datas.time_in_power_zones",
                "power_zones",
                "time_in_power_zones",
            ],
        }
    }
}

/// Time-in-zone supplied by the backend, if any.
///
/// Accepts either a plain array of seconds (index 0 is zone 1) or an array of
/// `{zone, seconds}` objects. Unreadable entries are skipped.
pub fn zone_times_from_raw(raw: &RawActivity, kind: ZoneKind) -> Option<Vec<ZoneTime>> {
    let items = raw.first_array(kind.source_paths())?;
    let times: Vec<ZoneTime> = items
        .iter()
        .enumerate()
        .filter_map(|(i, item)| match item {
            Value::Object(_) => serde_json::from_value::<ZoneTime>(item.clone()).ok(),
            other => as_number(other).map(|s| ZoneTime::new(i as u32 + 1, s)),
        })
        .collect();
    (!times.is_empty()).then_some(times)
}

/// Zone (1-based) of a value given ascending upper bounds.
///
/// With N bounds there are N + 1 zones; values above the last bound fall in
/// the top zone.
pub fn zone_for_value(value: f64, upper_bounds: &[f64]) -> u32 {
    upper_bounds
        .iter()
        .position(|&bound| value <= bound)
        .unwrap_or(upper_bounds.len()) as u32
        + 1
}

/// Count seconds per zone in a 1 Hz stream. Missing samples are skipped.
pub fn time_in_zones(stream: &[Option<f64>], upper_bounds: &[f64]) -> Vec<ZoneTime> {
    let mut counts = vec![0u32; upper_bounds.len() + 1];
    for value in stream.iter().flatten().filter(|v| v.is_finite()) {
        counts[(zone_for_value(*value, upper_bounds) - 1) as usize] += 1;
    }
    to_zone_times(&counts)
}

/// Count seconds per zone using parallel processing.
/// More efficient for long streams (> 10,000 samples).
#[cfg(feature = "parallel")]
pub fn time_in_zones_parallel(stream: &[Option<f64>], upper_bounds: &[f64]) -> Vec<ZoneTime> {
    if stream.len() < 10_000 {
        // Fall back to sequential for short streams
        return time_in_zones(stream, upper_bounds);
    }

    let zone_count = upper_bounds.len() + 1;
    let counts = stream
        .par_iter()
        .fold(
            || vec![0u32; zone_count],
            |mut counts, value| {
                if let Some(v) = value.filter(|v| v.is_finite()) {
                    counts[(zone_for_value(v, upper_bounds) - 1) as usize] += 1;
                }
                counts
            },
        )
        .reduce(
            || vec![0u32; zone_count],
            |mut a, b| {
                for (x, y) in a.iter_mut().zip(b) {
                    *x += y;
                }
                a
            },
        );

    to_zone_times(&counts)
}

fn to_zone_times(counts: &[u32]) -> Vec<ZoneTime> {
    counts
        .iter()
        .enumerate()
        .map(|(i, &n)| ZoneTime::new(i as u32 + 1, n as f64))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_zero_total_has_zero_percent() {
        let breakdown = aggregate_zones(&[ZoneTime::new(1, 0.0)]);
        assert_eq!(breakdown.zones.len(), 1);
        assert_eq!(breakdown.zones[0].percentage, 0.0);
        assert!(!breakdown.zones[0].percentage.is_nan());
        assert!(breakdown.is_coherent());
    }

    #[test]
    fn test_percentages_sum_to_100() {
        let breakdown = aggregate_zones(&[ZoneTime::new(1, 60.0), ZoneTime::new(2, 40.0)]);
        assert_eq!(breakdown.get_zone_percent(1), 60.0);
        assert_eq!(breakdown.get_zone_percent(2), 40.0);
        assert_eq!(breakdown.total_seconds, 100.0);
        assert!(breakdown.is_coherent());
    }

    #[test]
    fn test_sorted_and_contiguous() {
        let breakdown = aggregate_zones(&[
            ZoneTime::new(4, 30.0),
            ZoneTime::new(1, 10.0),
            ZoneTime::new(0, 999.0),
            ZoneTime::new(1, 20.0),
        ]);
        let zones: Vec<u32> = breakdown.zones.iter().map(|z| z.zone).collect();
        assert_eq!(zones, vec![1, 2, 3, 4]);
        assert_eq!(breakdown.zones[0].seconds, 30.0);
        assert_eq!(breakdown.zones[1].seconds, 0.0);
        assert_eq!(breakdown.get_zone_percent(4), 50.0);
        assert_eq!(breakdown.dominant_zone(), Some(1));
    }

    #[test]
    fn test_empty_and_invalid_times() {
        assert_eq!(aggregate_zones(&[]), ZoneBreakdown::default());
        let breakdown = aggregate_zones(&[ZoneTime::new(1, f64::NAN), ZoneTime::new(2, -5.0)]);
        assert_eq!(breakdown.total_seconds, 0.0);
        assert_eq!(breakdown.dominant_zone(), None);
        assert!(breakdown.is_coherent());
    }

    #[test]
    fn test_zone_times_from_raw_formats() {
        let plain = RawActivity::new(json!({ "hr_zones": [120, 300, "60", null] }));
        let times = zone_times_from_raw(&plain, ZoneKind::HeartRate).unwrap();
        assert_eq!(
            times,
            vec![
                ZoneTime::new(1, 120.0),
                ZoneTime::new(2, 300.0),
                ZoneTime::new(3, 60.0)
            ]
        );

        let objects = RawActivity::new(json!({
            "file_datas": { "power_zones": [{ "zone": 2, "time": 90 }, { "zone": 1, "seconds": 30 }] }
        }));
        let times = zone_times_from_raw(&objects, ZoneKind::Power).unwrap();
        assert_eq!(times[0], ZoneTime::new(2, 90.0));

        assert!(zone_times_from_raw(&objects, ZoneKind::HeartRate).is_none());
    }

    #[test]
    fn test_zone_for_value() {
        let bounds = [120.0, 140.0, 160.0, 175.0];
        assert_eq!(zone_for_value(100.0, &bounds), 1);
        assert_eq!(zone_for_value(120.0, &bounds), 1);
        assert_eq!(zone_for_value(150.0, &bounds), 3);
        assert_eq!(zone_for_value(190.0, &bounds), 5);
        assert_eq!(zone_for_value(190.0, &[]), 1);
    }

    #[test]
    fn test_time_in_zones() {
        let stream = vec![Some(100.0), Some(130.0), None, Some(130.0), Some(200.0)];
        let times = time_in_zones(&stream, &[120.0, 140.0]);
        assert_eq!(
            times,
            vec![
                ZoneTime::new(1, 1.0),
                ZoneTime::new(2, 2.0),
                ZoneTime::new(3, 1.0)
            ]
        );
        let breakdown = aggregate_zones(&times);
        assert_eq!(breakdown.get_zone_percent(2), 50.0);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_time_in_zones_parallel_matches_sequential() {
        let stream: Vec<Option<f64>> = (0..25_000)
            .map(|i| if i % 7 == 0 { None } else { Some((i % 300) as f64) })
            .collect();
        let bounds = [110.0, 150.0, 180.0, 210.0, 240.0, 300.0];
        assert_eq!(
            time_in_zones_parallel(&stream, &bounds),
            time_in_zones(&stream, &bounds)
        );
    }
}
