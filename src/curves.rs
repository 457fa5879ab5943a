//! Power-duration and pace curves for a single activity.
//!
//! Both curves assume 1 Hz sampling. Power gaps count as 0 W (coasting or
//! dropouts); a duration longer than the stream has no value rather than a
//! zero one.
//!
//! ## Example
//! ```rust
//! use activity_metrics::curves::compute_power_curve;
//!
//! let power = vec![Some(100.0), Some(200.0), Some(300.0), Some(200.0), Some(100.0)];
//! let curve = compute_power_curve(&power, &[1, 3, 10]);
//! assert_eq!(curve.power_at(1), Some(300.0));
//! assert_eq!(curve.power_at(10), None);
//! ```

use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Standard power curve durations in seconds
pub const STANDARD_POWER_DURATIONS: &[u32] = &[
    1, 5, 10, 15, 30, 60, 120, 300, 600, 1200, 1800, 3600, 5400, 7200,
];

/// Standard running pace curve distances in meters
pub const STANDARD_PACE_DISTANCES: &[f64] = &[
    400.0, 1000.0, 1609.34, 5000.0, 10000.0, 21097.5, 42195.0,
];

/// Standard swim pace curve distances in meters
pub const STANDARD_SWIM_DISTANCES: &[f64] = &[50.0, 100.0, 200.0, 400.0, 800.0, 1500.0];

/// Best average power over one duration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct PowerCurvePoint {
    /// Seconds
    pub duration: u32,
    /// Watts; `None` when the stream is shorter than the duration
    pub watts: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct PowerCurve {
    pub points: Vec<PowerCurvePoint>,
}

impl PowerCurve {
    /// Get the best power at a specific duration
    pub fn power_at(&self, duration_seconds: u32) -> Option<f64> {
        self.points
            .iter()
            .find(|p| p.duration == duration_seconds)
            .and_then(|p| p.watts)
    }

    pub fn is_empty(&self) -> bool {
        self.points.iter().all(|p| p.watts.is_none())
    }
}

/// Fastest effort over one distance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct PaceCurvePoint {
    /// Meters
    pub distance: f64,
    /// Seconds needed to cover the distance
    pub seconds: Option<f64>,
    /// km/h
    pub speed: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct PaceCurve {
    pub points: Vec<PaceCurvePoint>,
}

impl PaceCurve {
    /// Best time (seconds) for a distance, matched within 1 m.
    pub fn seconds_at(&self, distance_meters: f64) -> Option<f64> {
        self.points
            .iter()
            .find(|p| (p.distance - distance_meters).abs() < 1.0)
            .and_then(|p| p.seconds)
    }
}

/// Compute the power-duration curve from a 1 Hz power stream.
pub fn compute_power_curve(power: &[Option<f64>], durations: &[u32]) -> PowerCurve {
    let filled = fill_power(power);
    PowerCurve {
        points: durations
            .iter()
            .map(|&duration| PowerCurvePoint {
                duration,
                watts: best_average(&filled, duration as usize),
            })
            .collect(),
    }
}

/// Compute the power-duration curve with durations processed in parallel.
/// Worth it for multi-hour streams and long duration lists.
#[cfg(feature = "parallel")]
pub fn compute_power_curve_parallel(power: &[Option<f64>], durations: &[u32]) -> PowerCurve {
    if power.len() < 10_000 {
        return compute_power_curve(power, durations);
    }
    let filled = fill_power(power);
    PowerCurve {
        points: durations
            .par_iter()
            .map(|&duration| PowerCurvePoint {
                duration,
                watts: best_average(&filled, duration as usize),
            })
            .collect(),
    }
}

fn fill_power(power: &[Option<f64>]) -> Vec<f64> {
    power
        .iter()
        .map(|p| p.filter(|w| w.is_finite() && *w >= 0.0).unwrap_or(0.0))
        .collect()
}

/// Best average over a sliding window of `window` samples.
fn best_average(samples: &[f64], window: usize) -> Option<f64> {
    if window == 0 || samples.len() < window {
        return None;
    }

    // Initial window sum
    let mut window_sum: f64 = samples[..window].iter().sum();
    let mut best_sum = window_sum;

    // Slide the window
    for i in window..samples.len() {
        window_sum += samples[i] - samples[i - window];
        if window_sum > best_sum {
            best_sum = window_sum;
        }
    }

    Some(best_sum / window as f64)
}

/// Compute the pace curve from a 1 Hz cumulative distance stream (meters).
pub fn compute_pace_curve(cumulative_distance: &[f64], targets: &[f64]) -> PaceCurve {
    PaceCurve {
        points: targets
            .iter()
            .map(|&target| {
                let seconds = fastest_time(cumulative_distance, target);
                PaceCurvePoint {
                    distance: target,
                    seconds,
                    speed: seconds.map(|s| target / s * 3.6),
                }
            })
            .collect(),
    }
}

/// Shortest number of seconds in which `target` meters were covered.
fn fastest_time(cumulative: &[f64], target: f64) -> Option<f64> {
    if target <= 0.0 || cumulative.len() < 2 {
        return None;
    }

    let mut best: Option<usize> = None;
    let mut start = 0;
    for end in 1..cumulative.len() {
        // Move the start forward while the window still covers the target
        while start + 1 < end && cumulative[end] - cumulative[start + 1] >= target {
            start += 1;
        }
        if cumulative[end] - cumulative[start] >= target {
            let elapsed = end - start;
            if best.map_or(true, |b| elapsed < b) {
                best = Some(elapsed);
            }
        }
    }
    best.map(|s| s as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stream(values: &[f64]) -> Vec<Option<f64>> {
        values.iter().map(|&v| Some(v)).collect()
    }

    #[test]
    fn test_best_average() {
        let power = [100.0, 200.0, 300.0, 200.0, 100.0];

        // Window of 1 should return max
        assert_eq!(best_average(&power, 1), Some(300.0));

        // Window of 3: best is [200, 300, 200] = 233.33
        let best_3 = best_average(&power, 3).unwrap();
        assert!((best_3 - 233.33).abs() < 0.01);

        // Window of 5: only option is the whole stream = 180
        assert_eq!(best_average(&power, 5), Some(180.0));
        assert_eq!(best_average(&power, 6), None);
        assert_eq!(best_average(&power, 0), None);
    }

    #[test]
    fn test_power_curve() {
        let power: Vec<Option<f64>> = (0..60).map(|i| Some(200.0 + i as f64 * 2.0)).collect();
        let curve = compute_power_curve(&power, &[1, 5, 10, 30, 120]);

        assert_eq!(curve.points.len(), 5);
        // Last second is the highest
        assert_eq!(curve.power_at(1), Some(318.0));
        assert_eq!(curve.power_at(120), None);
        assert!(!curve.is_empty());
    }

    #[test]
    fn test_gaps_count_as_zero() {
        let power = vec![Some(300.0), None, Some(300.0)];
        let curve = compute_power_curve(&power, &[3]);
        assert_eq!(curve.power_at(3), Some(200.0));
    }

    #[test]
    fn test_power_curve_empty() {
        let curve = compute_power_curve(&[], &[1, 5]);
        assert_eq!(curve.points.len(), 2);
        assert_eq!(curve.power_at(1), None);
        assert!(curve.is_empty());
    }

    #[test]
    fn test_pace_curve() {
        // Steady 4 m/s with a faster 6 m/s middle section
        let mut cumulative = vec![0.0];
        for i in 1..=600 {
            let speed = if (200..300).contains(&i) { 6.0 } else { 4.0 };
            cumulative.push(cumulative[i - 1] + speed);
        }
        let curve = compute_pace_curve(&cumulative, &[400.0, 1000.0, 5000.0]);

        // 400 m fits inside the fast section: 67 s at 6 m/s
        assert_eq!(curve.seconds_at(400.0), Some(67.0));
        assert!(curve.seconds_at(1000.0).unwrap() < 250.0);
        assert_eq!(curve.seconds_at(5000.0), None);
        let p = curve.points[0];
        assert!((p.speed.unwrap() - 400.0 / 67.0 * 3.6).abs() < 1e-9);
    }

    #[test]
    fn test_pace_curve_degenerate() {
        assert_eq!(compute_pace_curve(&[], &[400.0]).seconds_at(400.0), None);
        assert_eq!(compute_pace_curve(&[0.0, 10.0], &[0.0]).points[0].seconds, None);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_matches_sequential() {
        let power: Vec<Option<f64>> = (0..12_000)
            .map(|i| if i % 11 == 0 { None } else { Some((i % 400) as f64) })
            .collect();
        assert_eq!(
            compute_power_curve_parallel(&power, STANDARD_POWER_DURATIONS),
            compute_power_curve(&power, STANDARD_POWER_DURATIONS)
        );
    }

    #[test]
    fn test_two_sample_window() {
        let s = stream(&[1.0, 2.0]);
        assert_eq!(compute_power_curve(&s, &[2]).power_at(2), Some(1.5));
    }
}
