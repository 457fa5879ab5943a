//! Tunables for the analysis pipeline.

use crate::curves::{STANDARD_PACE_DISTANCES, STANDARD_POWER_DURATIONS, STANDARD_SWIM_DISTANCES};
use crate::error::{MetricsError, Result};
use serde::{Deserialize, Serialize};

/// Configuration for [`crate::analyze_activity`].
///
/// Zone bounds come from the athlete profile and are optional; without them
/// time-in-zone is only reported when the backend supplies it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
#[serde(default)]
pub struct MetricsConfig {
    /// Maximum points in the decimated map track. Default: 500
    pub max_map_points: u32,

    /// Durations (seconds) of the power curve. Default: 1 s to 2 h
    pub power_curve_durations: Vec<u32>,

    /// Target distances (meters) of the running pace curve.
    pub pace_curve_distances: Vec<f64>,

    /// Target distances (meters) of the swimming pace curve.
    pub swim_pace_curve_distances: Vec<f64>,

    /// Ascending heart-rate zone upper bounds (bpm).
    pub hr_zone_bounds: Option<Vec<f64>>,

    /// Ascending power zone upper bounds (W).
    pub power_zone_bounds: Option<Vec<f64>>,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            max_map_points: 500,
            power_curve_durations: STANDARD_POWER_DURATIONS.to_vec(),
            pace_curve_distances: STANDARD_PACE_DISTANCES.to_vec(),
            swim_pace_curve_distances: STANDARD_SWIM_DISTANCES.to_vec(),
            hr_zone_bounds: None,
            power_zone_bounds: None,
        }
    }
}

impl MetricsConfig {
    /// Parse a config payload. Missing fields take their defaults.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(text).map_err(|source| MetricsError::InvalidPayload {
                what: "config",
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_map_points == 0 {
            return Err(MetricsError::config("max_map_points must be greater than 0"));
        }
        if self.power_curve_durations.contains(&0) {
            return Err(MetricsError::config(
                "power_curve_durations must not contain 0",
            ));
        }
        check_distances("pace_curve_distances", &self.pace_curve_distances)?;
        check_distances("swim_pace_curve_distances", &self.swim_pace_curve_distances)?;
        check_bounds("hr_zone_bounds", self.hr_zone_bounds.as_deref())?;
        check_bounds("power_zone_bounds", self.power_zone_bounds.as_deref())?;
        Ok(())
    }
}

fn check_distances(name: &str, distances: &[f64]) -> Result<()> {
    if distances.iter().any(|d| !d.is_finite() || *d <= 0.0) {
        return Err(MetricsError::config(format!("{} must be positive", name)));
    }
    Ok(())
}

fn check_bounds(name: &str, bounds: Option<&[f64]>) -> Result<()> {
    let Some(bounds) = bounds else {
        return Ok(());
    };
    if bounds.iter().any(|b| !b.is_finite()) {
        return Err(MetricsError::config(format!("{} must be finite", name)));
    }
    if bounds.windows(2).any(|w| w[0] >= w[1]) {
        return Err(MetricsError::config(format!(
            "{} must be strictly ascending",
            name
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = MetricsConfig::default();
        assert_eq!(config.max_map_points, 500);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json_partial() {
        let json = r#"{"max_map_points": 200, "hr_zone_bounds": [120, 140, 160, 175]}"#;
        let config = MetricsConfig::from_json(json).unwrap();
        assert_eq!(config.max_map_points, 200);
        assert_eq!(config.hr_zone_bounds.as_ref().map(Vec::len), Some(4));
        assert_eq!(config.power_curve_durations, STANDARD_POWER_DURATIONS);
        assert_eq!(config.swim_pace_curve_distances, STANDARD_SWIM_DISTANCES);
    }

    #[test]
    fn test_rejects_bad_values() {
        let zero_points = MetricsConfig {
            max_map_points: 0,
            ..Default::default()
        };
        assert!(matches!(
            zero_points.validate(),
            Err(MetricsError::Config { .. })
        ));

        let unsorted = MetricsConfig {
            power_zone_bounds: Some(vec![200.0, 150.0]),
            ..Default::default()
        };
        assert!(unsorted.validate().is_err());

        let zero_duration = MetricsConfig {
            power_curve_durations: vec![0, 5],
            ..Default::default()
        };
        assert!(zero_duration.validate().is_err());

        let negative_swim = MetricsConfig {
            swim_pace_curve_distances: vec![50.0, -100.0],
            ..Default::default()
        };
        assert!(negative_swim.validate().is_err());

        assert!(MetricsConfig::from_json(r#"{"max_map_points": 0}"#).is_err());
        assert!(matches!(
            MetricsConfig::from_json("[1, 2"),
            Err(MetricsError::InvalidPayload { what: "config", .. })
        ));
    }
}
