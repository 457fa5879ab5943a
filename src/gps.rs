//! GPS stream normalization for map display.
//!
//! Device records store coordinates either in degrees or in semicircles
//! (2^31 units per 180°). Each record is checked on its own: if both
//! magnitudes fit in ±180 the values are degrees, otherwise both are
//! converted from semicircles. Points outside the valid coordinate range are
//! dropped, never clamped.
//!
//! ## Example
//! ```rust
//! use activity_metrics::gps::{decimate, normalize};
//! use activity_metrics::RawRecord;
//!
//! let records: Vec<RawRecord> = (0..100)
//!     .map(|i| RawRecord {
//!         position_lat: Some(45.0 + i as f64 * 1e-4),
//!         position_long: Some(6.0),
//!         ..Default::default()
//!     })
//!     .collect();
//!
//! let points = normalize(&records);
//! let map = decimate(&points, 10);
//! assert_eq!(map.len(), 10);
//! assert_eq!(map.first(), points.first());
//! assert_eq!(map.last(), points.last());
//! ```

use crate::raw::RawRecord;
use crate::units::semicircles_to_degrees;
use geo::{Distance, Haversine, Point};
use log::debug;
use serde::{Deserialize, Serialize};

/// A validated GPS coordinate with optional altitude and time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct GpsPoint {
    pub latitude: f64,
    pub longitude: f64,
    /// Meters
    pub altitude: Option<f64>,
    /// Unix timestamp (seconds)
    pub timestamp: Option<i64>,
}

impl GpsPoint {
    /// Create a new GPS point without altitude or time.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            altitude: None,
            timestamp: None,
        }
    }

    /// Check if the point has valid coordinates.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.latitude >= -90.0
            && self.latitude <= 90.0
            && self.longitude >= -180.0
            && self.longitude <= 180.0
    }

    fn to_geo(self) -> Point<f64> {
        Point::new(self.longitude, self.latitude)
    }
}

/// Bounding box of a track.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct Bounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl Bounds {
    /// Create bounds from GPS points.
    pub fn from_points(points: &[GpsPoint]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        let mut min_lat = f64::MAX;
        let mut max_lat = f64::MIN;
        let mut min_lng = f64::MAX;
        let mut max_lng = f64::MIN;

        for p in points {
            min_lat = min_lat.min(p.latitude);
            max_lat = max_lat.max(p.latitude);
            min_lng = min_lng.min(p.longitude);
            max_lng = max_lng.max(p.longitude);
        }

        Some(Self {
            min_lat,
            max_lat,
            min_lng,
            max_lng,
        })
    }

    /// Get the center point of the bounds.
    pub fn center(&self) -> GpsPoint {
        GpsPoint::new(
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lng + self.max_lng) / 2.0,
        )
    }
}

/// Convert a stored coordinate pair to degrees, detecting semicircles.
pub fn coordinates_to_degrees(lat: f64, lon: f64) -> (f64, f64) {
    if lat.abs() <= 180.0 && lon.abs() <= 180.0 {
        (lat, lon)
    } else {
        (semicircles_to_degrees(lat), semicircles_to_degrees(lon))
    }
}

/// Convert raw records to validated GPS points, preserving order.
///
/// Records without both coordinates, or whose converted coordinates are out
/// of range, are skipped.
pub fn normalize(records: &[RawRecord]) -> Vec<GpsPoint> {
    let points: Vec<GpsPoint> = records
        .iter()
        .filter_map(|record| {
            let (lat, lon) =
                coordinates_to_degrees(record.position_lat?, record.position_long?);
            let point = GpsPoint {
                latitude: lat,
                longitude: lon,
                altitude: record.altitude,
                timestamp: record.timestamp,
            };
            point.is_valid().then_some(point)
        })
        .collect();

    if points.len() < records.len() {
        debug!(
            "[Gps] Kept {} of {} records ({} without a valid position)",
            points.len(),
            records.len(),
            records.len() - points.len()
        );
    }
    points
}

/// Reduce a track to at most `max_points` points for rendering.
///
/// The first and last points are always kept; intermediate points are taken
/// at a fixed stride of `(count - 2) / (max_points - 2)`. The output depends
/// only on the input, so repeated calls return identical tracks.
pub fn decimate(points: &[GpsPoint], max_points: usize) -> Vec<GpsPoint> {
    let count = points.len();
    if count <= max_points {
        return points.to_vec();
    }
    match max_points {
        0 => return Vec::new(),
        1 => return vec![points[0]],
        _ => {}
    }

    let inner = max_points - 2;
    let stride = (count - 2) as f64 / inner as f64;

    let mut out = Vec::with_capacity(max_points);
    out.push(points[0]);
    // stride > 1 here, so indices are strictly increasing and stay below count - 1
    out.extend((0..inner).map(|i| points[1 + (i as f64 * stride) as usize]));
    out.push(points[count - 1]);
    out
}

/// Great-circle length of a track in meters.
pub fn track_length(points: &[GpsPoint]) -> f64 {
    points
        .windows(2)
        .map(|pair| Haversine::distance(pair[0].to_geo(), pair[1].to_geo()))
        .sum()
}

/// A normalized track ready for the map screen.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct GpsTrack {
    /// Every valid point, in stream order
    pub points: Vec<GpsPoint>,
    /// Decimated points for rendering
    pub map_points: Vec<GpsPoint>,
    pub bounds: Option<Bounds>,
    pub center: Option<GpsPoint>,
    /// Meters along the full track
    pub length: f64,
    pub altitude_min: Option<f64>,
    pub altitude_max: Option<f64>,
}

impl GpsTrack {
    pub fn from_records(records: &[RawRecord], max_map_points: usize) -> Self {
        Self::from_points(normalize(records), max_map_points)
    }

    pub fn from_points(points: Vec<GpsPoint>, max_map_points: usize) -> Self {
        let bounds = Bounds::from_points(&points);
        let altitudes = || points.iter().filter_map(|p| p.altitude);
        let altitude_min = altitudes().reduce(f64::min);
        let altitude_max = altitudes().reduce(f64::max);

        Self {
            map_points: decimate(&points, max_map_points),
            center: bounds.map(|b| b.center()),
            length: track_length(&points),
            bounds,
            altitude_min,
            altitude_max,
            points,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::SEMICIRCLES_PER_180_DEG;

    fn record(lat: f64, lon: f64) -> RawRecord {
        RawRecord {
            position_lat: Some(lat),
            position_long: Some(lon),
            ..Default::default()
        }
    }

    fn to_semicircles(degrees: f64) -> f64 {
        (degrees / 180.0 * SEMICIRCLES_PER_180_DEG).round()
    }

    fn line(n: usize) -> Vec<GpsPoint> {
        (0..n)
            .map(|i| GpsPoint::new(45.0 + i as f64 * 1e-4, 6.0))
            .collect()
    }

    #[test]
    fn test_gps_point_validation() {
        assert!(GpsPoint::new(51.5074, -0.1278).is_valid());
        assert!(!GpsPoint::new(91.0, 0.0).is_valid());
        assert!(!GpsPoint::new(0.0, 181.0).is_valid());
        assert!(!GpsPoint::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn test_degrees_pass_through() {
        let points = normalize(&[record(48.8566, 2.3522)]);
        assert_eq!(points, vec![GpsPoint::new(48.8566, 2.3522)]);
    }

    #[test]
    fn test_semicircles_converted() {
        let points = normalize(&[record(to_semicircles(48.8566), to_semicircles(2.3522))]);
        assert_eq!(points.len(), 1);
        assert!((points[0].latitude - 48.8566).abs() < 1e-6);
        assert!((points[0].longitude - 2.3522).abs() < 1e-6);
    }

    #[test]
    fn test_out_of_range_dropped() {
        let records = vec![
            record(to_semicircles(95.0), to_semicircles(10.0)),
            record(95.0, 10.0),
            record(45.0, 7.0),
            RawRecord {
                position_lat: Some(45.0),
                ..Default::default()
            },
        ];
        let points = normalize(&records);
        assert_eq!(points, vec![GpsPoint::new(45.0, 7.0)]);
    }

    #[test]
    fn test_normalize_preserves_order_and_extras() {
        let mut first = record(45.0, 6.0);
        first.altitude = Some(410.0);
        first.timestamp = Some(1_700_000_000);
        let points = normalize(&[first, record(200.0, 0.0), record(45.1, 6.1)]);
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].altitude, Some(410.0));
        assert_eq!(points[0].timestamp, Some(1_700_000_000));
        assert_eq!(points[1].latitude, 45.1);
    }

    #[test]
    fn test_decimate_bounds_and_endpoints() {
        let points = line(100);
        let out = decimate(&points, 10);
        assert!(out.len() <= 10);
        assert_eq!(out[0], points[0]);
        assert_eq!(out[out.len() - 1], points[99]);
        assert_eq!(out, decimate(&points, 10));
    }

    #[test]
    fn test_decimate_strictly_increasing() {
        let points = line(1000);
        let out = decimate(&points, 37);
        assert_eq!(out.len(), 37);
        assert!(out.windows(2).all(|w| w[1].latitude > w[0].latitude));
    }

    #[test]
    fn test_decimate_small_inputs() {
        let points = line(5);
        assert_eq!(decimate(&points, 10), points);
        assert_eq!(decimate(&points, 2), vec![points[0], points[4]]);
        assert_eq!(decimate(&points, 1), vec![points[0]]);
        assert!(decimate(&points, 0).is_empty());
        assert!(decimate(&[], 10).is_empty());
    }

    #[test]
    fn test_track_summary() {
        let mut points = line(11);
        points[3].altitude = Some(300.0);
        points[7].altitude = Some(340.0);
        let track = GpsTrack::from_points(points, 5);

        assert_eq!(track.map_points.len(), 5);
        // 10 steps of 1e-4 degrees latitude is about 111 m
        assert!((track.length - 111.2).abs() < 1.0);
        assert_eq!(track.altitude_min, Some(300.0));
        assert_eq!(track.altitude_max, Some(340.0));
        let center = track.center.unwrap();
        assert!((center.latitude - 45.0005).abs() < 1e-9);
    }

    #[test]
    fn test_empty_track() {
        let track = GpsTrack::from_records(&[], 100);
        assert!(track.is_empty());
        assert_eq!(track.bounds, None);
        assert_eq!(track.length, 0.0);
    }
}
