//! One-shot analysis of an activity payload.
//!
//! Runs every stage once, in dependency order: classify the sport, resolve the
//! canonical metrics, derive secondary values, then build the zone, lap, track,
//! curve and insight views. Later stages only read [`CanonicalMetrics`] and the
//! parsed record list, never the raw payload fields again.

use crate::config::MetricsConfig;
use crate::curves::{compute_pace_curve, PaceCurve, PowerCurve};
use crate::derived::DerivedMetrics;
use crate::discipline::{classify, Discipline};
use crate::error::{MetricsError, Result};
use crate::gps::GpsTrack;
use crate::insights::SessionInsights;
use crate::laps::{analyze_laps, LapContext, LapRecord, LapSummary};
use crate::raw::RawActivity;
use crate::resolve::{resolve_sport_label, CanonicalMetrics};
use crate::streams::SampleStreams;
use crate::zones::{aggregate_zones, zone_times_from_raw, ZoneBreakdown, ZoneKind};
use log::{debug, info};
use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel")]
use crate::curves::compute_power_curve_parallel as best_power_curve;
#[cfg(not(feature = "parallel"))]
use crate::curves::compute_power_curve as best_power_curve;
#[cfg(feature = "parallel")]
use crate::zones::time_in_zones_parallel as time_in_zones;
#[cfg(not(feature = "parallel"))]
use crate::zones::time_in_zones;

/// Everything the session screen needs, computed from one payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct ActivityAnalysis {
    pub discipline: Discipline,
    pub sport_label: Option<String>,
    pub canonical: CanonicalMetrics,
    pub derived: DerivedMetrics,
    pub hr_zones: Option<ZoneBreakdown>,
    pub power_zones: Option<ZoneBreakdown>,
    pub lap_context: LapContext,
    pub laps: Vec<LapSummary>,
    pub track: GpsTrack,
    pub power_curve: Option<PowerCurve>,
    pub pace_curve: Option<PaceCurve>,
    pub insights: SessionInsights,
}

/// Analyze one activity. Never fails: missing inputs leave their outputs absent.
pub fn analyze_activity(raw: &RawActivity, config: &MetricsConfig) -> ActivityAnalysis {
    let sport_label = resolve_sport_label(raw).map(str::to_string);
    let discipline = classify(sport_label.as_deref());
    let canonical = CanonicalMetrics::from_raw(raw);
    let derived = DerivedMetrics::compute(&canonical, discipline);

    let records = raw.records();
    let streams = SampleStreams::from_records(&records);

    let hr_zones = zone_breakdown(
        raw,
        ZoneKind::HeartRate,
        &streams.heart_rate,
        config.hr_zone_bounds.as_deref(),
    );
    let power_zones = zone_breakdown(
        raw,
        ZoneKind::Power,
        &streams.power,
        config.power_zone_bounds.as_deref(),
    );

    let lap_records = LapRecord::list_from_raw(raw);
    let (lap_context, laps) = analyze_laps(&lap_records, discipline);

    let track = GpsTrack::from_records(&records, config.max_map_points as usize);

    let power_curve = streams
        .has_power()
        .then(|| best_power_curve(&streams.power, &config.power_curve_durations));

    let pace_targets: Option<&[f64]> = match discipline {
        Discipline::Running => Some(config.pace_curve_distances.as_slice()),
        Discipline::Swimming => Some(config.swim_pace_curve_distances.as_slice()),
        Discipline::Cycling | Discipline::Other => None,
    };
    let pace_curve = pace_targets
        .filter(|_| streams.distance.iter().any(Option::is_some))
        .map(|targets| compute_pace_curve(&streams.filled_distance(), targets));

    let insights = SessionInsights::from_raw(raw);

    info!(
        "[Analyze] {} activity: {} metrics resolved, {} records, {} laps, {} track points",
        discipline,
        canonical.resolved_count(),
        records.len(),
        laps.len(),
        track.points.len()
    );

    ActivityAnalysis {
        discipline,
        sport_label,
        canonical,
        derived,
        hr_zones,
        power_zones,
        lap_context,
        laps,
        track,
        power_curve,
        pace_curve,
        insights,
    }
}

/// Backend time-in-zone when present, otherwise counted from the stream.
fn zone_breakdown(
    raw: &RawActivity,
    kind: ZoneKind,
    stream: &[Option<f64>],
    bounds: Option<&[f64]>,
) -> Option<ZoneBreakdown> {
    if let Some(times) = zone_times_from_raw(raw, kind) {
        debug!("[Analyze] {:?} zones from payload ({} entries)", kind, times.len());
        return Some(aggregate_zones(&times));
    }
    let bounds = bounds?;
    if !stream.iter().any(Option::is_some) {
        return None;
    }
    debug!("[Analyze] {:?} zones from {} samples", kind, stream.len());
    Some(aggregate_zones(&time_in_zones(stream, bounds)))
}

/// JSON in, JSON out. An empty `config_json` means the default config.
pub fn analyze_activity_json(activity_json: &str, config_json: &str) -> Result<String> {
    let raw = RawActivity::from_json(activity_json)?;
    let config = if config_json.trim().is_empty() {
        MetricsConfig::default()
    } else {
        MetricsConfig::from_json(config_json)?
    };
    let analysis = analyze_activity(&raw, &config);
    serde_json::to_string(&analysis).map_err(MetricsError::from)
}
