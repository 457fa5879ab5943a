//! FFI bindings for mobile platforms (iOS/Android).
//!
//! This module provides the UniFFI bindings that expose Rust functionality
//! to Kotlin and Swift. All FFI functions are prefixed with `ffi_` to avoid
//! naming conflicts with the internal API. Payloads cross the boundary as
//! JSON strings; failures come back as `{"error": "..."}`.

use crate::analyze::analyze_activity_json;
use crate::error::{MetricsError, OptionExt, Result};
use crate::logbook::{LogbookTotals, TimelineEntry};
use crate::{classify, init_logging, Discipline, GpsTrack, Logbook, RawActivity, RawRecord};
use log::{info, warn};
use serde::Serialize;
use serde_json::{json, Value};

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
}

fn error_json(context: &str, error: &MetricsError) -> String {
    warn!("[ActivityMetrics] {} failed: {}", context, error);
    json!({ "error": error.to_string() }).to_string()
}

/// Run the full analysis on an activity payload.
///
/// # Arguments
/// * `activity_json` - Raw activity/session payload from the backend
/// * `config_json` - `MetricsConfig` as JSON, or an empty string for defaults
///
/// # Returns
/// JSON string with the `ActivityAnalysis`
#[uniffi::export]
pub fn ffi_analyze_activity(activity_json: String, config_json: String) -> String {
    init_logging();
    info!(
        "[ActivityMetrics] analyze_activity: {} bytes",
        activity_json.len()
    );
    match analyze_activity_json(&activity_json, &config_json) {
        Ok(out) => out,
        Err(e) => error_json("analyze_activity", &e),
    }
}

/// Classify a free-text sport label. Unknown or missing labels give `Other`.
#[uniffi::export]
pub fn ffi_classify_sport(label: Option<String>) -> Discipline {
    classify(label.as_deref())
}

/// Normalize and decimate a GPS track.
///
/// # Arguments
/// * `records_json` - Either an array of raw records or a full activity payload
/// * `max_points` - Maximum points in the decimated map polyline
///
/// # Returns
/// JSON string with the `GpsTrack`
#[uniffi::export]
pub fn ffi_normalize_track(records_json: String, max_points: u32) -> String {
    init_logging();
    match records_from_json(&records_json) {
        Ok(records) => {
            let track = GpsTrack::from_records(&records, max_points as usize);
            info!(
                "[ActivityMetrics] normalize_track: {} records -> {} points ({} on map)",
                records.len(),
                track.points.len(),
                track.map_points.len()
            );
            to_json(&track)
        }
        Err(e) => error_json("normalize_track", &e),
    }
}

fn records_from_json(text: &str) -> Result<Vec<RawRecord>> {
    let value: Value =
        serde_json::from_str(text).map_err(|source| MetricsError::InvalidPayload {
            what: "records",
            source,
        })?;
    match value {
        Value::Array(items) => Ok(items.iter().map(RawRecord::from_value).collect()),
        other => Some(other)
            .filter(Value::is_object)
            .map(|v| RawActivity::new(v).records())
            .ok_or_malformed("records", "expected an array or an object"),
    }
}

#[derive(Serialize)]
struct LogbookSummary {
    totals: LogbookTotals,
    timeline: Vec<TimelineEntry>,
}

/// Recompute logbook totals.
///
/// # Returns
/// JSON string with `LogbookTotals` and the timed-item timeline
#[uniffi::export]
pub fn ffi_logbook_totals(logbook_json: String) -> String {
    init_logging();
    match Logbook::from_json(&logbook_json) {
        Ok(logbook) => to_json(&LogbookSummary {
            totals: logbook.totals(),
            timeline: logbook.timeline(),
        }),
        Err(e) => error_json("logbook_totals", &e),
    }
}

/// Format a duration in seconds as `m:ss` or `h:mm:ss`.
#[uniffi::export]
pub fn ffi_format_duration(seconds: f64) -> String {
    crate::format_duration(seconds)
}
