//! # Activity Metrics
//!
//! Activity-metrics derivation and normalization for the coaching apps.
//!
//! This library provides:
//! - Canonical metric resolution from loosely-shaped backend payloads
//! - Discipline-aware derived metrics (pace, IF, W/kg, VAM, cadence)
//! - GPS normalization (semicircles, validation, decimation)
//! - Time-in-zone breakdowns, lap comparison, power and pace curves
//! - Logbook totals and the save/load round trip
//!
//! ## Features
//!
//! - **`parallel`** - Enable parallel processing with rayon
//! - **`ffi`** - Enable FFI bindings for mobile platforms (iOS/Android)
//! - **`full`** - Enable all features
//!
//! ## Quick Start
//!
//! ```rust
//! use activity_metrics::{analyze_activity, Discipline, MetricsConfig, RawActivity};
//!
//! let raw = RawActivity::from_json(
//!     r#"{"sport": "Course à pied", "duration": 3000, "file_datas": {"avg_speed": 12.0}}"#,
//! )
//! .unwrap();
//!
//! let analysis = analyze_activity(&raw, &MetricsConfig::default());
//! assert_eq!(analysis.discipline, Discipline::Running);
//!
//! let pace = analysis.derived.pace.unwrap();
//! assert_eq!(pace.format(), "5:00 /km");
//! ```

// Unified error handling
pub mod error;
pub use error::{MetricsError, OptionExt, Result};

// Unit conversion and display formatting
pub mod units;
pub use units::{
    format_distance, format_duration, format_heart_rate, format_pace, format_power, format_speed,
    PaceUnit,
};

// Raw payload access
pub mod raw;
pub use raw::{RawActivity, RawRecord};

// Sport label classification
pub mod discipline;
pub use discipline::{classify, Discipline};

// Field resolution chain
pub mod resolve;
pub use resolve::{resolve, resolve_sport_label, CanonicalMetrics, MetricKey};

// Derived metrics
pub mod derived;
pub use derived::{
    cadence_display, intensity_factor, pace, vam, watts_per_kg, DerivedMetrics, Pace,
};

// GPS normalization and track summary
pub mod gps;
pub use gps::{decimate, normalize, Bounds, GpsPoint, GpsTrack};

// Per-sample streams
pub mod streams;
pub use streams::SampleStreams;

// Time-in-zone aggregation
pub mod zones;
pub use zones::{aggregate_zones, ZoneBreakdown, ZoneShare, ZoneTime};

// Lap comparison
pub mod laps;
pub use laps::{compute_lap_context, lap_ratio, LapContext, LapRatio, LapRecord};

// Power and pace curves
pub mod curves;
pub use curves::{compute_pace_curve, compute_power_curve, PaceCurve, PowerCurve};
#[cfg(feature = "parallel")]
pub use curves::compute_power_curve_parallel;

// Training-load insights from the backend
pub mod insights;
pub use insights::{FormState, SessionInsights};

// Logbook totals and persistence boundary
pub mod logbook;
pub use logbook::{
    hydration_total, load_logbook, nutrition_totals, store_logbook, HydrationItem, Logbook,
    LogbookStore, LogbookTotals, MemoryLogbookStore, NutritionItem, NutritionTotals,
};

// Pipeline configuration
pub mod config;
pub use config::MetricsConfig;

// Full analysis pipeline
pub mod analyze;
pub use analyze::{analyze_activity, ActivityAnalysis};

// FFI bindings for mobile platforms
#[cfg(feature = "ffi")]
pub mod ffi;

#[cfg(feature = "ffi")]
uniffi::setup_scaffolding!();

/// Initialize logging for Android
#[cfg(all(feature = "ffi", target_os = "android"))]
pub(crate) fn init_logging() {
    use android_logger::Config;
    use log::LevelFilter;

    android_logger::init_once(
        Config::default()
            .with_max_level(LevelFilter::Debug)
            .with_tag("ActivityMetrics"),
    );
}

#[cfg(all(feature = "ffi", not(target_os = "android")))]
pub(crate) fn init_logging() {
    // No-op on non-Android platforms
}
