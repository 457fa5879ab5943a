//! Per-channel sample streams.
//!
//! Splits the record list into aligned channels (one slot per record, 1 Hz
//! assumed) for time-in-zone counting and the power/pace curves. Gaps stay
//! `None` so every channel keeps the same length as the record list.

use crate::raw::RawRecord;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SampleStreams {
    /// Watts
    pub power: Vec<Option<f64>>,
    /// bpm
    pub heart_rate: Vec<Option<f64>>,
    /// As stored by the device
    pub cadence: Vec<Option<f64>>,
    /// km/h
    pub speed: Vec<Option<f64>>,
    /// Cumulative meters
    pub distance: Vec<Option<f64>>,
}

impl SampleStreams {
    pub fn from_records(records: &[RawRecord]) -> Self {
        let channel = |pick: fn(&RawRecord) -> Option<f64>| -> Vec<Option<f64>> {
            records.iter().map(pick).collect()
        };
        Self {
            power: channel(|r| r.power),
            heart_rate: channel(|r| r.heart_rate),
            cadence: channel(|r| r.cadence),
            speed: channel(|r| r.speed),
            distance: channel(|r| r.distance),
        }
    }

    pub fn len(&self) -> usize {
        self.power.len()
    }

    pub fn is_empty(&self) -> bool {
        self.power.is_empty()
    }

    pub fn has_power(&self) -> bool {
        self.power.iter().any(Option::is_some)
    }

    pub fn has_heart_rate(&self) -> bool {
        self.heart_rate.iter().any(Option::is_some)
    }

    /// Cumulative distance with gaps carried forward from the last known value.
    ///
    /// Leading gaps count as 0 m.
    pub fn filled_distance(&self) -> Vec<f64> {
        let mut last = 0.0;
        self.distance
            .iter()
            .map(|d| {
                if let Some(v) = d {
                    last = *v;
                }
                last
            })
            .collect()
    }
}
