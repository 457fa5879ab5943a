//! Training-load insights computed by the backend.
//!
//! CTL, ATL and TSB are produced server-side; this module only reads them
//! from a payload and labels the resulting form.

use crate::raw::RawActivity;
use serde::{Deserialize, Serialize};

const CTL_PATHS: &[&str] = &["insights.ctl", "ctl", "fitness", "chronic_training_load"];
const ATL_PATHS: &[&str] = &["insights.atl", "atl", "fatigue", "acute_training_load"];
const TSB_PATHS: &[&str] = &["insights.tsb", "tsb", "form", "training_stress_balance"];

/// Form band derived from TSB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Enum))]
#[serde(rename_all = "snake_case")]
pub enum FormState {
    /// TSB > 25
    Transition,
    /// 5 < TSB <= 25
    Fresh,
    /// -10 < TSB <= 5
    Neutral,
    /// -30 < TSB <= -10
    Optimal,
    /// TSB <= -30
    HighRisk,
}

impl FormState {
    pub fn from_tsb(tsb: f64) -> Self {
        if tsb > 25.0 {
            FormState::Transition
        } else if tsb > 5.0 {
            FormState::Fresh
        } else if tsb > -10.0 {
            FormState::Neutral
        } else if tsb > -30.0 {
            FormState::Optimal
        } else {
            FormState::HighRisk
        }
    }
}

/// CTL/ATL/TSB as reported by the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct SessionInsights {
    pub ctl: Option<f64>,
    pub atl: Option<f64>,
    pub tsb: Option<f64>,
    pub form: Option<FormState>,
}

impl SessionInsights {
    pub fn from_raw(raw: &RawActivity) -> Self {
        let first = |paths: &[&str]| paths.iter().find_map(|path| raw.number(path));
        let tsb = first(TSB_PATHS);
        Self {
            ctl: first(CTL_PATHS),
            atl: first(ATL_PATHS),
            tsb,
            form: tsb.map(FormState::from_tsb),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.ctl.is_none() && self.atl.is_none() && self.tsb.is_none()
    }
}
