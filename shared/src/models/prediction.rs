//! Prediction results and severity classification

use serde::{Deserialize, Serialize};

use crate::types::GpsCoordinates;

/// Lower bound (inclusive) of the MEDIUM band
pub const MEDIUM_THRESHOLD: f64 = 100.0;

/// Lower bound (inclusive) of the HIGH band
pub const HIGH_THRESHOLD: f64 = 300.0;

/// Coarse debris severity
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum TrashStatus {
    Low,
    Medium,
    High,
}

impl TrashStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrashStatus::Low => "LOW",
            TrashStatus::Medium => "MEDIUM",
            TrashStatus::High => "HIGH",
        }
    }
}

impl std::fmt::Display for TrashStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a predicted amount into a severity band.
///
/// Bands are half-open with inclusive lower bounds: `[.., 100)`,
/// `[100, 300)`, `[300, ..]`. NaN falls through to HIGH.
pub fn classify_trash_amount(trash_amount: f64) -> TrashStatus {
    if trash_amount < MEDIUM_THRESHOLD {
        TrashStatus::Low
    } else if trash_amount < HIGH_THRESHOLD {
        TrashStatus::Medium
    } else {
        TrashStatus::High
    }
}

/// Model output with its severity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub trash_amount: f64,
    pub status: TrashStatus,
}

impl PredictionResult {
    pub fn from_amount(trash_amount: f64) -> Self {
        Self {
            trash_amount,
            status: classify_trash_amount(trash_amount),
        }
    }
}

/// `prediction` object of the API responses
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Prediction {
    #[serde(rename = "trashAmount")]
    pub trash_amount: f64,
}

/// Response of the single-point prediction endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictResponse {
    /// Requested date as `YYYY-MM-DD`
    pub date: String,
    pub location: GpsCoordinates,
    pub prediction: Prediction,
    pub status: TrashStatus,
}

/// One entry of the beach batch response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BeachPredictResponse {
    pub name: String,
    pub date: String,
    pub location: GpsCoordinates,
    pub prediction: Prediction,
    pub status: TrashStatus,
}
