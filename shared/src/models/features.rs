//! Feature derivation for the debris regression model
//!
//! The trained model expects nine inputs in a fixed order. The order is not
//! stored with the model weights, so [`FEATURE_NAMES`] and
//! [`FeatureVector::to_array`] must stay in lockstep with the training data.

use std::f64::consts::PI;

use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::observation::ObservationSample;

/// Number of model inputs
pub const FEATURE_COUNT: usize = 9;

/// Column names in the order the model was fit on
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "dayofyear",
    "day_sin",
    "day_cos",
    "wind_speed",
    "current_speed",
    "wind_u",
    "wind_v",
    "current_u",
    "current_v",
];

/// Seasonal period used by the sin/cos encoding.
///
/// Leap years are not normalised: day 366 is encoded against 365 as well,
/// matching what the model saw during training.
pub const SEASON_PERIOD_DAYS: f64 = 365.0;

/// Orthogonal components of a direction/speed pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VectorComponents {
    pub u: f64,
    pub v: f64,
}

/// Split a (direction, speed) pair into `u = s·cos θ` and `v = s·sin θ`
pub fn decompose(direction_deg: f64, speed: f64) -> VectorComponents {
    let rad = direction_deg.to_radians();
    VectorComponents {
        u: speed * rad.cos(),
        v: speed * rad.sin(),
    }
}

/// Day-of-year with its cyclic encoding
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeasonalEncoding {
    pub day_of_year: u32,
    pub day_sin: f64,
    pub day_cos: f64,
}

impl SeasonalEncoding {
    pub fn from_day_of_year(day_of_year: u32) -> Self {
        let angle = 2.0 * PI * f64::from(day_of_year) / SEASON_PERIOD_DAYS;
        Self {
            day_of_year,
            day_sin: angle.sin(),
            day_cos: angle.cos(),
        }
    }

    pub fn for_date(date: &NaiveDateTime) -> Self {
        Self::from_day_of_year(date.ordinal())
    }
}

/// Model input, one named field per column
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub dayofyear: f64,
    pub day_sin: f64,
    pub day_cos: f64,
    pub wind_speed: f64,
    pub current_speed: f64,
    pub wind_u: f64,
    pub wind_v: f64,
    pub current_u: f64,
    pub current_v: f64,
}

impl FeatureVector {
    /// Assemble the model input from a timestamp and the two observations
    pub fn build(
        date: &NaiveDateTime,
        current: &ObservationSample,
        wind: &ObservationSample,
    ) -> Self {
        let season = SeasonalEncoding::for_date(date);
        let current_vec = current.components();
        let wind_vec = wind.components();

        Self {
            dayofyear: f64::from(season.day_of_year),
            day_sin: season.day_sin,
            day_cos: season.day_cos,
            wind_speed: wind.speed,
            current_speed: current.speed,
            wind_u: wind_vec.u,
            wind_v: wind_vec.v,
            current_u: current_vec.u,
            current_v: current_vec.v,
        }
    }

    /// Values in [`FEATURE_NAMES`] order
    pub fn to_array(&self) -> [f64; FEATURE_COUNT] {
        [
            self.dayofyear,
            self.day_sin,
            self.day_cos,
            self.wind_speed,
            self.current_speed,
            self.wind_u,
            self.wind_v,
            self.current_u,
            self.current_v,
        ]
    }
}
