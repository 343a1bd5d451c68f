//! Averaged current and wind observations

use serde::{Deserialize, Serialize};

use super::features::{decompose, VectorComponents};

/// Mean direction and speed over every usable sample of one upstream query.
///
/// Direction is in degrees using the upstream 0-360 convention; samples
/// straddling north are averaged arithmetically, without wrap handling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObservationSample {
    pub direction_deg: f64,
    pub speed: f64,
}

impl ObservationSample {
    pub fn new(direction_deg: f64, speed: f64) -> Self {
        Self {
            direction_deg,
            speed,
        }
    }

    /// Arithmetic mean of `(direction, speed)` pairs, `None` when there are none
    pub fn mean_of<I>(samples: I) -> Option<Self>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let (count, total_dir, total_speed) = samples
            .into_iter()
            .fold((0usize, 0.0, 0.0), |(n, d, s), (dir, speed)| {
                (n + 1, d + dir, s + speed)
            });

        if count == 0 {
            return None;
        }

        let n = count as f64;
        Some(Self::new(total_dir / n, total_speed / n))
    }

    /// Eastward/northward components of this observation
    pub fn components(&self) -> VectorComponents {
        decompose(self.direction_deg, self.speed)
    }
}
