//! Trash prediction service
//!
//! Runs the debris pipeline: fetch current and wind observations, derive
//! the feature vector, score it with the regression model and classify.

use std::sync::Arc;

use chrono::{Duration, NaiveDateTime, Utc};
use futures::future::join_all;
use shared::{BeachEntry, FeatureVector, GpsCoordinates, PredictionResult};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::external::{ObservationSource, TidalCurrentClient, WindClient};
use crate::models::regression::ModelStore;

/// Korea Standard Time offset; KHOA timestamps are local
pub const KST_OFFSET_HOURS: i64 = 9;

/// Current wall-clock time in Korea
pub fn now_kst() -> NaiveDateTime {
    Utc::now().naive_utc() + Duration::hours(KST_OFFSET_HOURS)
}

/// Prediction for one beach of a batch run
#[derive(Debug, Clone, PartialEq)]
pub struct BeachPrediction {
    pub beach: BeachEntry,
    pub result: PredictionResult,
}

/// Trash prediction service
#[derive(Clone)]
pub struct TrashService {
    current: Arc<dyn ObservationSource>,
    wind: Arc<dyn ObservationSource>,
    model: Arc<ModelStore>,
}

impl TrashService {
    /// Create a service from explicit collaborators
    pub fn new(
        current: Arc<dyn ObservationSource>,
        wind: Arc<dyn ObservationSource>,
        model: Arc<ModelStore>,
    ) -> Self {
        Self {
            current,
            wind,
            model,
        }
    }

    /// Create a service backed by the KHOA APIs and the configured model file
    pub fn from_config(config: &Config) -> AppResult<Self> {
        Ok(Self::new(
            Arc::new(TidalCurrentClient::new(&config.khoa)?),
            Arc::new(WindClient::new(&config.khoa)?),
            Arc::new(ModelStore::new(config.model.path.clone())),
        ))
    }

    /// Fetch both observations concurrently and derive the model input
    pub async fn build_features(
        &self,
        timestamp: NaiveDateTime,
        location: GpsCoordinates,
    ) -> AppResult<FeatureVector> {
        let (current, wind) = tokio::try_join!(
            self.current.fetch(timestamp, location),
            self.wind.fetch(timestamp, location),
        )?;

        tracing::debug!(
            current_dir = current.direction_deg,
            current_speed = current.speed,
            wind_dir = wind.direction_deg,
            wind_speed = wind.speed,
            "Observations fetched"
        );

        Ok(FeatureVector::build(&timestamp, &current, &wind))
    }

    /// Predict debris for one point in time and space
    pub async fn predict(
        &self,
        timestamp: NaiveDateTime,
        location: GpsCoordinates,
    ) -> AppResult<PredictionResult> {
        let features = self.build_features(timestamp, location).await?;
        let result = self.model.predict(&features).await?;

        tracing::info!(
            latitude = location.latitude,
            longitude = location.longitude,
            date = %timestamp.date(),
            trash_amount = result.trash_amount,
            status = %result.status,
            "Trash predicted"
        );

        Ok(result)
    }

    /// Predict every beach at the same timestamp.
    ///
    /// Failed beaches are logged and left out; the remaining results keep
    /// registry order. Fails only when no beach succeeds.
    pub async fn predict_beaches(
        &self,
        beaches: &[BeachEntry],
        timestamp: NaiveDateTime,
    ) -> AppResult<Vec<BeachPrediction>> {
        let outcomes = join_all(
            beaches
                .iter()
                .map(|beach| self.predict(timestamp, beach.coordinates())),
        )
        .await;

        let mut predictions = Vec::with_capacity(beaches.len());
        for (beach, outcome) in beaches.iter().zip(outcomes) {
            match outcome {
                Ok(result) => predictions.push(BeachPrediction {
                    beach: *beach,
                    result,
                }),
                Err(e) => {
                    tracing::warn!(beach = beach.name, error = %e, "Beach prediction failed, skipping");
                }
            }
        }

        if predictions.is_empty() {
            return Err(AppError::AllSitesFailed {
                attempted: beaches.len(),
            });
        }

        Ok(predictions)
    }
}
