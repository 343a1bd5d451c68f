//! KHOA tidal current area client
//!
//! Queries the predicted tidal currents inside the whole-degree cell around
//! a point and averages every grid sample the API returns.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest::Client;
use shared::{BoundingBox, GpsCoordinates, ObservationSample};

use super::{
    average_fields, build_http_client, data_items, read_json, require_api_key, ObservationSource,
};
use crate::config::KhoaConfig;
use crate::error::{AppError, AppResult};

const API_NAME: &str = "current";

/// Tidal current API client
#[derive(Clone)]
pub struct TidalCurrentClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl TidalCurrentClient {
    /// Create a client from the KHOA configuration
    pub fn new(config: &KhoaConfig) -> AppResult<Self> {
        Ok(Self {
            client: build_http_client(config.timeout_secs)?,
            api_key: config.api_key.clone(),
            base_url: config.current_endpoint.clone(),
        })
    }

    /// Create a client against a custom endpoint (for testing)
    pub fn with_base_url(api_key: Option<String>, base_url: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url,
        }
    }

    /// Query string for one request, in the order the API documents it
    pub fn query_params(
        api_key: &str,
        timestamp: &NaiveDateTime,
        bbox: &BoundingBox,
    ) -> Vec<(&'static str, String)> {
        vec![
            ("ServiceKey", api_key.to_string()),
            ("Date", timestamp.format("%Y%m%d").to_string()),
            ("Hour", timestamp.format("%H").to_string()),
            ("Minute", timestamp.format("%M").to_string()),
            ("MaxX", bbox.max_lon.to_string()),
            ("MinX", bbox.min_lon.to_string()),
            ("MaxY", bbox.max_lat.to_string()),
            ("MinY", bbox.min_lat.to_string()),
            ("ResultType", "json".to_string()),
        ]
    }

    /// Mean current direction and speed around a point at a given time
    pub async fn fetch_current(
        &self,
        timestamp: NaiveDateTime,
        latitude: f64,
        longitude: f64,
    ) -> AppResult<ObservationSample> {
        let api_key = require_api_key(self.api_key.as_deref())?;

        let bbox = BoundingBox::enclosing(latitude, longitude);
        let params = Self::query_params(api_key, &timestamp, &bbox);

        tracing::debug!(
            date = %timestamp,
            min_lat = bbox.min_lat,
            max_lat = bbox.max_lat,
            min_lon = bbox.min_lon,
            max_lon = bbox.max_lon,
            "Requesting tidal currents"
        );

        let response = self
            .client
            .get(&self.base_url)
            .query(&params)
            .send()
            .await
            .map_err(|e| AppError::upstream_unreachable(API_NAME, e))?;

        let body = read_json(API_NAME, response).await?;
        summarize_current_body(&body)
    }
}

/// Average `current_dir`/`current_speed` over a parsed response body
pub fn summarize_current_body(body: &serde_json::Value) -> AppResult<ObservationSample> {
    let items = data_items(API_NAME, body)?;
    average_fields(API_NAME, &items, "current_dir", "current_speed")
}

#[async_trait]
impl ObservationSource for TidalCurrentClient {
    async fn fetch(
        &self,
        timestamp: NaiveDateTime,
        location: GpsCoordinates,
    ) -> AppResult<ObservationSample> {
        self.fetch_current(timestamp, location.latitude, location.longitude)
            .await
    }

    fn name(&self) -> &'static str {
        API_NAME
    }
}
