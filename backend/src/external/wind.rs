//! KHOA tide station wind client
//!
//! Wind is observed at the tide stations rather than on a grid, so the
//! request goes to the station nearest the point. The endpoint serves the
//! latest observation only; the requested timestamp is logged but not sent.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest::Client;
use shared::{find_nearest_site, GpsCoordinates, ObservationSample, ObservationSite};

use super::{
    average_fields, build_http_client, data_items, read_json, require_api_key, ObservationSource,
};
use crate::config::KhoaConfig;
use crate::error::{AppError, AppResult};

const API_NAME: &str = "wind";

/// Tide station wind API client
#[derive(Clone)]
pub struct WindClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl WindClient {
    /// Create a client from the KHOA configuration
    pub fn new(config: &KhoaConfig) -> AppResult<Self> {
        Ok(Self {
            client: build_http_client(config.timeout_secs)?,
            api_key: config.api_key.clone(),
            base_url: config.wind_endpoint.clone(),
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

    pub fn query_params(api_key: &str, site: &ObservationSite) -> Vec<(&'static str, String)> {
        vec![
            ("ServiceKey", api_key.to_string()),
            ("ObsCode", site.code.to_string()),
            ("ResultType", "json".to_string()),
        ]
    }

    /// Mean wind direction and speed at the station nearest the point
    pub async fn fetch_wind(
        &self,
        timestamp: NaiveDateTime,
        latitude: f64,
        longitude: f64,
    ) -> AppResult<ObservationSample> {
        let api_key = require_api_key(self.api_key.as_deref())?;

        let site = find_nearest_site(latitude, longitude);
        tracing::debug!(
            station = site.code,
            name = site.name,
            requested = %timestamp,
            "Requesting station wind"
        );

        let response = self
            .client
            .get(&self.base_url)
            .query(&Self::query_params(api_key, site))
            .send()
            .await
            .map_err(|e| AppError::upstream_unreachable(API_NAME, e))?;

        let body = read_json(API_NAME, response).await?;
        summarize_wind_body(&body)
    }
}

/// Average `wind_dir`/`wind_speed` over a parsed response body
pub fn summarize_wind_body(body: &serde_json::Value) -> AppResult<ObservationSample> {
    let items = data_items(API_NAME, body)?;
    average_fields(API_NAME, &items, "wind_dir", "wind_speed")
}

#[async_trait]
impl ObservationSource for WindClient {
    async fn fetch(
        &self,
        timestamp: NaiveDateTime,
        location: GpsCoordinates,
    ) -> AppResult<ObservationSample> {
        self.fetch_wind(timestamp, location.latitude, location.longitude)
            .await
    }

    fn name(&self) -> &'static str {
        API_NAME
    }
}
