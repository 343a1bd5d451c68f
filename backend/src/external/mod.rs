//! External API integrations
//!
//! Both KHOA endpoints answer with `{"result": {"data": ...}}` and encode
//! numbers as strings, so body handling is shared here.

pub mod current;
pub mod wind;

pub use current::TidalCurrentClient;
pub use wind::WindClient;

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest::{Client, Response};
use serde_json::Value;
use shared::{GpsCoordinates, ObservationSample};

use crate::error::{AppError, AppResult};

/// Source of averaged direction/speed observations for a point in time
#[async_trait]
pub trait ObservationSource: Send + Sync {
    async fn fetch(
        &self,
        timestamp: NaiveDateTime,
        location: GpsCoordinates,
    ) -> AppResult<ObservationSample>;

    /// Short name used in errors and logs
    fn name(&self) -> &'static str;
}

/// HTTP client with a bounded per-request timeout
pub(crate) fn build_http_client(timeout_secs: u64) -> AppResult<Client> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))
}

/// Service key, or a configuration error when it is unset or empty
pub(crate) fn require_api_key(api_key: Option<&str>) -> AppResult<&str> {
    api_key
        .filter(|key| !key.is_empty())
        .ok_or_else(|| AppError::Configuration("KHOA API key is not configured".to_string()))
}

/// Read a response body as JSON, mapping failures onto the fetch taxonomy
pub(crate) async fn read_json(api: &'static str, response: Response) -> AppResult<Value> {
    let status = response.status();
    if !status.is_success() {
        return Err(AppError::upstream_status(api, status.as_u16()));
    }

    let body = response
        .text()
        .await
        .map_err(|e| AppError::upstream_unreachable(api, e))?;

    serde_json::from_str(&body).map_err(|_| AppError::FetchParse { api, body })
}

/// Items under `result.data`; a single object counts as one item
pub(crate) fn data_items<'a>(api: &'static str, body: &'a Value) -> AppResult<Vec<&'a Value>> {
    let data = body
        .get("result")
        .and_then(|result| result.get("data"))
        .ok_or_else(|| AppError::FetchSchema {
            api,
            message: "missing result.data".to_string(),
        })?;

    match data {
        Value::Array(items) => Ok(items.iter().collect()),
        Value::Object(_) => Ok(vec![data]),
        other => Err(AppError::FetchSchema {
            api,
            message: format!("result.data is neither a list nor an object: {}", other),
        }),
    }
}

/// Average `(direction, speed)` over items carrying both fields.
///
/// Items missing either field are skipped; zero usable items is an error.
pub(crate) fn average_fields(
    api: &'static str,
    items: &[&Value],
    direction_key: &str,
    speed_key: &str,
) -> AppResult<ObservationSample> {
    let mut pairs = Vec::with_capacity(items.len());

    for item in items {
        let (Some(direction), Some(speed)) = (item.get(direction_key), item.get(speed_key)) else {
            continue;
        };
        pairs.push((numeric(api, direction)?, numeric(api, speed)?));
    }

    ObservationSample::mean_of(pairs).ok_or(AppError::FetchEmptyResult { api })
}

/// Accept JSON numbers and numeric strings such as `"5.0"`
fn numeric(api: &'static str, value: &Value) -> AppResult<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| AppError::FetchParse {
        api,
        body: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_data_items_schema_errors() {
        let missing = json!({"error": "No data"});
        assert!(matches!(
            data_items("current", &missing),
            Err(AppError::FetchSchema { .. })
        ));

        let no_data = json!({"result": {"meta": {}}});
        assert!(matches!(
            data_items("current", &no_data),
            Err(AppError::FetchSchema { .. })
        ));

        let scalar = json!({"result": {"data": "oops"}});
        assert!(matches!(
            data_items("current", &scalar),
            Err(AppError::FetchSchema { .. })
        ));
    }

    #[test]
    fn test_single_object_is_one_item() {
        let body = json!({"result": {"data": {"wind_dir": "90", "wind_speed": "3.2"}}});
        let items = data_items("wind", &body).unwrap();
        assert_eq!(items.len(), 1);
        let sample = average_fields("wind", &items, "wind_dir", "wind_speed").unwrap();
        assert_eq!(sample.direction_deg, 90.0);
        assert!((sample.speed - 3.2).abs() < 1e-12);
    }

    #[test]
    fn test_numbers_and_strings_mix() {
        let body = json!({"result": {"data": [
            {"d": 10, "s": "1.5"},
            {"d": "30", "s": 2.5}
        ]}});
        let items = data_items("current", &body).unwrap();
        let sample = average_fields("current", &items, "d", "s").unwrap();
        assert_eq!(sample.direction_deg, 20.0);
        assert_eq!(sample.speed, 2.0);
    }

    #[test]
    fn test_non_numeric_value_is_parse_error() {
        let body = json!({"result": {"data": [{"d": "-", "s": "1.0"}]}});
        let items = data_items("current", &body).unwrap();
        let err = average_fields("current", &items, "d", "s").unwrap_err();
        assert!(matches!(err, AppError::FetchParse { body, .. } if body == "\"-\""));
    }
}
