//! HTTP handlers for trash prediction endpoints

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::Deserialize;
use shared::{
    parse_observation_date, BeachPredictResponse, GpsCoordinates, PredictResponse, Prediction,
    BEACHES,
};
use validator::{Validate, ValidationErrors};

use crate::error::{AppError, AppResult};
use crate::services::trash::now_kst;
use crate::AppState;

/// Query parameters for a single prediction
#[derive(Debug, Deserialize)]
pub struct PredictQuery {
    /// ISO 8601 date or date-time, e.g. `2016-01-05T15:20:00`
    pub date: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Predict debris for a date and coordinate
pub async fn get_predict(
    State(state): State<AppState>,
    query: Result<Query<PredictQuery>, QueryRejection>,
) -> AppResult<Json<PredictResponse>> {
    let Query(query) = query.map_err(|rejection| AppError::Validation {
        field: "query".to_string(),
        message: rejection.body_text(),
    })?;

    let location = GpsCoordinates::new(query.latitude, query.longitude);
    location.validate().map_err(first_validation_error)?;

    let date = parse_observation_date(&query.date)
        .map_err(|e| AppError::InvalidDate(e.to_string()))?;

    let result = state.trash.predict(date, location).await?;

    Ok(Json(PredictResponse {
        date: date.format("%Y-%m-%d").to_string(),
        location,
        prediction: Prediction {
            trash_amount: result.trash_amount,
        },
        status: result.status,
    }))
}

/// Predict debris for every registered beach, now
pub async fn get_beach_predictions(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<BeachPredictResponse>>> {
    let now = now_kst();
    let date = now.format("%Y-%m-%d").to_string();

    let predictions = state.trash.predict_beaches(&BEACHES, now).await?;

    let response = predictions
        .into_iter()
        .map(|p| BeachPredictResponse {
            name: p.beach.name.to_string(),
            date: date.clone(),
            location: p.beach.coordinates(),
            prediction: Prediction {
                trash_amount: p.result.trash_amount,
            },
            status: p.result.status,
        })
        .collect();

    Ok(Json(response))
}

/// Report the first failing field, in field-name order
fn first_validation_error(errors: ValidationErrors) -> AppError {
    let field_errors = errors.field_errors();
    let mut fields: Vec<_> = field_errors.keys().copied().collect();
    fields.sort_unstable();

    let Some(field) = fields.first().copied() else {
        return AppError::Validation {
            field: "query".to_string(),
            message: errors.to_string(),
        };
    };

    let message = field_errors
        .get(field)
        .and_then(|list| list.first())
        .map(|e| {
            e.message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| e.code.to_string())
        })
        .unwrap_or_default();

    AppError::Validation {
        field: field.to_string(),
        message,
    }
}
