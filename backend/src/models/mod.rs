//! Domain models
//!
//! Re-exports the shared prediction types and adds the regression model
//! used by the backend.

pub mod regression;

pub use regression::{load_model, predict_trash, ModelArtifact, ModelStore, Regressor};
pub use shared::models::*;
