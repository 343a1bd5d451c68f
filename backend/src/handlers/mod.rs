//! HTTP handlers

pub mod health;
pub mod trash;

pub use health::{health_check, root};
pub use trash::{get_beach_predictions, get_predict};
