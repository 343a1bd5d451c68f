//! Shared types and models for the Tangyuling marine debris service
//!
//! This crate holds the pure parts of the prediction pipeline: station and
//! beach registries, feature derivation, and severity classification. The
//! backend adds I/O (observation APIs, model loading, HTTP) on top.

pub mod location;
pub mod models;
pub mod types;
pub mod validation;

pub use location::*;
pub use models::*;
pub use types::*;
pub use validation::*;
