//! Business logic services for the Tangyuling API

pub mod trash;

pub use trash::{BeachPrediction, TrashService};
