//! Domain models for the marine debris prediction service

mod beach;
mod features;
mod observation;
mod prediction;
mod visitor;

pub use beach::*;
pub use features::*;
pub use observation::*;
pub use prediction::*;
pub use visitor::*;
