//! Application layer: Use cases and services.
//!
//! Orchestrates the domain types with the model ports to turn a clinical
//! record into a prediction.

mod predictor;

pub use predictor::{ModelContext, Predictor};
