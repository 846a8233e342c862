//! Ports layer: Trait definitions for external operations.
//!
//! Following Hexagonal Architecture, these traits define the boundary between
//! the predictor and the pre-trained artifacts it delegates to.

mod model;

pub use model::{Classifier, Scaler};
