//! Adapters layer: Concrete implementations of ports.
//!
//! - `artifacts`: scikit-learn scaler/classifier exports loaded from disk
//! - `redact`: clinical value filtering for logs

pub mod artifacts;
pub mod redact;

pub use artifacts::ArtifactError;
