//! # heartcheck
//!
//! Heart disease risk prediction from 13 clinical attributes, served as a
//! terminal form.
//!
//! This crate provides:
//! - Loading of a fitted scaler and classifier exported from scikit-learn
//! - A prediction pipeline over one clinical record at a time
//! - A terminal UI to enter the attributes and read the result
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core types (ClinicalRecord, Feature order, input domains, Prediction)
//! - `ports`: Traits for the fitted artifacts (Scaler, Classifier)
//! - `adapters`: Artifact loading and log redaction
//! - `application`: The predictor orchestrating domain and ports
//! - `tui`: Terminal user interface

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod tui;

pub use domain::{ClinicalRecord, DiseaseLabel, Feature, Prediction};

/// Result type for heartcheck operations
pub type Result<T> = std::result::Result<T, HeartcheckError>;

/// Main error type for heartcheck
#[derive(Debug, thiserror::Error)]
pub enum HeartcheckError {
    #[error("Model artifacts unavailable: {0}")]
    Artifact(#[from] adapters::ArtifactError),

    #[error("Prediction failed: {0}")]
    Model(#[from] domain::ModelError),

    #[error("Invalid input: {0}")]
    Field(#[from] domain::FieldError),
}
