//! Artifact adapter: loads the fitted scaler and classifier from disk.
//!
//! Both artifacts are JSON exports of the fitted scikit-learn objects,
//! written by the training pipeline next to the application:
//!
//! - `best_heart_disease_model.json`: the classifier
//! - `scaler.json`: the feature scaler
//!
//! Loading is all-or-nothing. A missing, unreadable or malformed file is
//! reported with the directory that was searched, and nothing is returned.

mod classifier;
mod scaler;

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::domain::{FEATURE_COUNT, FEATURE_NAMES};
use crate::ports::{Classifier, Scaler};

pub use classifier::{ExportedClassifier, ExportedTree};
pub use scaler::ExportedScaler;

/// File name of the classifier artifact.
pub const CLASSIFIER_FILE: &str = "best_heart_disease_model.json";

/// File name of the scaler artifact.
pub const SCALER_FILE: &str = "scaler.json";

/// Errors raised while loading artifacts at startup.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error(
        "Model or scaler file not found ({}). Make sure the '{}' directory with {CLASSIFIER_FILE} and {SCALER_FILE} exists.",
        .path.display(),
        .dir.display()
    )]
    Missing { dir: PathBuf, path: PathBuf },

    #[error("Failed to read {} from '{}': {source}", .path.display(), .dir.display())]
    Unreadable {
        dir: PathBuf,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Artifact {} in '{}' is invalid: {reason}", .path.display(), .dir.display())]
    Corrupt {
        dir: PathBuf,
        path: PathBuf,
        reason: String,
    },
}

impl ArtifactError {
    /// Directory that was searched.
    #[must_use]
    pub fn dir(&self) -> &Path {
        match self {
            Self::Missing { dir, .. } | Self::Unreadable { dir, .. } | Self::Corrupt { dir, .. } => {
                dir
            }
        }
    }
}

/// Where the loaded artifacts came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactProvenance {
    pub dir: PathBuf,
    pub scaler_kind: &'static str,
    pub classifier_kind: &'static str,
    /// SHA-256 of the scaler file, lowercase hex
    pub scaler_sha256: String,
    /// SHA-256 of the classifier file, lowercase hex
    pub classifier_sha256: String,
}

impl ArtifactProvenance {
    /// First 12 hex digits of both fingerprints, for compact display.
    #[must_use]
    pub fn short_fingerprints(&self) -> (&str, &str) {
        (
            &self.scaler_sha256[..12.min(self.scaler_sha256.len())],
            &self.classifier_sha256[..12.min(self.classifier_sha256.len())],
        )
    }
}

/// Both artifacts, validated and ready for inference.
#[derive(Debug, Clone)]
pub struct ArtifactSet {
    pub scaler: ExportedScaler,
    pub classifier: ExportedClassifier,
    pub provenance: ArtifactProvenance,
}

/// Loads the artifact pair from one directory.
#[derive(Debug, Clone)]
pub struct ArtifactLoader {
    dir: PathBuf,
}

impl ArtifactLoader {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[must_use]
    pub fn classifier_path(&self) -> PathBuf {
        self.dir.join(CLASSIFIER_FILE)
    }

    #[must_use]
    pub fn scaler_path(&self) -> PathBuf {
        self.dir.join(SCALER_FILE)
    }

    /// Read, parse and validate both artifacts.
    ///
    /// # Errors
    /// Returns `ArtifactError::Missing` if either file is absent,
    /// `Unreadable` on other IO failures, and `Corrupt` if a file does not
    /// parse or does not fit the 13-feature schema.
    pub fn load(&self) -> Result<ArtifactSet, ArtifactError> {
        tracing::info!("Loading model artifacts from {:?}", self.dir);

        let classifier_path = self.classifier_path();
        let scaler_path = self.scaler_path();

        // Report a missing file before spending time on the other one.
        for path in [&classifier_path, &scaler_path] {
            if !path.exists() {
                tracing::error!("Artifact not found at {:?}", path);
                return Err(ArtifactError::Missing {
                    dir: self.dir.clone(),
                    path: path.clone(),
                });
            }
        }

        let classifier_bytes = self.read(&classifier_path)?;
        let scaler_bytes = self.read(&scaler_path)?;

        let classifier: ExportedClassifier = self.parse(&classifier_path, &classifier_bytes)?;
        classifier
            .validate()
            .map_err(|reason| self.corrupt(&classifier_path, reason))?;

        let scaler: ExportedScaler = self.parse(&scaler_path, &scaler_bytes)?;
        scaler
            .validate()
            .map_err(|reason| self.corrupt(&scaler_path, reason))?;

        let provenance = ArtifactProvenance {
            dir: self.dir.clone(),
            scaler_kind: scaler.kind(),
            classifier_kind: classifier.kind(),
            scaler_sha256: sha256_hex(&scaler_bytes),
            classifier_sha256: sha256_hex(&classifier_bytes),
        };

        tracing::info!(
            scaler = provenance.scaler_kind,
            classifier = provenance.classifier_kind,
            scaler_sha256 = %provenance.scaler_sha256,
            classifier_sha256 = %provenance.classifier_sha256,
            "Loaded model artifacts"
        );

        Ok(ArtifactSet {
            scaler,
            classifier,
            provenance,
        })
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>, ArtifactError> {
        std::fs::read(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ArtifactError::Missing {
                    dir: self.dir.clone(),
                    path: path.to_path_buf(),
                }
            } else {
                ArtifactError::Unreadable {
                    dir: self.dir.clone(),
                    path: path.to_path_buf(),
                    source,
                }
            }
        })
    }

    fn parse<T: serde::de::DeserializeOwned>(
        &self,
        path: &Path,
        bytes: &[u8],
    ) -> Result<T, ArtifactError> {
        serde_json::from_slice(bytes).map_err(|e| self.corrupt(path, e.to_string()))
    }

    fn corrupt(&self, path: &Path, reason: String) -> ArtifactError {
        tracing::error!("Artifact {:?} rejected: {}", path, reason);
        ArtifactError::Corrupt {
            dir: self.dir.clone(),
            path: path.to_path_buf(),
            reason,
        }
    }
}

/// Artifacts may carry the column names they were fitted on; if so they must
/// match ours exactly, in order.
fn check_feature_names(names: Option<&[String]>) -> Result<(), String> {
    let Some(names) = names else {
        return Ok(());
    };
    if names.len() != FEATURE_COUNT {
        return Err(format!(
            "feature_names has {} entries, expected {FEATURE_COUNT}",
            names.len()
        ));
    }
    for (i, (got, expected)) in names.iter().zip(FEATURE_NAMES).enumerate() {
        if got != expected {
            return Err(format!(
                "feature_names[{i}] is '{got}', expected '{expected}'"
            ));
        }
    }
    Ok(())
}

fn sha256_hex(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    digest.iter().map(|b| format!("{b:02x}")).collect()
}
