use std::path::PathBuf;
use thiserror::Error;

use super::device::DevicePreference;

/// Failures loading or running a similarity model.
///
/// Load-time variants make the process unable to serve; inference-time variants
/// fail only the current request. See [`ModelError::is_load_error`].
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model artifact not found at path: {path}")]
    NotFound { path: PathBuf },

    #[error("model artifact is missing {file}: {path}")]
    MissingFile { file: &'static str, path: PathBuf },

    #[error("invalid model configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("failed to load model from {path}: {source}")]
    LoadFailed {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("no {preference} device for the similarity model: {reason}")]
    DeviceUnavailable {
        preference: DevicePreference,
        reason: String,
    },

    #[error("input shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    #[error("model inference failed: {source}")]
    Inference {
        #[source]
        source: candle_core::Error,
    },

    #[error("model produced invalid dissimilarity score {score}: expected a value in [0, 1]")]
    InvalidScore { score: f32 },
}

impl ModelError {
    /// `true` for errors raised while loading the artifact.
    pub fn is_load_error(&self) -> bool {
        matches!(
            self,
            ModelError::NotFound { .. }
                | ModelError::MissingFile { .. }
                | ModelError::InvalidConfig { .. }
                | ModelError::LoadFailed { .. }
                | ModelError::DeviceUnavailable { .. }
        )
    }
}

impl From<candle_core::Error> for ModelError {
    fn from(source: candle_core::Error) -> Self {
        ModelError::Inference { source }
    }
}
