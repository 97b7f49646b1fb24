use thiserror::Error;

use super::types::{Direction, SignatureRole};
use crate::model::ModelError;
use crate::preprocess::DecodeError;

#[derive(Debug, Error)]
pub enum VerificationError {
    #[error("{role} signature could not be decoded: {source}")]
    Decode {
        role: SignatureRole,
        #[source]
        source: DecodeError,
    },

    #[error("similarity model failed ({direction}): {source}")]
    Inference {
        direction: Direction,
        #[source]
        source: ModelError,
    },
}

impl VerificationError {
    /// Stable, lowercase label for status headers and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            VerificationError::Decode { .. } => "decode_error",
            VerificationError::Inference { .. } => "inference_error",
        }
    }
}
