use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

use crate::constants::GENUINE_THRESHOLD;
use crate::model::{ModelError, SimilarityModel};
use crate::preprocess::{Preprocessor, SignatureTensor};

use super::error::VerificationError;
use super::types::{Direction, DissimilarityPair, SignatureRole, VerificationResult};

/// Compares two signatures with a shared, read-only similarity model.
pub struct SignatureVerifier<M: SimilarityModel> {
    model: Arc<M>,
    preprocessor: Preprocessor,
}

impl<M: SimilarityModel> std::fmt::Debug for SignatureVerifier<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignatureVerifier")
            .field("model", &self.model.kind())
            .field("preprocessor", &self.preprocessor)
            .field("threshold", &GENUINE_THRESHOLD)
            .finish()
    }
}

impl<M: SimilarityModel> Clone for SignatureVerifier<M> {
    fn clone(&self) -> Self {
        Self {
            model: Arc::clone(&self.model),
            preprocessor: self.preprocessor,
        }
    }
}

impl<M: SimilarityModel> SignatureVerifier<M> {
    /// The preprocessor follows the model's declared channel order.
    pub fn new(model: M) -> Self {
        Self::from_shared(Arc::new(model))
    }

    pub fn from_shared(model: Arc<M>) -> Self {
        let preprocessor = Preprocessor::new(model.channel_order());
        Self {
            model,
            preprocessor,
        }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn threshold(&self) -> f32 {
        GENUINE_THRESHOLD
    }

    /// Decodes both files and verifies them. Nothing is scored unless both decode.
    pub fn verify_paths(
        &self,
        original: &Path,
        verification: &Path,
    ) -> Result<VerificationResult, VerificationError> {
        let original = self
            .preprocessor
            .load(original)
            .map_err(|source| VerificationError::Decode {
                role: SignatureRole::Original,
                source,
            })?;
        let verification =
            self.preprocessor
                .load(verification)
                .map_err(|source| VerificationError::Decode {
                    role: SignatureRole::Verification,
                    source,
                })?;

        self.verify_tensors(&original, &verification)
    }

    /// Scores the pair in both orders and applies the threshold.
    pub fn verify_tensors(
        &self,
        original: &SignatureTensor,
        verification: &SignatureTensor,
    ) -> Result<VerificationResult, VerificationError> {
        let pair = self.dissimilarities(original, verification)?;
        let result = VerificationResult::from_pair(pair);

        info!(
            forward = pair.forward,
            reverse = pair.reverse,
            similarity = result.similarity_score,
            threshold = GENUINE_THRESHOLD,
            classification = %result.classification,
            "Signature pair verified"
        );

        Ok(result)
    }

    /// Raw `(original, verification)` and `(verification, original)` scores.
    pub fn dissimilarities(
        &self,
        original: &SignatureTensor,
        verification: &SignatureTensor,
    ) -> Result<DissimilarityPair, VerificationError> {
        let forward = self.score(Direction::Forward, original, verification)?;
        let reverse = self.score(Direction::Reverse, verification, original)?;
        Ok(DissimilarityPair::new(forward, reverse))
    }

    fn score(
        &self,
        direction: Direction,
        first: &SignatureTensor,
        second: &SignatureTensor,
    ) -> Result<f32, VerificationError> {
        let score = self
            .model
            .dissimilarity(first, second)
            .and_then(check_score)
            .map_err(|source| VerificationError::Inference { direction, source })?;

        debug!(%direction, score, "Model dissimilarity");
        Ok(score)
    }
}

fn check_score(score: f32) -> Result<f32, ModelError> {
    if score.is_finite() && (0.0..=1.0).contains(&score) {
        Ok(score)
    } else {
        Err(ModelError::InvalidScore { score })
    }
}
