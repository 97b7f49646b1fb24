use serde::{Deserialize, Serialize};

use crate::constants::GENUINE_THRESHOLD;

/// Outcome class for a signature pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Classification {
    Genuine,
    Forged,
}

impl Classification {
    /// `Genuine` iff `similarity` is strictly above `threshold`.
    pub fn from_similarity(similarity: f32, threshold: f32) -> Self {
        if similarity > threshold {
            Classification::Genuine
        } else {
            Classification::Forged
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Genuine => "Genuine",
            Classification::Forged => "Forged",
        }
    }

    /// Lowercase form used in status headers.
    pub fn status(&self) -> &'static str {
        match self {
            Classification::Genuine => "genuine",
            Classification::Forged => "forged",
        }
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which of the two uploaded signatures an input is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureRole {
    Original,
    Verification,
}

impl std::fmt::Display for SignatureRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SignatureRole::Original => f.write_str("original"),
            SignatureRole::Verification => f.write_str("verification"),
        }
    }
}

/// Argument order of a model invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// `(original, verification)`
    Forward,
    /// `(verification, original)`
    Reverse,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Forward => f.write_str("original-vs-verification"),
            Direction::Reverse => f.write_str("verification-vs-original"),
        }
    }
}

/// The two directional dissimilarities of one request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DissimilarityPair {
    pub forward: f32,
    pub reverse: f32,
}

impl DissimilarityPair {
    pub fn new(forward: f32, reverse: f32) -> Self {
        Self { forward, reverse }
    }

    /// `1 - mean(forward, reverse)`.
    pub fn similarity(&self) -> f32 {
        1.0 - (self.forward + self.reverse) / 2.0
    }
}

/// Classification plus the similarity it was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VerificationResult {
    pub classification: Classification,
    pub similarity_score: f32,
}

impl VerificationResult {
    /// Applies the global [`GENUINE_THRESHOLD`].
    pub fn from_pair(pair: DissimilarityPair) -> Self {
        Self::from_pair_with_threshold(pair, GENUINE_THRESHOLD)
    }

    pub fn from_pair_with_threshold(pair: DissimilarityPair, threshold: f32) -> Self {
        let similarity_score = pair.similarity();
        Self {
            classification: Classification::from_similarity(similarity_score, threshold),
            similarity_score,
        }
    }

    pub fn is_genuine(&self) -> bool {
        self.classification == Classification::Genuine
    }
}

impl std::fmt::Display for VerificationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (similarity: {:.4})",
            self.classification, self.similarity_score
        )
    }
}
