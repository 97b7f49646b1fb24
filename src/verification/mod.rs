//! Signature pair verification.
//!
//! [`SignatureVerifier`] preprocesses both images, asks the model for a
//! dissimilarity in both argument orders, and turns the mean into a similarity
//! score:
//!
//! ```text
//! similarity = 1 - (d(original, verification) + d(verification, original)) / 2
//! ```
//!
//! The pair is `Genuine` only when `similarity > 0.85`. Scoring both orders
//! makes the result independent of which upload is called "original", even for
//! models whose two inputs are not interchangeable.

pub mod engine;
pub mod error;
pub mod types;


pub use engine::SignatureVerifier;
pub use error::VerificationError;
pub use types::{
    Classification, Direction, DissimilarityPair, SignatureRole, VerificationResult,
};
