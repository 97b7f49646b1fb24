//! Sigcheck library crate (used by the server and integration tests).
//!
//! # Public API Surface
//!
//! ## Pipeline
//! - [`Preprocessor`], [`SignatureTensor`] - decode and normalize signature images
//! - [`SimilarityModel`], [`SiameseModel`] - pairwise dissimilarity scoring
//! - [`SignatureVerifier`], [`VerificationResult`] - two-way scoring and classification
//!
//! ## Configuration
//! - [`Config`], [`ConfigError`] - server configuration from `SIGCHECK_*` variables
//!
//! ## Test/Mock Support
//! [`MockSimilarityModel`] is available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod config;
pub mod constants;
pub mod model;
pub mod preprocess;
pub mod verification;

pub use config::{Config, ConfigError};
pub use constants::{
    GENUINE_THRESHOLD, INPUT_CHANNELS, INPUT_LEN, INPUT_SHAPE, INPUT_SIZE, SIGCHECK_STATUS_ERROR,
    SIGCHECK_STATUS_HEADER, SIGCHECK_STATUS_HEALTHY, SIGCHECK_STATUS_NOT_READY,
    SIGCHECK_STATUS_READY,
};
#[cfg(any(test, feature = "mock"))]
pub use model::MockSimilarityModel;
pub use model::{DevicePreference, ModelError, SiameseConfig, SiameseModel, SimilarityModel};
pub use preprocess::{ChannelOrder, DecodeError, Preprocessor, SignatureTensor};
pub use verification::{
    Classification, Direction, DissimilarityPair, SignatureRole, SignatureVerifier,
    VerificationError, VerificationResult,
};
