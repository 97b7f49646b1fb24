//! Similarity models.
//!
//! - [`SimilarityModel`] is the seam the verification engine depends on.
//! - [`SiameseModel`] is the candle-backed production implementation, loaded
//!   once from an artifact directory and shared read-only afterwards.
//! - `MockSimilarityModel` (tests / `mock` feature) replaces the artifact.

pub mod config;
/// Device selection (CPU / Metal / CUDA).
pub mod device;
mod error;
#[cfg(any(test, feature = "mock"))]
mod mock;
pub mod siamese;


pub use config::{CONFIG_FILE, SiameseConfig, WEIGHTS_FILE};
pub use device::DevicePreference;
pub use error::ModelError;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockSimilarityModel;
pub use siamese::{SiameseModel, SiameseNetwork};

use crate::preprocess::{ChannelOrder, SignatureTensor};

/// Maps an ordered pair of signature tensors to a dissimilarity in `[0, 1]`.
///
/// Implementations are shared across request threads without a lock, so
/// scoring must be safe under concurrent `&self` calls. The ordering matters:
/// `dissimilarity(a, b)` need not equal `dissimilarity(b, a)`.
pub trait SimilarityModel: Send + Sync {
    fn dissimilarity(
        &self,
        first: &SignatureTensor,
        second: &SignatureTensor,
    ) -> Result<f32, ModelError>;

    /// Channel order the preprocessor must emit for this model.
    fn channel_order(&self) -> ChannelOrder {
        ChannelOrder::default()
    }

    /// Short label used in readiness reports and logs.
    fn kind(&self) -> &'static str;
}
