//! Cross-cutting, shared constants.
//!
//! The input geometry is a compile-time invariant shared by the preprocessor,
//! the model loader, and the tensor type. Derive secondary sizes from the
//! primary ones instead of repeating literals.

/// Side length (pixels) every signature is resampled to.
pub const INPUT_SIZE: usize = 100;

/// Color channels per pixel.
pub const INPUT_CHANNELS: usize = 3;

/// Batch axis prepended to every preprocessed tensor.
pub const BATCH_SIZE: usize = 1;

/// Tensor shape fed to the model: `(batch, height, width, channels)`.
pub const INPUT_SHAPE: [usize; 4] = [BATCH_SIZE, INPUT_SIZE, INPUT_SIZE, INPUT_CHANNELS];

/// Number of `f32` values in one preprocessed tensor.
pub const INPUT_LEN: usize = BATCH_SIZE * INPUT_SIZE * INPUT_SIZE * INPUT_CHANNELS;

/// Divisor mapping 8-bit channel values into `[0, 1]`.
pub const PIXEL_SCALE: f32 = 255.0;

/// A pair is `Genuine` only when its similarity is strictly above this value.
pub const GENUINE_THRESHOLD: f32 = 0.85;

/// Response header carrying the verification status.
pub const SIGCHECK_STATUS_HEADER: &str = "x-sigcheck-status";

pub const SIGCHECK_STATUS_HEALTHY: &str = "healthy";
pub const SIGCHECK_STATUS_READY: &str = "ready";
pub const SIGCHECK_STATUS_NOT_READY: &str = "not_ready";
pub const SIGCHECK_STATUS_ERROR: &str = "error";
