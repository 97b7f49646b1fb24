//! Image preprocessing: decode, resample to 100×100, normalize to `[0, 1]`.
//!
//! The output is a [`SignatureTensor`] in `(1, 100, 100, 3)` NHWC layout, the
//! only input shape the similarity model accepts.

pub mod error;


pub use error::DecodeError;

use std::path::Path;

use image::{DynamicImage, ImageDecoder, ImageReader};
use image::imageops::FilterType;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::{
    BATCH_SIZE, INPUT_CHANNELS, INPUT_LEN, INPUT_SHAPE, INPUT_SIZE, PIXEL_SCALE,
};

/// Channel order expected by the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelOrder {
    Rgb,
    /// Blue-green-red, the layout OpenCV-trained models expect.
    #[default]
    Bgr,
}

/// Fixed-shape, normalized representation of one signature image.
#[derive(Debug, Clone, PartialEq)]
pub struct SignatureTensor {
    data: Vec<f32>,
}

impl SignatureTensor {
    /// Wraps raw NHWC values. Returns `None` unless exactly
    /// [`INPUT_LEN`] values are supplied.
    pub fn from_vec(data: Vec<f32>) -> Option<Self> {
        (data.len() == INPUT_LEN).then_some(Self { data })
    }

    /// Tensor filled with a single value (test fixtures, warmup).
    pub fn filled(value: f32) -> Self {
        Self {
            data: vec![value; INPUT_LEN],
        }
    }

    pub fn shape(&self) -> [usize; 4] {
        INPUT_SHAPE
    }

    pub fn values(&self) -> &[f32] {
        &self.data
    }

    pub fn into_values(self) -> Vec<f32> {
        self.data
    }

    /// Mean value, accumulated in `f64`.
    pub fn mean(&self) -> f32 {
        let total: f64 = self.data.iter().map(|&v| f64::from(v)).sum();
        (total / self.data.len() as f64) as f32
    }

    /// Copies the values onto `device` as a `(1, 100, 100, 3)` tensor.
    pub fn to_candle(
        &self,
        device: &candle_core::Device,
    ) -> candle_core::Result<candle_core::Tensor> {
        candle_core::Tensor::from_slice(
            &self.data,
            (BATCH_SIZE, INPUT_SIZE, INPUT_SIZE, INPUT_CHANNELS),
            device,
        )
    }
}

/// Turns image files into [`SignatureTensor`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct Preprocessor {
    channel_order: ChannelOrder,
}

impl Preprocessor {
    pub fn new(channel_order: ChannelOrder) -> Self {
        Self { channel_order }
    }

    pub fn channel_order(&self) -> ChannelOrder {
        self.channel_order
    }

    /// Decodes `path` and produces a normalized tensor.
    ///
    /// The format is detected from the file content, so extensionless upload
    /// files work and misnamed files are rejected. EXIF orientation is applied
    /// before resampling.
    pub fn load(&self, path: &Path) -> Result<SignatureTensor, DecodeError> {
        let reader = ImageReader::open(path)
            .and_then(|r| r.with_guessed_format())
            .map_err(|source| DecodeError::Unreadable {
                path: path.to_path_buf(),
                source,
            })?;

        let undecodable = |source: image::ImageError| DecodeError::Undecodable {
            path: path.to_path_buf(),
            source,
        };

        let mut decoder = reader.into_decoder().map_err(undecodable)?;
        let orientation = decoder.orientation().map_err(undecodable)?;
        let mut image = DynamicImage::from_decoder(decoder).map_err(undecodable)?;
        image.apply_orientation(orientation);

        debug!(
            path = %path.display(),
            width = image.width(),
            height = image.height(),
            ?orientation,
            "Decoded signature image"
        );

        let tensor = self.normalize(&image);

        debug!(path = %path.display(), shape = ?tensor.shape(), "Preprocessed signature");

        Ok(tensor)
    }

    /// Resamples an already-decoded image.
    pub fn normalize(&self, image: &DynamicImage) -> SignatureTensor {
        let rgb = image.to_rgb8();
        let side = INPUT_SIZE as u32;
        let resized = image::imageops::resize(&rgb, side, side, FilterType::Triangle);

        let mut data = Vec::with_capacity(INPUT_LEN);
        for pixel in resized.pixels() {
            let [r, g, b] = pixel.0;
            let ordered = match self.channel_order {
                ChannelOrder::Rgb => [r, g, b],
                ChannelOrder::Bgr => [b, g, r],
            };
            data.extend(ordered.iter().map(|&c| f32::from(c) / PIXEL_SCALE));
        }
        debug_assert_eq!(data.len(), INPUT_LEN);

        SignatureTensor { data }
    }
}
