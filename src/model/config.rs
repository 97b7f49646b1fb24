use serde::{Deserialize, Serialize};

use crate::constants::{INPUT_CHANNELS, INPUT_SIZE};
use crate::preprocess::ChannelOrder;

/// Architecture file name inside the artifact directory.
pub const CONFIG_FILE: &str = "config.json";

/// Weights file name inside the artifact directory.
pub const WEIGHTS_FILE: &str = "model.safetensors";

pub const DEFAULT_CONV_FILTERS: [usize; 2] = [32, 64];
pub const DEFAULT_KERNEL_SIZE: usize = 3;
pub const DEFAULT_EMBEDDING_DIM: usize = 128;

/// Siamese network hyperparameters, read from `config.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiameseConfig {
    pub input_size: usize,

    pub input_channels: usize,

    /// Output channels of each conv block, in order.
    #[serde(default = "default_conv_filters")]
    pub conv_filters: Vec<usize>,

    #[serde(default = "default_kernel_size")]
    pub kernel_size: usize,

    #[serde(default = "default_embedding_dim")]
    pub embedding_dim: usize,

    /// Channel order the weights were trained with.
    #[serde(default)]
    pub channel_order: ChannelOrder,
}

fn default_conv_filters() -> Vec<usize> {
    DEFAULT_CONV_FILTERS.to_vec()
}

fn default_kernel_size() -> usize {
    DEFAULT_KERNEL_SIZE
}

fn default_embedding_dim() -> usize {
    DEFAULT_EMBEDDING_DIM
}

impl Default for SiameseConfig {
    fn default() -> Self {
        Self {
            input_size: INPUT_SIZE,
            input_channels: INPUT_CHANNELS,
            conv_filters: default_conv_filters(),
            kernel_size: DEFAULT_KERNEL_SIZE,
            embedding_dim: DEFAULT_EMBEDDING_DIM,
            channel_order: ChannelOrder::default(),
        }
    }
}

impl SiameseConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.input_size != INPUT_SIZE {
            return Err(format!(
                "input_size must be {INPUT_SIZE}, got {}",
                self.input_size
            ));
        }
        if self.input_channels != INPUT_CHANNELS {
            return Err(format!(
                "input_channels must be {INPUT_CHANNELS}, got {}",
                self.input_channels
            ));
        }
        if self.conv_filters.is_empty() || self.conv_filters.contains(&0) {
            return Err("conv_filters must be a non-empty list of positive sizes".to_string());
        }
        if self.kernel_size == 0 {
            return Err("kernel_size must be positive".to_string());
        }
        if self.embedding_dim == 0 {
            return Err("embedding_dim must be positive".to_string());
        }
        if self.feature_side() == 0 {
            return Err(format!(
                "{} conv blocks with kernel {} shrink a {}px input to nothing",
                self.conv_filters.len(),
                self.kernel_size,
                self.input_size
            ));
        }
        Ok(())
    }

    /// Spatial side length after every conv (valid padding) + 2×2 pool block.
    pub fn feature_side(&self) -> usize {
        self.conv_filters.iter().fold(self.input_size, |side, _| {
            side.saturating_sub(self.kernel_size.saturating_sub(1)) / 2
        })
    }

    /// Flattened encoder feature length fed to the dense layer.
    pub fn flattened_len(&self) -> usize {
        let channels = self.conv_filters.last().copied().unwrap_or(0);
        channels * self.feature_side() * self.feature_side()
    }
}
