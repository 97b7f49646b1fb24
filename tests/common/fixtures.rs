//! Test fixtures for integration tests.

use std::path::{Path, PathBuf};

use candle_core::{DType, Device};
use candle_nn::{VarBuilder, VarMap};
use image::{Rgb, RgbImage};
use sigcheck::model::{CONFIG_FILE, WEIGHTS_FILE};
use sigcheck::{SiameseConfig, SiameseModel};

pub const PAPER: [u8; 3] = [248, 246, 240];

pub const INK: [u8; 3] = [20, 24, 60];

/// Draws a synthetic signature: a sine-like stroke on a paper background.
#[derive(Debug, Clone)]
pub struct SignatureImageBuilder {
    width: u32,
    height: u32,
    background: [u8; 3],
    ink: [u8; 3],
    frequency: f32,
    stroke: u32,
}

impl Default for SignatureImageBuilder {
    fn default() -> Self {
        Self {
            width: 320,
            height: 120,
            background: PAPER,
            ink: INK,
            frequency: 3.0,
            stroke: 4,
        }
    }
}

impl SignatureImageBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn background(mut self, color: [u8; 3]) -> Self {
        self.background = color;
        self
    }

    pub fn ink(mut self, color: [u8; 3]) -> Self {
        self.ink = color;
        self
    }

    pub fn frequency(mut self, frequency: f32) -> Self {
        self.frequency = frequency;
        self
    }

    pub fn build(&self) -> RgbImage {
        let (w, h) = (self.width as f32, self.height as f32);
        RgbImage::from_fn(self.width, self.height, |x, y| {
            let t = x as f32 / w * std::f32::consts::TAU * self.frequency;
            let center = h / 2.0 + t.sin() * h / 4.0;
            if (y as f32 - center).abs() <= self.stroke as f32 {
                Rgb(self.ink)
            } else {
                Rgb(self.background)
            }
        })
    }

    /// Saves as PNG (or whatever `name`'s extension says) under `dir`.
    pub fn write(&self, dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        self.build().save(&path).expect("fixture image should save");
        path
    }

    pub fn png_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        self.build()
            .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .expect("fixture image should encode");
        bytes
    }
}

/// Small architecture so artifact tests stay fast.
pub fn small_config() -> SiameseConfig {
    SiameseConfig {
        conv_filters: vec![4, 8],
        embedding_dim: 16,
        ..Default::default()
    }
}

/// Writes a randomly initialized artifact to `dir` and returns the in-memory twin.
pub fn write_model_artifact(dir: &Path, config: &SiameseConfig) -> SiameseModel {
    let varmap = VarMap::new();
    let vb = VarBuilder::from_varmap(&varmap, DType::F32, &Device::Cpu);
    let model =
        SiameseModel::from_var_builder(vb, config.clone()).expect("model should build");

    varmap
        .save(dir.join(WEIGHTS_FILE))
        .expect("weights should save");
    std::fs::write(
        dir.join(CONFIG_FILE),
        serde_json::to_string_pretty(config).expect("config should serialize"),
    )
    .expect("config should write");

    model
}
