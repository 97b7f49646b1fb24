use candle::{DType, Device, Result, Tensor};
use candle_core as candle;
use candle_nn::{Conv2d, Conv2dConfig, Linear, Module, VarBuilder};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

use super::SimilarityModel;
use super::config::{CONFIG_FILE, SiameseConfig, WEIGHTS_FILE};
use super::device::{DevicePreference, select_device};
use super::error::ModelError;
use crate::preprocess::{ChannelOrder, SignatureTensor};

/// Shared convolutional tower applied to both inputs.
struct Encoder {
    convs: Vec<Conv2d>,
    fc: Linear,
}

impl Encoder {
    fn load(vb: VarBuilder, config: &SiameseConfig) -> Result<Self> {
        let mut in_channels = config.input_channels;
        let mut convs = Vec::with_capacity(config.conv_filters.len());
        for (i, &out_channels) in config.conv_filters.iter().enumerate() {
            convs.push(candle_nn::conv2d(
                in_channels,
                out_channels,
                config.kernel_size,
                Conv2dConfig::default(),
                vb.pp(format!("conv{i}")),
            )?);
            in_channels = out_channels;
        }

        let fc = candle_nn::linear(config.flattened_len(), config.embedding_dim, vb.pp("fc"))?;

        Ok(Self { convs, fc })
    }

    /// `(B, H, W, C)` in, `(B, embedding_dim)` out.
    fn forward(&self, xs: &Tensor) -> Result<Tensor> {
        let mut xs = xs.permute((0, 3, 1, 2))?.contiguous()?;
        for conv in &self.convs {
            xs = conv.forward(&xs)?.relu()?.max_pool2d(2)?;
        }
        self.fc.forward(&xs.flatten_from(1)?)?.relu()
    }
}

struct SiameseNetworkImpl {
    encoder: Encoder,
    head: Linear,
}

impl SiameseNetworkImpl {
    fn load(vb: VarBuilder, config: &SiameseConfig) -> Result<Self> {
        let encoder = Encoder::load(vb.pp("encoder"), config)?;
        let head = candle_nn::linear(3 * config.embedding_dim, 1, vb.pp("head"))?;
        Ok(Self { encoder, head })
    }

    fn forward(&self, first: &Tensor, second: &Tensor) -> Result<Tensor> {
        let e1 = self.encoder.forward(first)?;
        let e2 = self.encoder.forward(second)?;
        let distance = e1.sub(&e2)?.abs()?;
        let features = Tensor::cat(&[&e1, &e2, &distance], 1)?;
        candle_nn::ops::sigmoid(&self.head.forward(&features)?)
    }
}

/// Siamese CNN scoring two signatures. Cheap to clone.
#[derive(Clone)]
pub struct SiameseNetwork(Arc<SiameseNetworkImpl>);

impl SiameseNetwork {
    pub fn new(vb: VarBuilder, config: &SiameseConfig) -> Result<Self> {
        Ok(Self(Arc::new(SiameseNetworkImpl::load(vb, config)?)))
    }

    /// Returns a `(B, 1)` tensor of dissimilarities.
    pub fn forward(&self, first: &Tensor, second: &Tensor) -> Result<Tensor> {
        self.0.forward(first, second)
    }
}

/// Production [`SimilarityModel`] backed by a safetensors artifact.
pub struct SiameseModel {
    network: SiameseNetwork,
    config: SiameseConfig,
    device: Device,
    source: Option<PathBuf>,
}

impl std::fmt::Debug for SiameseModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SiameseModel")
            .field("device", &format!("{:?}", self.device))
            .field("config", &self.config)
            .field("source", &self.source)
            .finish()
    }
}

impl SiameseModel {
    /// Loads `config.json` and `model.safetensors` from `model_dir` on the
    /// first available device.
    pub fn load<P: AsRef<Path>>(model_dir: P) -> std::result::Result<Self, ModelError> {
        Self::load_on(model_dir, DevicePreference::Auto)
    }

    pub fn load_on<P: AsRef<Path>>(
        model_dir: P,
        preference: DevicePreference,
    ) -> std::result::Result<Self, ModelError> {
        let model_dir = model_dir.as_ref();
        if !model_dir.is_dir() {
            return Err(ModelError::NotFound {
                path: model_dir.to_path_buf(),
            });
        }

        let config_path = model_dir.join(CONFIG_FILE);
        if !config_path.is_file() {
            return Err(ModelError::MissingFile {
                file: CONFIG_FILE,
                path: model_dir.to_path_buf(),
            });
        }

        let weights_path = model_dir.join(WEIGHTS_FILE);
        if !weights_path.is_file() {
            return Err(ModelError::MissingFile {
                file: WEIGHTS_FILE,
                path: model_dir.to_path_buf(),
            });
        }

        let load_failed = |source: Box<dyn std::error::Error + Send + Sync>| ModelError::LoadFailed {
            path: model_dir.to_path_buf(),
            source,
        };

        let config_content =
            std::fs::read_to_string(&config_path).map_err(|e| load_failed(Box::new(e)))?;
        let config: SiameseConfig =
            serde_json::from_str(&config_content).map_err(|e| load_failed(Box::new(e)))?;
        config
            .validate()
            .map_err(|reason| ModelError::InvalidConfig { reason })?;

        let device = select_device(preference)?;
        debug!(?device, %preference, "Selected compute device for similarity model");

        info!(
            model_path = %model_dir.display(),
            conv_filters = ?config.conv_filters,
            embedding_dim = config.embedding_dim,
            channel_order = ?config.channel_order,
            "Loading similarity model"
        );

        // SAFETY: the weights file is not modified while the server runs.
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, &device)
                .map_err(|e| load_failed(Box::new(e)))?
        };
        let network = SiameseNetwork::new(vb, &config).map_err(|e| load_failed(Box::new(e)))?;

        info!("Similarity model loaded successfully");

        Ok(Self {
            network,
            config,
            device,
            source: Some(model_dir.to_path_buf()),
        })
    }

    /// Builds a model from an existing variable source (in-memory weights, tests).
    pub fn from_var_builder(
        vb: VarBuilder,
        config: SiameseConfig,
    ) -> std::result::Result<Self, ModelError> {
        config
            .validate()
            .map_err(|reason| ModelError::InvalidConfig { reason })?;
        let device = vb.device().clone();
        let network = SiameseNetwork::new(vb, &config).map_err(|e| ModelError::LoadFailed {
            path: PathBuf::new(),
            source: Box::new(e),
        })?;

        Ok(Self {
            network,
            config,
            device,
            source: None,
        })
    }

    pub fn config(&self) -> &SiameseConfig {
        &self.config
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    /// Directory the weights came from, if loaded from disk.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

impl SimilarityModel for SiameseModel {
    fn dissimilarity(
        &self,
        first: &SignatureTensor,
        second: &SignatureTensor,
    ) -> std::result::Result<f32, ModelError> {
        let first = first.to_candle(&self.device)?;
        let second = second.to_candle(&self.device)?;

        let output = self.network.forward(&first, &second)?;
        if output.elem_count() != 1 {
            return Err(ModelError::ShapeMismatch {
                expected: vec![1, 1],
                actual: output.dims().to_vec(),
            });
        }

        let score = output.flatten_all()?.to_vec1::<f32>()?[0];
        debug!(score, "Siamese forward pass");
        Ok(score)
    }

    fn channel_order(&self) -> ChannelOrder {
        self.config.channel_order
    }

    fn kind(&self) -> &'static str {
        "siamese"
    }
}
