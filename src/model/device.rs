use std::str::FromStr;

use candle_core::Device;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::error::ModelError;

/// Where the similarity model should run (`SIGCHECK_DEVICE`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DevicePreference {
    /// First available GPU backend, else CPU.
    #[default]
    Auto,
    Cpu,
    /// A GPU backend or nothing: startup fails without one.
    Gpu,
}

impl FromStr for DevicePreference {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "cpu" => Ok(Self::Cpu),
            "gpu" => Ok(Self::Gpu),
            other => Err(format!("unknown device '{other}' (expected auto, cpu or gpu)")),
        }
    }
}

impl std::fmt::Display for DevicePreference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Auto => f.write_str("auto"),
            Self::Cpu => f.write_str("cpu"),
            Self::Gpu => f.write_str("gpu"),
        }
    }
}

/// Resolves `preference` to a candle device.
///
/// GPU backends are only tried when compiled in (`metal`, `cuda` features).
pub fn select_device(preference: DevicePreference) -> Result<Device, ModelError> {
    if preference == DevicePreference::Cpu {
        info!("Similarity model pinned to CPU");
        return Ok(Device::Cpu);
    }

    match open_gpu() {
        Ok(device) => Ok(device),
        Err(reason) if preference == DevicePreference::Gpu => {
            Err(ModelError::DeviceUnavailable { preference, reason })
        }
        Err(reason) => {
            warn!(reason = %reason, "No GPU for similarity model, using CPU");
            Ok(Device::Cpu)
        }
    }
}

/// Metal first, then CUDA. The error lists every backend that was tried.
fn open_gpu() -> Result<Device, String> {
    #[allow(unused_mut)]
    let mut failures: Vec<String> = Vec::new();

    #[cfg(feature = "metal")]
    {
        match Device::new_metal(0) {
            Ok(device) => {
                info!("Similarity model running on Metal");
                return Ok(device);
            }
            Err(e) => failures.push(format!("metal: {e}")),
        }
    }

    #[cfg(feature = "cuda")]
    {
        match Device::new_cuda(0) {
            Ok(device) => {
                info!("Similarity model running on CUDA");
                return Ok(device);
            }
            Err(e) => failures.push(format!("cuda: {e}")),
        }
    }

    if failures.is_empty() {
        Err("no GPU backend compiled in".to_string())
    } else {
        Err(failures.join("; "))
    }
}
