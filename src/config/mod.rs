//! Environment-backed configuration.
//!
//! Most settings have defaults. Override with `SIGCHECK_*` environment variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::model::DevicePreference;

/// Server configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `SIGCHECK_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port. Default: `8000`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// Directory holding the similarity model artifact
    /// (`config.json` + `model.safetensors`). Default: `models/signature_model`.
    pub model_path: PathBuf,

    /// Directory where uploads are staged during verification. Default: `./temp_signatures`.
    pub upload_dir: PathBuf,

    /// Maximum accepted request body size in bytes. Default: 10 MiB.
    pub max_upload_bytes: u64,

    /// Compute device for the model (`auto`, `cpu`, `gpu`). Default: `auto`.
    pub device: DevicePreference,
}

/// Default model artifact directory used when `SIGCHECK_MODEL_PATH` is not set.
pub const DEFAULT_MODEL_PATH: &str = "models/signature_model";

/// Default upload staging directory used when `SIGCHECK_UPLOAD_DIR` is not set.
pub const DEFAULT_UPLOAD_DIR: &str = "./temp_signatures";

/// Default request body limit (10 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8000,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            upload_dir: PathBuf::from(DEFAULT_UPLOAD_DIR),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            device: DevicePreference::Auto,
        }
    }
}

impl Config {
    const ENV_PORT: &'static str = "SIGCHECK_PORT";
    const ENV_BIND_ADDR: &'static str = "SIGCHECK_BIND_ADDR";
    const ENV_MODEL_PATH: &'static str = "SIGCHECK_MODEL_PATH";
    const ENV_UPLOAD_DIR: &'static str = "SIGCHECK_UPLOAD_DIR";
    const ENV_MAX_UPLOAD_BYTES: &'static str = "SIGCHECK_MAX_UPLOAD_BYTES";
    const ENV_DEVICE: &'static str = "SIGCHECK_DEVICE";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let model_path = Self::parse_path_from_env(Self::ENV_MODEL_PATH, defaults.model_path);
        let upload_dir = Self::parse_path_from_env(Self::ENV_UPLOAD_DIR, defaults.upload_dir);
        let max_upload_bytes =
            Self::parse_u64_from_env(Self::ENV_MAX_UPLOAD_BYTES, defaults.max_upload_bytes)?;
        let device = Self::parse_device_from_env(defaults.device)?;

        Ok(Self {
            port,
            bind_addr,
            model_path,
            upload_dir,
            max_upload_bytes,
            device,
        })
    }

    /// Validates paths and basic invariants (does not create directories).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.model_path.exists() {
            return Err(ConfigError::PathNotFound {
                path: self.model_path.clone(),
            });
        }
        if !self.model_path.is_dir() {
            return Err(ConfigError::NotADirectory {
                path: self.model_path.clone(),
            });
        }

        if self.upload_dir.exists() && !self.upload_dir.is_dir() {
            return Err(ConfigError::NotADirectory {
                path: self.upload_dir.clone(),
            });
        }

        if self.max_upload_bytes == 0 {
            return Err(ConfigError::InvalidUploadLimit {
                value: self.max_upload_bytes.to_string(),
            });
        }

        Ok(())
    }

    /// Listener address. IPv6 addresses are bracketed when displayed.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }

    /// Body limit as `usize`, saturating on 32-bit targets.
    pub fn max_upload_bytes_usize(&self) -> usize {
        usize::try_from(self.max_upload_bytes).unwrap_or(usize::MAX)
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_device_from_env(default: DevicePreference) -> Result<DevicePreference, ConfigError> {
        match env::var(Self::ENV_DEVICE) {
            Ok(value) => value
                .parse()
                .map_err(|reason| ConfigError::InvalidDevice { value, reason }),
            Err(_) => Ok(default),
        }
    }

    fn parse_path_from_env(var_name: &str, default: PathBuf) -> PathBuf {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or(default)
    }

    fn parse_u64_from_env(var_name: &'static str, default: u64) -> Result<u64, ConfigError> {
        match env::var(var_name) {
            Ok(value) => value
                .trim()
                .parse()
                .map_err(|e| ConfigError::IntParseError {
                    name: var_name,
                    value,
                    source: e,
                }),
            Err(_) => Ok(default),
        }
    }
}
