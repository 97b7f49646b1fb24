use std::path::{Path, PathBuf};
use thiserror::Error;

/// An input path did not resolve to a decodable color image.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The file could not be opened or read.
    #[error("failed to read image from {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file was read but its content is not a supported image.
    #[error("failed to decode image from {path}: {source}")]
    Undecodable {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

impl DecodeError {
    /// Path of the offending input.
    pub fn path(&self) -> &Path {
        match self {
            DecodeError::Unreadable { path, .. } | DecodeError::Undecodable { path, .. } => path,
        }
    }
}
