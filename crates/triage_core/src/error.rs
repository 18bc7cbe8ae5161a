use serde::Serialize;
use std::path::PathBuf;

/// Errors raised while turning an image file into statistics.
#[derive(Debug, thiserror::Error)]
pub enum AnalyzeError {
    /// Missing or unreadable file.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// Unsupported format or corrupt data.
    #[error(transparent)]
    Decode(#[from] image::ImageError),
    #[error("image has no pixels ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },
}

/// Errors raised while loading classifier thresholds.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read thresholds file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid thresholds TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid threshold `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Per-image failure record. Recoverable: a batch keeps going.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{}: {message}", .path.display())]
pub struct Failure {
    pub path: PathBuf,
    /// Text of the underlying error, unchanged.
    pub message: String,
}

impl Failure {
    pub fn new(path: impl Into<PathBuf>, err: &AnalyzeError) -> Self {
        Self {
            path: path.into(),
            message: err.to_string(),
        }
    }
}
