//! Classifier thresholds.
//!
//! The defaults were hand-tuned against one screenshot corpus. They are
//! overridable per run from a TOML file, any subset of keys at a time:
//!
//! ```toml
//! error_min_brightness = 210.0
//! ui_min_variance = 800.0
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Thresholds {
    /// Error page: fewer unique colors than this...
    pub error_max_colors: usize,
    /// ...and mean brightness strictly above this.
    pub error_min_brightness: f64,
    /// Loading: fewer unique colors than this...
    pub loading_max_colors: usize,
    /// ...and a dominant color share strictly above this.
    pub loading_min_common_ratio: f64,
    /// UI: more unique colors than this...
    pub ui_min_colors: usize,
    /// ...and variance strictly above this.
    pub ui_min_variance: f64,
}

impl Thresholds {
    pub const DEFAULT_ERROR_MAX_COLORS: usize = 100;
    pub const DEFAULT_ERROR_MIN_BRIGHTNESS: f64 = 200.0;
    pub const DEFAULT_LOADING_MAX_COLORS: usize = 50;
    pub const DEFAULT_LOADING_MIN_COMMON_RATIO: f64 = 0.5;
    pub const DEFAULT_UI_MIN_COLORS: usize = 200;
    pub const DEFAULT_UI_MIN_VARIANCE: f64 = 1000.0;

    /// Parse and validate thresholds from TOML text; omitted keys keep their defaults.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let thresholds: Self = toml::from_str(raw)?;
        thresholds.validate()?;
        Ok(thresholds)
    }

    /// Read a TOML file and parse it with [`Thresholds::from_toml_str`].
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let thresholds = Self::from_toml_str(&raw)?;
        tracing::debug!("Loaded thresholds from {}: {thresholds:?}", path.display());
        Ok(thresholds)
    }

    /// Reject brightness outside 0..=255, ratios outside 0..=1 and negative variance.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=255.0).contains(&self.error_min_brightness) {
            return Err(ConfigError::Invalid {
                field: "error_min_brightness",
                reason: format!("{} is outside 0..=255", self.error_min_brightness),
            });
        }
        if !(0.0..=1.0).contains(&self.loading_min_common_ratio) {
            return Err(ConfigError::Invalid {
                field: "loading_min_common_ratio",
                reason: format!("{} is outside 0..=1", self.loading_min_common_ratio),
            });
        }
        if self.ui_min_variance.is_nan() || self.ui_min_variance < 0.0 {
            return Err(ConfigError::Invalid {
                field: "ui_min_variance",
                reason: format!("{} is negative or not a number", self.ui_min_variance),
            });
        }
        Ok(())
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            error_max_colors: Self::DEFAULT_ERROR_MAX_COLORS,
            error_min_brightness: Self::DEFAULT_ERROR_MIN_BRIGHTNESS,
            loading_max_colors: Self::DEFAULT_LOADING_MAX_COLORS,
            loading_min_common_ratio: Self::DEFAULT_LOADING_MIN_COMMON_RATIO,
            ui_min_colors: Self::DEFAULT_UI_MIN_COLORS,
            ui_min_variance: Self::DEFAULT_UI_MIN_VARIANCE,
        }
    }
}
