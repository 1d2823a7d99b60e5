use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;

pub const DEFAULT_PAGE_SIZE: usize = 20;
pub const DEFAULT_SCREENS_TO_LOAD_NEXT_PAGE: f32 = 2.5;
pub const DEFAULT_MAX_LINES: u32 = 3;

/// Tunables for the review list. Every field has a default, so a config file
/// only needs to name the values it overrides.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewsConfig {
    /// Rows requested per page; the pagination cursor advances by this much.
    pub page_size: usize,
    /// Prefetch when fewer than this many viewport heights remain below the
    /// scroll target.
    pub screens_to_load_next_page: f32,
    /// Line cap applied to new review rows until "show more" is tapped.
    pub default_max_lines: u32,
    pub photo: PhotoDecodeConfig,
}

impl Default for ReviewsConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            screens_to_load_next_page: DEFAULT_SCREENS_TO_LOAD_NEXT_PAGE,
            default_max_lines: DEFAULT_MAX_LINES,
            photo: PhotoDecodeConfig::default(),
        }
    }
}

impl ReviewsConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading reviews config");
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::Invalid {
                field: "page_size",
                reason: "must be greater than zero".into(),
            });
        }
        if !self.screens_to_load_next_page.is_finite() || self.screens_to_load_next_page < 0.0 {
            return Err(ConfigError::Invalid {
                field: "screens_to_load_next_page",
                reason: format!(
                    "must be a non-negative finite number, got {}",
                    self.screens_to_load_next_page
                ),
            });
        }
        self.photo.validate()
    }
}

/// Bounds applied when decoding fetched photo bytes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhotoDecodeConfig {
    pub max_input_bytes: usize,
    pub max_dimension: u32,
    pub max_alloc_bytes: u64,
    pub max_image_pixels: u64,
}

impl Default for PhotoDecodeConfig {
    fn default() -> Self {
        Self {
            max_input_bytes: 10 * 1024 * 1024,
            max_dimension: 4096,
            max_alloc_bytes: 128 * 1024 * 1024,
            max_image_pixels: 16_000_000,
        }
    }
}

impl PhotoDecodeConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_input_bytes == 0 {
            return Err(ConfigError::Invalid {
                field: "photo.max_input_bytes",
                reason: "must be greater than zero".into(),
            });
        }
        if self.max_dimension == 0 {
            return Err(ConfigError::Invalid {
                field: "photo.max_dimension",
                reason: "must be greater than zero".into(),
            });
        }
        Ok(())
    }
}
