//! Runtime tunables for the cropper.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::CropperError;

/// Smallest allowed crop side in display pixels.
pub const MIN_SIZE: f32 = 50.0;
/// Quiescence window for resize/scroll triggered relayouts.
pub const RELAYOUT_DEBOUNCE_MS: u64 = 100;
/// Hit radius around a frame corner that grabs the resize handle.
pub const HANDLE_TOLERANCE: f32 = 10.0;
/// Free space kept around the image area by the front end.
pub const CONTAINER_PADDING: f32 = 20.0;

/// Default file name looked up next to the binary's working directory.
pub const CONFIG_FILE_NAME: &str = "square_cropper.toml";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CropperConfig {
    pub min_size: f32,
    pub relayout_debounce_ms: u64,
    pub handle_tolerance: f32,
    pub container_padding: f32,
}

impl Default for CropperConfig {
    fn default() -> Self {
        Self {
            min_size: MIN_SIZE,
            relayout_debounce_ms: RELAYOUT_DEBOUNCE_MS,
            handle_tolerance: HANDLE_TOLERANCE,
            container_padding: CONTAINER_PADDING,
        }
    }
}

impl CropperConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, CropperError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects sizes the geometry cannot work with: `min_size` and
    /// `handle_tolerance` must be positive, `container_padding` non-negative.
    pub fn validate(&self) -> Result<(), CropperError> {
        let checks = [
            ("min_size", self.min_size, self.min_size > 0.0),
            (
                "handle_tolerance",
                self.handle_tolerance,
                self.handle_tolerance > 0.0,
            ),
            (
                "container_padding",
                self.container_padding,
                self.container_padding >= 0.0,
            ),
        ];
        for (field, value, ok) in checks {
            if !ok || !value.is_finite() {
                return Err(CropperError::ConfigValue { field, value });
            }
        }
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, CropperError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Loads `path` if it exists, falling back to defaults otherwise.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Ignoring config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn relayout_debounce(&self) -> Duration {
        Duration::from_millis(self.relayout_debounce_ms)
    }
}
