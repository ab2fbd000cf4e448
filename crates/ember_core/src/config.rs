//! Render settings and their on-disk JSON form.
//!
//! Loading never aborts a render: a missing file is replaced by a freshly
//! written default file, and unreadable or out-of-range values fall back to
//! their defaults with a warning.

use std::fs;
use std::path::Path;

use ember_renderer::RenderConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::scene::MaterialSplit;

/// Errors that can occur while reading or writing settings.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid settings file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Result type for settings operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Recognized render options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Image width / height
    pub aspect_ratio: f64,
    /// Image width in pixels; the height is derived from the aspect ratio
    pub image_width: u32,
    pub samples_per_pixel: u32,
    /// Bounce budget per camera ray
    pub max_depth: u32,
    /// Render on a worker pool instead of the calling thread
    pub use_threading: bool,
    /// Worker count; `None` uses every hardware thread
    pub threads: Option<usize>,
    /// Seed for scene generation and sampling
    pub seed: u64,
    /// Diffuse/metal/glass split of the random spheres
    pub material_split: MaterialSplit,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            aspect_ratio: 16.0 / 9.0,
            image_width: 400,
            samples_per_pixel: 10,
            max_depth: 50,
            use_threading: true,
            threads: None,
            seed: 1234,
            material_split: MaterialSplit::default(),
        }
    }
}

impl RenderSettings {
    /// Image height: width / aspect ratio, truncated, and never below 1.
    pub fn image_height(&self) -> u32 {
        ((f64::from(self.image_width) / self.aspect_ratio) as u32).max(1)
    }

    /// The subset of settings the path tracer consumes.
    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            samples_per_pixel: self.samples_per_pixel,
            max_depth: self.max_depth,
            seed: self.seed,
        }
    }

    /// Replace every out-of-range field with its default, warning about each.
    pub fn validated(mut self) -> Self {
        let defaults = Self::default();

        if !self.aspect_ratio.is_finite() || self.aspect_ratio <= 0.0 {
            log::warn!(
                "aspect_ratio {} is invalid, using {}",
                self.aspect_ratio,
                defaults.aspect_ratio
            );
            self.aspect_ratio = defaults.aspect_ratio;
        }
        if self.image_width == 0 {
            log::warn!("image_width must be positive, using {}", defaults.image_width);
            self.image_width = defaults.image_width;
        }
        if self.samples_per_pixel == 0 {
            log::warn!(
                "samples_per_pixel must be positive, using {}",
                defaults.samples_per_pixel
            );
            self.samples_per_pixel = defaults.samples_per_pixel;
        }
        if self.max_depth == 0 {
            log::warn!("max_depth must be positive, using {}", defaults.max_depth);
            self.max_depth = defaults.max_depth;
        }
        if self.threads == Some(0) {
            log::warn!("threads must be positive, using hardware concurrency");
            self.threads = None;
        }
        if !self.material_split.is_valid() {
            log::warn!(
                "material_split {:?} is invalid, using {:?}",
                self.material_split,
                defaults.material_split
            );
            self.material_split = defaults.material_split;
        }

        self
    }

    /// Read settings from a JSON file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let text = fs::read_to_string(path)?;
        let settings: Self = serde_json::from_str(&text)?;
        Ok(settings.validated())
    }

    /// Write settings as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> ConfigResult<()> {
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text + "\n")?;
        Ok(())
    }

    /// Load settings, falling back to defaults instead of failing.
    ///
    /// If the file does not exist, a default file is written in its place so
    /// the user has something to edit.
    pub fn load_or_create(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            log::info!(
                "Couldn't find settings at '{}', using default values",
                path.display()
            );
            let defaults = Self::default();
            match defaults.save(path) {
                Ok(()) => log::info!("Created '{}' with default settings", path.display()),
                Err(err) => log::warn!("Couldn't write '{}': {}", path.display(), err),
            }
            return defaults;
        }

        match Self::load(path) {
            Ok(settings) => {
                log::debug!("Loaded settings from '{}': {:?}", path.display(), settings);
                settings
            }
            Err(err) => {
                log::warn!(
                    "Couldn't read settings from '{}' ({}), using default values",
                    path.display(),
                    err
                );
                Self::default()
            }
        }
    }
}
