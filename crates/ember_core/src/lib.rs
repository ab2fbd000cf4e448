//! Ember Core - settings, the reference scene and image output.
//!
//! This crate provides everything around the path tracer that is not
//! rendering itself:
//!
//! - **Settings**: `RenderSettings` with JSON persistence and default fallback
//! - **Scene presets**: the seeded random sphere field and its camera
//! - **Output**: PPM and `image`-crate writers for a finished `Framebuffer`
//!
//! # Example
//!
//! ```ignore
//! use ember_core::{random_scene, reference_camera, RenderSettings, SceneOptions};
//!
//! let settings = RenderSettings::load_or_create("ember.json");
//! let scene = random_scene(settings.seed, &SceneOptions::default());
//! let camera = reference_camera(settings.aspect_ratio);
//! ```

pub mod config;
pub mod output;
pub mod scene;

// Re-export commonly used types
pub use config::{ConfigError, ConfigResult, RenderSettings};
pub use output::{save, write_ppm, OutputError, OutputResult};
pub use scene::{random_scene, reference_camera, MaterialSplit, SceneOptions};
