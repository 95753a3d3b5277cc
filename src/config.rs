//! User-tunable settings.
//!
//! Settings load from `spincrate.json` next to the executable first, then
//! from the per-user config directory. Both are optional; anything missing
//! falls back to the built-in demo tuning.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpinConfig {
    pub window_width: u32,
    pub window_height: u32,
    pub fullscreen: bool,
    /// Degrees applied per rotation key press.
    pub rotation_step_degrees: f32,
    pub fov_degrees: f32,
    pub near_clip: f32,
    pub far_clip: f32,
    pub cube_scale: f32,
    pub shader_dir: PathBuf,
    pub texture_path: PathBuf,
}

impl Default for SpinConfig {
    fn default() -> Self {
        Self {
            window_width: 720,
            window_height: 576,
            fullscreen: false,
            rotation_step_degrees: 5.0,
            fov_degrees: 45.0,
            near_clip: 0.05,
            far_clip: 350.0,
            cube_scale: 0.2,
            shader_dir: PathBuf::from("shaders"),
            texture_path: PathBuf::from("textures/crate.bmp"),
        }
    }
}

impl SpinConfig {
    /// The per-user config file, under the platform config directory.
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("spincrate").join("spincrate.json"))
    }

    fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Loads the first config file found. A file that exists but fails to
    /// parse is reported and ignored rather than aborting the demo.
    pub fn load() -> Self {
        let mut candidates = vec![PathBuf::from("spincrate.json")];
        if let Some(path) = Self::user_config_path() {
            candidates.push(path);
        }
        for path in candidates {
            let Ok(text) = std::fs::read_to_string(&path) else {
                continue;
            };
            match Self::parse(&text) {
                Ok(config) => {
                    log::info!("loaded settings from {}", path.display());
                    return config;
                }
                Err(e) => {
                    log::warn!("ignoring malformed settings {}: {e}", path.display());
                    return Self::default();
                }
            }
        }
        Self::default()
    }
}
