use crate::error::Result;
use crate::utils::{load_json, save_json};
pub use crate::log_warn;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Window preferences kept between sessions in `settings.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub fullscreen: bool,
    #[serde(default = "default_resolution")]
    pub resolution: [u32; 2],
    pub save_directory: PathBuf,
}

impl Settings {
    pub fn new(save_directory: impl Into<PathBuf>) -> Self {
        Self {
            fullscreen: false,
            resolution: default_resolution(),
            save_directory: save_directory.into(),
        }
    }

    /// Loads `path`, or starts fresh with `default_dir` when the file is
    /// missing or unreadable.
    pub fn load(path: &Path, default_dir: &Path) -> Self {
        if !path.exists() {
            return Self::new(default_dir);
        }
        match load_json(path) {
            Ok(settings) => settings,
            Err(e) => {
                log_warn!("[gui] Ignoring unreadable settings {}: {}", path.display(), e);
                Self::new(default_dir)
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        save_json(self, path)
    }
}

fn default_resolution() -> [u32; 2] {
    [1100, 720]
}
