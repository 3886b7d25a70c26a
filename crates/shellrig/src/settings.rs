use serde::{Deserialize, Serialize};
use shellrig_platform::AppPaths;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_keep_count")]
    pub keep_count: usize,

    #[serde(default)]
    pub debug_logging: bool,

    #[serde(default = "default_max_log_size_bytes")]
    pub max_log_size_bytes: u64,

    #[serde(default)]
    pub backup_root: Option<PathBuf>,

    #[serde(default)]
    pub default_shell: Option<String>,
}

fn default_keep_count() -> usize {
    5
}

fn default_max_log_size_bytes() -> u64 {
    5 * 1024 * 1024
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            keep_count: default_keep_count(),
            debug_logging: false,
            max_log_size_bytes: default_max_log_size_bytes(),
            backup_root: None,
            default_shell: None,
        }
    }
}

impl AppSettings {
    /// Load the user's settings, writing a default file on first run so
    /// the available options can be discovered.
    pub fn load() -> Self {
        let Ok(paths) = AppPaths::new() else {
            return Self::default();
        };
        let settings_path = paths.settings_file();
        if settings_path.exists() {
            return Self::load_from(&settings_path);
        }

        let settings = Self::default();
        if let Err(error) = paths
            .ensure_dirs()
            .and_then(|()| settings.save_to(&settings_path))
        {
            log::debug!("Could not write default settings: {error}");
        }
        settings
    }

    /// Unreadable or malformed files fall back to defaults.
    pub fn load_from(settings_path: &Path) -> Self {
        if !settings_path.exists() {
            return Self::default();
        }
        match std::fs::read_to_string(settings_path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    pub fn save_to(&self, settings_path: &Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(settings_path, content)
    }
}
