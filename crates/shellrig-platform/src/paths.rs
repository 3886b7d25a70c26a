use std::path::{Path, PathBuf};
use thiserror::Error;

const APP_DIR_NAME: &str = "shellrig";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PathsError {
    #[error("Could not determine home directory")]
    HomeDirUnavailable,
    #[error("Could not determine config directory")]
    ConfigDirUnavailable,
    #[error("Could not determine data directory")]
    DataDirUnavailable,
}

/// Locations owned by shellrig itself (settings and logs).
pub struct AppPaths {
    pub config_dir: PathBuf,
    pub data_dir: PathBuf,
}

impl AppPaths {
    /// Build application paths for the current platform.
    ///
    /// # Errors
    /// Returns an error when the user config or data directory cannot be
    /// determined.
    pub fn new() -> Result<Self, PathsError> {
        #[cfg(target_os = "macos")]
        {
            let home = dirs::home_dir().ok_or(PathsError::HomeDirUnavailable)?;
            Ok(Self {
                config_dir: home.join("Library/Application Support").join(APP_DIR_NAME),
                data_dir: home.join("Library/Application Support").join(APP_DIR_NAME),
            })
        }

        #[cfg(not(target_os = "macos"))]
        {
            Ok(Self {
                config_dir: dirs::config_dir()
                    .ok_or(PathsError::ConfigDirUnavailable)?
                    .join(APP_DIR_NAME),
                data_dir: dirs::data_dir()
                    .ok_or(PathsError::DataDirUnavailable)?
                    .join(APP_DIR_NAME),
            })
        }
    }

    #[must_use]
    pub fn settings_file(&self) -> PathBuf {
        self.config_dir.join("settings.json")
    }

    #[must_use]
    pub fn log_file(&self) -> PathBuf {
        self.data_dir.join("debug.log")
    }

    /// Ensure all application directories exist on disk.
    ///
    /// # Errors
    /// Returns an error if any directory cannot be created.
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.config_dir)?;
        std::fs::create_dir_all(&self.data_dir)?;
        Ok(())
    }
}

/// The user's home directory and the Backup Root beneath it.
///
/// Shell configuration always lives under `~/.config` regardless of the
/// platform convention, so the Backup Root does not come from
/// `dirs::config_dir`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomePaths {
    pub home: PathBuf,
    pub backup_root: PathBuf,
}

impl HomePaths {
    /// Resolve the current user's home directory.
    ///
    /// # Errors
    /// Returns [`PathsError::HomeDirUnavailable`] when no home directory is
    /// known for the current user.
    pub fn new() -> Result<Self, PathsError> {
        let home = dirs::home_dir().ok_or(PathsError::HomeDirUnavailable)?;
        Ok(Self::with_home(home))
    }

    #[must_use]
    pub fn with_home(home: impl Into<PathBuf>) -> Self {
        let home = home.into();
        let backup_root = home.join(".config");
        Self { home, backup_root }
    }

    #[must_use]
    pub fn with_backup_root(mut self, backup_root: impl Into<PathBuf>) -> Self {
        self.backup_root = backup_root.into();
        log::debug!("Backup root overridden: {}", self.backup_root.display());
        self
    }

    /// Resolve a home-relative specifier such as `~/.zshrc`, `.zshrc` or
    /// `.config/fish` against the home directory.
    #[must_use]
    pub fn resolve(&self, relative: &str) -> PathBuf {
        self.home.join(strip_home_prefix(relative))
    }
}

/// Strip a leading `~/` (or a bare `~`) and any leading separators so the
/// result can be joined onto a home directory.
#[must_use]
pub fn strip_home_prefix(relative: &str) -> &Path {
    let trimmed = relative
        .strip_prefix("~/")
        .or_else(|| relative.strip_prefix('~'))
        .unwrap_or(relative);
    Path::new(trimmed.trim_start_matches(['/', '\\']))
}
