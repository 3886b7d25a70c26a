use crate::detect::ShellType;
use shellrig_platform::HomePaths;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub struct ShellConfig {
    pub shell_type: ShellType,
    pub config_path: PathBuf,
    pub content: String,
}

impl ShellConfig {
    /// Read a config file. A missing file loads as empty content.
    pub fn load(shell_type: ShellType, config_path: PathBuf) -> Result<Self, ConfigError> {
        let content = if config_path.exists() {
            fs::read_to_string(&config_path)?
        } else {
            String::new()
        };

        Ok(Self {
            shell_type,
            config_path,
            content,
        })
    }

    #[must_use]
    pub fn contains(&self, marker: &str) -> bool {
        self.content.contains(marker)
    }
}

#[must_use]
pub fn existing_config_path(paths: &HomePaths, shell_type: ShellType) -> Option<PathBuf> {
    shell_type
        .config_files()
        .iter()
        .map(|relative| paths.resolve(relative))
        .find(|path| path.is_file())
}

#[cfg(test)]
mod tests {
    use super::{ShellConfig, existing_config_path};
    use crate::detect::ShellType;
    use shellrig_platform::HomePaths;

    #[test]
    fn load_missing_file_yields_empty_content() {
        let home = tempfile::tempdir().expect("create temp home");
        let config = ShellConfig::load(ShellType::Bash, home.path().join(".bashrc"))
            .expect("load missing config");

        assert!(config.content.is_empty());
        assert!(!config.contains("export"));
    }

    #[test]
    fn existing_config_path_prefers_primary_file() {
        let home = tempfile::tempdir().expect("create temp home");
        std::fs::write(home.path().join(".bashrc"), "export A=1\n").expect("write bashrc");
        std::fs::write(home.path().join(".bash_profile"), "source ~/.bashrc\n")
            .expect("write bash_profile");
        let paths = HomePaths::with_home(home.path());

        assert!(
            existing_config_path(&paths, ShellType::Bash)
                .is_some_and(|path| path.ends_with(".bashrc"))
        );
    }

    #[test]
    fn existing_config_path_falls_back_to_secondary_file() {
        let home = tempfile::tempdir().expect("create temp home");
        std::fs::write(home.path().join(".zprofile"), "path+=(~/bin)\n").expect("write zprofile");
        let paths = HomePaths::with_home(home.path());

        assert!(
            existing_config_path(&paths, ShellType::Zsh)
                .is_some_and(|path| path.ends_with(".zprofile"))
        );
    }

    #[test]
    fn existing_config_path_is_none_without_config() {
        let home = tempfile::tempdir().expect("create temp home");
        let paths = HomePaths::with_home(home.path());

        assert!(existing_config_path(&paths, ShellType::Fish).is_none());
    }
}
