use log::debug;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShellType {
    Bash,
    Zsh,
    Fish,
    Nushell,
}

impl ShellType {
    pub const ALL: [ShellType; 4] = [Self::Bash, Self::Zsh, Self::Fish, Self::Nushell];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bash => "bash",
            Self::Zsh => "zsh",
            Self::Fish => "fish",
            Self::Nushell => "nushell",
        }
    }

    #[must_use]
    pub const fn binary(self) -> &'static str {
        match self {
            Self::Bash => "bash",
            Self::Zsh => "zsh",
            Self::Fish => "fish",
            Self::Nushell => "nu",
        }
    }

    /// Case-insensitive; accepts the binary name as well (`nu`).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|shell| shell.name() == name || shell.binary() == name)
    }

    /// Home-relative config files, primary first.
    #[must_use]
    pub const fn config_files(self) -> &'static [&'static str] {
        match self {
            Self::Bash => &[".bashrc", ".bash_profile"],
            Self::Zsh => &[".zshrc", ".zprofile"],
            Self::Fish => &[".config/fish/config.fish"],
            Self::Nushell => &[".config/nushell/config.nu", ".config/nushell/env.nu"],
        }
    }

    /// Home-relative paths that make up this shell's setup, including
    /// framework directories and history.
    #[must_use]
    pub const fn backup_paths(self) -> &'static [&'static str] {
        match self {
            Self::Bash => &[
                ".bashrc",
                ".bash_profile",
                ".bash_history",
                ".bash_it",
                ".bash_aliases",
            ],
            Self::Zsh => &[".zshrc", ".zsh_history", ".oh-my-zsh", ".p10k.zsh"],
            Self::Fish => &[".config/fish"],
            Self::Nushell => &[".config/nushell"],
        }
    }

    /// Archive category used for this shell's backups.
    #[must_use]
    pub fn backup_category(self) -> String {
        format!("{}-shell", self.name())
    }
}

impl std::fmt::Display for ShellType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellInfo {
    pub shell_type: ShellType,
    pub path: Option<PathBuf>,
    pub is_login_shell: bool,
}

/// Report every known shell with its install location and whether it is
/// the current login shell.
#[must_use]
pub fn detect_shells() -> Vec<ShellInfo> {
    let login = login_shell();
    ShellType::ALL
        .into_iter()
        .map(|shell_type| {
            let path = which::which(shell_type.binary()).ok();
            debug!("Detected {shell_type}: {path:?}");
            ShellInfo {
                shell_type,
                path,
                is_login_shell: login == Some(shell_type),
            }
        })
        .collect()
}

/// The shell named by `$SHELL`, if it is one we know.
#[must_use]
pub fn login_shell() -> Option<ShellType> {
    let shell = std::env::var_os("SHELL")?;
    shell_from_path(Path::new(&shell))
}

fn shell_from_path(path: &Path) -> Option<ShellType> {
    let binary = path.file_name()?.to_str()?;
    ShellType::from_name(binary)
}
