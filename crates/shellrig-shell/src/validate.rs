use log::debug;
use shellrig_platform::HomePaths;
use std::path::Path;

use crate::config::{ConfigError, ShellConfig};
use crate::detect::ShellType;

const P10K_CONFIG: &str = ".p10k.zsh";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueSeverity {
    Warning,
    Danger,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    pub severity: IssueSeverity,
    pub message: String,
}

impl ConfigIssue {
    fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: IssueSeverity::Warning,
            message: message.into(),
        }
    }

    fn danger(message: impl Into<String>) -> Self {
        Self {
            severity: IssueSeverity::Danger,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.severity {
            IssueSeverity::Warning => write!(f, "warning: {}", self.message),
            IssueSeverity::Danger => write!(f, "danger: {}", self.message),
        }
    }
}

fn read_config(shell_type: ShellType, path: &Path) -> Result<ShellConfig, Vec<ConfigIssue>> {
    if !path.exists() {
        return Err(vec![ConfigIssue::warning("File does not exist")]);
    }
    ShellConfig::load(shell_type, path.to_path_buf()).map_err(|error: ConfigError| {
        vec![ConfigIssue::warning(format!("Failed to read file: {error}"))]
    })
}

/// Scan a `.zshrc` for dangerous commands and half-configured frameworks.
#[must_use]
pub fn validate_zshrc(path: &Path) -> Vec<ConfigIssue> {
    let config = match read_config(ShellType::Zsh, path) {
        Ok(config) => config,
        Err(issues) => return issues,
    };

    let mut issues = Vec::new();
    if config.contains("rm -rf /") {
        issues.push(ConfigIssue::danger("Dangerous rm command found"));
    }
    if config.contains("source /dev/null") {
        issues.push(ConfigIssue::danger("Suspicious source command found"));
    }
    if config.contains(".oh-my-zsh") {
        if !config.contains("ZSH=") {
            issues.push(ConfigIssue::warning(
                "Oh My Zsh referenced but ZSH variable not set",
            ));
        }
        if !config.contains("ZSH_THEME=") {
            issues.push(ConfigIssue::warning(
                "Oh My Zsh installed but no theme configured",
            ));
        }
    }
    issues
}

/// Check that a `.p10k.zsh` actually configures Powerlevel10k.
#[must_use]
pub fn validate_p10k_config(path: &Path) -> Vec<ConfigIssue> {
    let config = match read_config(ShellType::Zsh, path) {
        Ok(config) => config,
        Err(issues) => return issues,
    };

    let mut issues = Vec::new();
    if !config.contains("POWERLEVEL9K_") {
        issues.push(ConfigIssue::warning("No Powerlevel10k configuration found"));
    }
    if !config.contains("typeset -g POWERLEVEL9K_LEFT_PROMPT_ELEMENTS") {
        issues.push(ConfigIssue::warning("Left prompt elements not configured"));
    }
    issues
}

/// Validate a shell's primary config file. Zsh additionally gets its
/// Powerlevel10k config checked when one exists.
#[must_use]
pub fn validate_shell_config(paths: &HomePaths, shell_type: ShellType) -> Vec<ConfigIssue> {
    let primary = paths.resolve(shell_type.config_files()[0]);
    debug!("Validating {shell_type} config at {}", primary.display());

    match shell_type {
        ShellType::Zsh => {
            let mut issues = validate_zshrc(&primary);
            let p10k = paths.resolve(P10K_CONFIG);
            if p10k.exists() {
                issues.extend(validate_p10k_config(&p10k).into_iter().map(|issue| {
                    ConfigIssue {
                        message: format!("{P10K_CONFIG}: {}", issue.message),
                        ..issue
                    }
                }));
            }
            issues
        }
        ShellType::Bash | ShellType::Fish | ShellType::Nushell => {
            match read_config(shell_type, &primary) {
                Ok(config) if config.contains("rm -rf /") => {
                    vec![ConfigIssue::danger("Dangerous rm command found")]
                }
                Ok(_) => Vec::new(),
                Err(issues) => issues,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{IssueSeverity, validate_p10k_config, validate_shell_config, validate_zshrc};
    use crate::detect::ShellType;
    use shellrig_platform::HomePaths;
    use std::fs;

    fn messages(issues: &[super::ConfigIssue]) -> Vec<&str> {
        issues.iter().map(|issue| issue.message.as_str()).collect()
    }

    #[test]
    fn missing_zshrc_is_reported() {
        let home = tempfile::tempdir().expect("create temp home");

        let issues = validate_zshrc(&home.path().join(".zshrc"));

        assert_eq!(messages(&issues), vec!["File does not exist"]);
    }

    #[test]
    fn dangerous_commands_are_flagged() {
        let home = tempfile::tempdir().expect("create temp home");
        let zshrc = home.path().join(".zshrc");
        fs::write(&zshrc, "alias nuke='rm -rf /'\nsource /dev/null\n").expect("write zshrc");

        let issues = validate_zshrc(&zshrc);

        assert_eq!(
            messages(&issues),
            vec!["Dangerous rm command found", "Suspicious source command found"]
        );
        assert!(
            issues
                .iter()
                .all(|issue| issue.severity == IssueSeverity::Danger)
        );
    }

    #[test]
    fn half_configured_oh_my_zsh_is_flagged() {
        let home = tempfile::tempdir().expect("create temp home");
        let zshrc = home.path().join(".zshrc");
        fs::write(&zshrc, "source $HOME/.oh-my-zsh/oh-my-zsh.sh\n").expect("write zshrc");

        let issues = validate_zshrc(&zshrc);

        assert_eq!(
            messages(&issues),
            vec![
                "Oh My Zsh referenced but ZSH variable not set",
                "Oh My Zsh installed but no theme configured"
            ]
        );
    }

    #[test]
    fn complete_oh_my_zsh_setup_is_clean() {
        let home = tempfile::tempdir().expect("create temp home");
        let zshrc = home.path().join(".zshrc");
        fs::write(
            &zshrc,
            "export ZSH=\"$HOME/.oh-my-zsh\"\nZSH_THEME=\"powerlevel10k/powerlevel10k\"\nsource $ZSH/oh-my-zsh.sh\n",
        )
        .expect("write zshrc");

        assert!(validate_zshrc(&zshrc).is_empty());
    }

    #[test]
    fn p10k_without_prompt_elements_is_flagged() {
        let home = tempfile::tempdir().expect("create temp home");
        let p10k = home.path().join(".p10k.zsh");
        fs::write(&p10k, "typeset -g POWERLEVEL9K_MODE=nerdfont-complete\n").expect("write p10k");

        let issues = validate_p10k_config(&p10k);

        assert_eq!(messages(&issues), vec!["Left prompt elements not configured"]);
    }

    #[test]
    fn zsh_validation_includes_p10k_issues_with_prefix() {
        let home = tempfile::tempdir().expect("create temp home");
        fs::write(
            home.path().join(".zshrc"),
            "ZSH=~/.oh-my-zsh\nZSH_THEME=robbyrussell\n",
        )
        .expect("write zshrc");
        fs::write(home.path().join(".p10k.zsh"), "# empty\n").expect("write p10k");
        let paths = HomePaths::with_home(home.path());

        let issues = validate_shell_config(&paths, ShellType::Zsh);

        assert_eq!(
            messages(&issues),
            vec![
                ".p10k.zsh: No Powerlevel10k configuration found",
                ".p10k.zsh: Left prompt elements not configured"
            ]
        );
    }

    #[test]
    fn bash_validation_only_checks_for_dangerous_commands() {
        let home = tempfile::tempdir().expect("create temp home");
        fs::write(home.path().join(".bashrc"), "export PATH=$PATH:~/bin\n").expect("write bashrc");
        let paths = HomePaths::with_home(home.path());

        assert!(validate_shell_config(&paths, ShellType::Bash).is_empty());
    }
}
