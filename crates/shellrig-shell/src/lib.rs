#![allow(clippy::missing_errors_doc)]

mod config;
mod detect;
mod plan;
mod validate;

pub use config::{ConfigError, ShellConfig, existing_config_path};
pub use detect::{ShellInfo, ShellType, detect_shells, login_shell};
pub use plan::{BackupPlan, GENERAL_BACKUP_PATHS, backup_plan, backup_shell_configs};
pub use validate::{
    ConfigIssue, IssueSeverity, validate_p10k_config, validate_shell_config, validate_zshrc,
};
