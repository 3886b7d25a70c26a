use shellrig_backup::{BackupError, BackupManager, BackupOutcome};

use crate::detect::ShellType;

/// Paths every shell setup touches, backed up alongside the shell's own.
pub const GENERAL_BACKUP_PATHS: &[&str] = &[".profile", ".inputrc", ".config/starship.toml"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupPlan {
    pub category: String,
    pub paths: Vec<&'static str>,
}

#[must_use]
pub fn backup_plan(shell: ShellType) -> BackupPlan {
    let paths = shell
        .backup_paths()
        .iter()
        .chain(GENERAL_BACKUP_PATHS)
        .copied()
        .collect();
    BackupPlan {
        category: shell.backup_category(),
        paths,
    }
}

/// Back up everything a shell's setup would overwrite.
pub fn backup_shell_configs(
    manager: &BackupManager,
    shell: ShellType,
) -> Result<BackupOutcome, BackupError> {
    let plan = backup_plan(shell);
    log::info!("Backing up {shell} configuration ({} paths)", plan.paths.len());
    manager.create_backup(plan.paths.as_slice(), &plan.category)
}
