use log::info;
use shellrig_backup::{BackupArchive, BackupManager, BackupOutcome, EntryError};
use shellrig_platform::HomePaths;
use shellrig_shell::{
    IssueSeverity, ShellType, backup_shell_configs, detect_shells, existing_config_path,
    login_shell, validate_shell_config,
};
use std::io::Write;
use std::path::PathBuf;

use crate::cli::Commands;
use crate::error::AppError;
use crate::settings::AppSettings;

const DISPLAY_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Whether a command finished without any per-entry failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Clean,
    HadErrors,
}

impl Status {
    fn from_errors(errors: &[EntryError]) -> Self {
        if errors.is_empty() {
            Self::Clean
        } else {
            Self::HadErrors
        }
    }
}

pub struct Context {
    pub paths: HomePaths,
    pub settings: AppSettings,
}

impl Context {
    /// Command-line overrides win over the settings file.
    pub fn new(
        home: Option<PathBuf>,
        backup_root: Option<PathBuf>,
        settings: AppSettings,
    ) -> Result<Self, AppError> {
        let mut paths = match home {
            Some(home) => HomePaths::with_home(home),
            None => HomePaths::new().map_err(AppError::environment_unavailable)?,
        };
        if let Some(backup_root) = backup_root.or_else(|| settings.backup_root.clone()) {
            paths = paths.with_backup_root(backup_root);
        }
        Ok(Self { paths, settings })
    }

    fn manager(&self) -> BackupManager {
        BackupManager::new(self.paths.clone())
    }

    /// `--shell`, then the `default_shell` setting, then `$SHELL`.
    fn resolve_shell(&self, requested: Option<&str>) -> Result<ShellType, AppError> {
        let name = requested.or(self.settings.default_shell.as_deref());
        match name {
            Some(name) => ShellType::from_name(name).ok_or_else(|| AppError::unknown_shell(name)),
            None => login_shell().ok_or(AppError::NoShellSelected),
        }
    }
}

pub fn run(
    command: Commands,
    context: &Context,
    out: &mut impl Write,
) -> Result<Status, AppError> {
    match command {
        Commands::Backup {
            shell,
            category,
            prune,
            paths,
        } => backup(context, shell.as_deref(), &category, prune, &paths, out),
        Commands::List { category } => list(context, category.as_deref(), out),
        Commands::Restore {
            name,
            category,
            only,
        } => restore(context, &name, category.as_deref(), &only, out),
        Commands::Clean { category, keep } => clean(context, &category, keep, out),
        Commands::Info { name } => show_info(context, &name, out),
        Commands::Validate { shell } => validate(context, shell.as_deref(), out),
        Commands::Shells => shells(context, out),
    }
}

fn write_errors(out: &mut impl Write, errors: &[EntryError]) -> Result<(), AppError> {
    for error in errors {
        writeln!(out, "  ! {error}")?;
    }
    Ok(())
}

fn find_archive(
    manager: &BackupManager,
    name: &str,
    category: Option<&str>,
) -> Result<BackupArchive, AppError> {
    if name == "latest" {
        let archives = manager
            .list_backups(category)
            .map_err(|error| AppError::operation_failed("Listing backups", error))?;
        return archives
            .into_iter()
            .next()
            .ok_or_else(|| AppError::no_backups(category));
    }
    manager
        .find_backup(name)
        .ok_or_else(|| AppError::archive_not_found(name))
}

fn backup(
    context: &Context,
    shell: Option<&str>,
    category: &str,
    prune: bool,
    paths: &[String],
    out: &mut impl Write,
) -> Result<Status, AppError> {
    let manager = context.manager();
    let outcome = if paths.is_empty() {
        let shell = context.resolve_shell(shell)?;
        backup_shell_configs(&manager, shell)
    } else {
        manager.create_backup(paths, category)
    }
    .map_err(|error| AppError::operation_failed("Backup", error))?;

    let mut errors = outcome.errors().to_vec();
    match &outcome {
        BackupOutcome::Created {
            archive, entries, ..
        } => {
            writeln!(out, "Created backup {}", archive.root().display())?;
            for entry in entries {
                let suffix = if entry.is_dir { "/" } else { "" };
                writeln!(out, "  - {}{suffix}", entry.name)?;
            }
        }
        BackupOutcome::NothingToBackUp { .. } => writeln!(out, "Nothing to back up")?,
    }
    write_errors(out, outcome.errors())?;

    if prune && let Some(archive) = outcome.archive() {
        let report = manager
            .clean_old_backups(archive.category(), context.settings.keep_count)
            .map_err(|error| AppError::operation_failed("Pruning backups", error))?;
        if report.removed_count() > 0 {
            writeln!(out, "Pruned {} old backup(s)", report.removed_count())?;
        }
        write_errors(out, &report.errors)?;
        errors.extend(report.errors);
    }

    Ok(Status::from_errors(&errors))
}

fn list(
    context: &Context,
    category: Option<&str>,
    out: &mut impl Write,
) -> Result<Status, AppError> {
    let archives = context
        .manager()
        .list_backups(category)
        .map_err(|error| AppError::operation_failed("Listing backups", error))?;

    if archives.is_empty() {
        writeln!(out, "No backups found")?;
    }
    for archive in archives {
        writeln!(
            out,
            "{}  {}",
            archive.timestamp().format(DISPLAY_TIME_FORMAT),
            archive.name()
        )?;
    }
    Ok(Status::Clean)
}

fn restore(
    context: &Context,
    name: &str,
    category: Option<&str>,
    only: &[String],
    out: &mut impl Write,
) -> Result<Status, AppError> {
    let manager = context.manager();
    let archive = find_archive(&manager, name, category)?;
    let selective = (!only.is_empty()).then_some(only);

    info!("Restoring {archive}");
    let report = manager
        .restore_backup(&archive, selective)
        .map_err(|error| AppError::operation_failed("Restore", error))?;

    if report.is_empty() {
        writeln!(out, "Nothing to restore from {archive}")?;
        return Ok(Status::Clean);
    }

    writeln!(out, "Restored from {archive}")?;
    for record in &report.restored {
        writeln!(out, "  - {} -> {}", record.name, record.target.display())?;
        if let Some(snapshot) = &record.pre_restore {
            writeln!(out, "    previous content saved to {}", snapshot.display())?;
        }
    }
    write_errors(out, &report.errors)?;
    Ok(Status::from_errors(&report.errors))
}

fn clean(
    context: &Context,
    category: &str,
    keep: Option<usize>,
    out: &mut impl Write,
) -> Result<Status, AppError> {
    let keep = keep.unwrap_or(context.settings.keep_count);
    let report = context
        .manager()
        .clean_old_backups(category, keep)
        .map_err(|error| AppError::operation_failed("Cleaning backups", error))?;

    writeln!(
        out,
        "Removed {} {category} backup(s), kept {}",
        report.removed_count(),
        report.kept
    )?;
    for archive in &report.removed {
        writeln!(out, "  - {archive}")?;
    }
    write_errors(out, &report.errors)?;
    Ok(Status::from_errors(&report.errors))
}

fn show_info(context: &Context, name: &str, out: &mut impl Write) -> Result<Status, AppError> {
    let manager = context.manager();
    let archive = find_archive(&manager, name, None)?;
    let info = manager
        .backup_info(&archive)
        .map_err(|error| AppError::operation_failed("Reading backup", error))?;

    writeln!(out, "Name:     {}", info.archive.name())?;
    writeln!(out, "Category: {}", info.archive.category())?;
    writeln!(
        out,
        "Created:  {}",
        info.archive.timestamp().format(DISPLAY_TIME_FORMAT)
    )?;
    writeln!(out, "Location: {}", info.archive.root().display())?;
    writeln!(out, "Size:     {} bytes", info.size_bytes)?;
    if let Some(manifest) = &info.manifest {
        writeln!(out, "Entries:")?;
        for entry in &manifest.entries {
            let suffix = if entry.is_dir { "/" } else { "" };
            match &entry.source {
                Some(source) => writeln!(out, "  - {}{suffix} (from {source})", entry.name)?,
                None => writeln!(out, "  - {}{suffix}", entry.name)?,
            }
        }
    }
    writeln!(out, "Files:")?;
    for file in &info.files {
        writeln!(out, "  {}", file.display())?;
    }
    Ok(Status::Clean)
}

fn validate(
    context: &Context,
    shell: Option<&str>,
    out: &mut impl Write,
) -> Result<Status, AppError> {
    let shell = context.resolve_shell(shell)?;
    let issues = validate_shell_config(&context.paths, shell);

    if issues.is_empty() {
        writeln!(out, "{shell}: no issues found")?;
        return Ok(Status::Clean);
    }

    writeln!(out, "{shell}: {} issue(s)", issues.len())?;
    for issue in &issues {
        writeln!(out, "  {issue}")?;
    }
    if issues
        .iter()
        .any(|issue| issue.severity == IssueSeverity::Danger)
    {
        Ok(Status::HadErrors)
    } else {
        Ok(Status::Clean)
    }
}

fn shells(context: &Context, out: &mut impl Write) -> Result<Status, AppError> {
    for shell in detect_shells() {
        let location = shell
            .path
            .as_ref()
            .map_or_else(|| "not installed".to_string(), |path| path.display().to_string());
        let login = if shell.is_login_shell { " (login shell)" } else { "" };
        writeln!(out, "{:<8} {location}{login}", shell.shell_type.name())?;
        if let Some(config) = existing_config_path(&context.paths, shell.shell_type) {
            writeln!(out, "         config: {}", config.display())?;
        }
    }
    Ok(Status::Clean)
}
