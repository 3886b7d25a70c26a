use chrono::{Local, NaiveDateTime, SubsecRound};
use log::{debug, info, warn};
use shellrig_platform::{HomePaths, strip_home_prefix};
use std::ffi::OsString;
use std::fs;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

use crate::archive::{BackupArchive, validate_category};
use crate::copy::{copy_entry, remove_entry};
use crate::error::{BackupError, EntryError};
use crate::manifest::{MANIFEST_FILE_NAME, Manifest, ManifestEntry};
use crate::types::{BackupInfo, BackupOutcome, CleanupReport, RestoreRecord, RestoreReport};

pub const PRE_RESTORE_SUFFIX: &str = ".pre-restore";

/// Creates, lists, restores and prunes backup archives for one home
/// directory.
///
/// The manager holds no timestamp of its own: every `create_backup` call
/// stamps its archive with the time of that call.
#[derive(Debug, Clone)]
pub struct BackupManager {
    paths: HomePaths,
}

impl BackupManager {
    #[must_use]
    pub fn new(paths: HomePaths) -> Self {
        Self { paths }
    }

    #[must_use]
    pub fn home(&self) -> &Path {
        &self.paths.home
    }

    #[must_use]
    pub fn backup_root(&self) -> &Path {
        &self.paths.backup_root
    }

    /// Snapshot the requested home-relative paths into a new archive stamped
    /// with the current local time.
    pub fn create_backup<S: AsRef<str>>(
        &self,
        requested: &[S],
        category: &str,
    ) -> Result<BackupOutcome, BackupError> {
        self.create_backup_at(requested, category, Local::now().naive_local())
    }

    /// Like [`Self::create_backup`] with an explicit archive timestamp.
    ///
    /// Two calls for the same category within the same second share one
    /// archive directory; the later call merges into it. Sub-second
    /// precision is dropped so the handle matches what `list_backups`
    /// reads back from the directory name.
    pub fn create_backup_at<S: AsRef<str>>(
        &self,
        requested: &[S],
        category: &str,
        timestamp: NaiveDateTime,
    ) -> Result<BackupOutcome, BackupError> {
        validate_category(category)?;
        let timestamp = timestamp.trunc_subsecs(0);
        let archive = BackupArchive::new(&self.paths.backup_root, category, timestamp);
        let preexisting = archive.exists();
        let mut root_ready = preexisting;
        let mut entries: Vec<ManifestEntry> = Vec::new();
        let mut errors = Vec::new();

        for request in requested {
            let request = request.as_ref();
            let relative = strip_home_prefix(request);
            let Some(name) = entry_name(relative) else {
                warn!("Refusing to back up {request:?}: not a path below the home directory");
                errors.push(EntryError::invalid_path(request, "backup", request));
                continue;
            };

            let source = self.paths.home.join(relative);
            let is_dir = match fs::metadata(&source) {
                Ok(metadata) => metadata.is_dir(),
                Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                    debug!("Skipping {request}: not present");
                    continue;
                }
                Err(error) => {
                    errors.push(EntryError::copy_failed(name, "inspect source", &error));
                    continue;
                }
            };

            if is_dir && self.paths.backup_root.starts_with(&source) {
                warn!("Refusing to back up {request}: it contains the backup root");
                errors.push(EntryError::invalid_path(name, "backup", request));
                continue;
            }

            if name == MANIFEST_FILE_NAME {
                warn!("Refusing to back up {request}: its name is reserved for the manifest");
                errors.push(EntryError::reserved_name(name, request));
                continue;
            }

            if entries.iter().any(|entry| entry.name == name) {
                errors.push(EntryError::name_collision(name, request));
                continue;
            }

            if !root_ready {
                if let Err(error) = fs::create_dir_all(archive.root()) {
                    errors.push(EntryError::copy_failed(
                        name,
                        "create archive directory",
                        &error,
                    ));
                    continue;
                }
                root_ready = true;
            }

            let destination = archive.root().join(&name);
            if let Err(error) = copy_entry(&source, &destination) {
                warn!("Failed to back up {request}: {error}");
                errors.push(EntryError::copy_failed(name, "copy into archive", &error));
                continue;
            }

            debug!("Captured {request} as {name}");
            let entry = if is_dir {
                ManifestEntry::dir(name)
            } else {
                ManifestEntry::file(name)
            };
            entries.push(entry.with_source(relative_label(relative)));
        }

        if entries.is_empty() {
            if root_ready
                && !preexisting
                && let Err(error) = fs::remove_dir_all(archive.root())
            {
                warn!(
                    "Failed to remove empty archive {}: {error}",
                    archive.root().display()
                );
            }
            info!("No existing {category} configuration found to back up");
            return Ok(BackupOutcome::NothingToBackUp { errors });
        }

        let mut manifest = Manifest::new(timestamp, entries.clone());
        if preexisting {
            match archive.read_manifest() {
                Ok(Some(existing)) => manifest.merge_after(existing),
                Ok(None) => {}
                Err(error) => warn!("Could not read existing manifest: {error}"),
            }
        }
        if let Err(error) = manifest.write_to(archive.root()) {
            errors.push(EntryError::copy_failed(
                MANIFEST_FILE_NAME,
                "write manifest",
                &error,
            ));
        }

        info!(
            "Backup created: {} ({} entries, {} errors)",
            archive.root().display(),
            entries.len(),
            errors.len()
        );
        Ok(BackupOutcome::Created {
            archive,
            entries,
            errors,
        })
    }

    /// Archives under the Backup Root, newest first. Directories whose names
    /// do not carry a valid timestamp are ignored.
    pub fn list_backups(
        &self,
        category: Option<&str>,
    ) -> Result<Vec<BackupArchive>, BackupError> {
        if let Some(category) = category {
            validate_category(category)?;
        }

        let read_dir = match fs::read_dir(&self.paths.backup_root) {
            Ok(read_dir) => read_dir,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(error) => return Err(error.into()),
        };

        let mut archives: Vec<BackupArchive> = read_dir
            .filter_map(Result::ok)
            .filter(|entry| entry.path().is_dir())
            .filter_map(|entry| {
                let archive = BackupArchive::from_path(entry.path());
                if archive.is_none() {
                    debug!("Ignoring {:?}: not a backup archive", entry.file_name());
                }
                archive
            })
            .filter(|archive| category.is_none_or(|category| archive.category() == category))
            .collect();

        archives.sort_by(|a, b| {
            b.timestamp()
                .cmp(&a.timestamp())
                .then_with(|| a.category().cmp(b.category()))
        });
        Ok(archives)
    }

    pub fn latest_backup(&self, category: &str) -> Result<Option<BackupArchive>, BackupError> {
        Ok(self.list_backups(Some(category))?.into_iter().next())
    }

    /// Resolve an archive directory name, as printed by `list_backups`.
    #[must_use]
    pub fn find_backup(&self, name: &str) -> Option<BackupArchive> {
        if name.contains(['/', '\\']) {
            return None;
        }
        BackupArchive::from_path(self.paths.backup_root.join(name)).filter(BackupArchive::exists)
    }

    /// Put the archived entries back in place, snapshotting whatever is live
    /// at each target to a `.pre-restore` sibling first.
    ///
    /// Names in `selective_names` that the archive does not hold are ignored.
    pub fn restore_backup(
        &self,
        archive: &BackupArchive,
        selective_names: Option<&[String]>,
    ) -> Result<RestoreReport, BackupError> {
        if !archive.exists() {
            return Err(BackupError::archive_not_found(archive.root()));
        }

        let entries = restorable_entries(archive)?;
        let mut report = RestoreReport {
            archive: archive.clone(),
            restored: Vec::new(),
            errors: Vec::new(),
        };

        for entry in entries {
            if selective_names.is_some_and(|names| !names.contains(&entry.name)) {
                continue;
            }

            match self.restore_entry(archive, &entry) {
                Ok(record) => {
                    debug!("Restored {} to {}", record.name, record.target.display());
                    report.restored.push(record);
                }
                Err(error) => {
                    warn!("Restore of {} failed: {error}", entry.name);
                    report.errors.push(error);
                }
            }
        }

        if report.is_empty() {
            info!("Nothing restorable in {}", archive.name());
        } else {
            info!(
                "Restored {} entries from {} ({} errors)",
                report.restored.len(),
                archive.name(),
                report.errors.len()
            );
        }
        Ok(report)
    }

    fn restore_entry(
        &self,
        archive: &BackupArchive,
        entry: &ManifestEntry,
    ) -> Result<RestoreRecord, EntryError> {
        let name = entry.name.as_str();
        let relative = strip_home_prefix(entry.relative_path());
        if name == MANIFEST_FILE_NAME
            || entry_name(Path::new(name)).as_deref() != Some(name)
            || entry_name(relative).is_none()
        {
            return Err(EntryError::invalid_path(
                name,
                "restore",
                entry.relative_path(),
            ));
        }

        let archived = archive.root().join(name);
        if fs::symlink_metadata(&archived).is_err() {
            return Err(EntryError::not_found(name, "restore"));
        }

        let target = self.paths.home.join(relative);
        let current = fs::symlink_metadata(&target).ok();

        // The snapshot must be complete before the live target is touched.
        let pre_restore = if current.is_some() && target.exists() {
            let snapshot = pre_restore_path(&target);
            if fs::symlink_metadata(&snapshot).is_ok() {
                remove_entry(&snapshot).map_err(|error| {
                    EntryError::remove_failed(name, "replace previous pre-restore snapshot", &error)
                })?;
            }
            copy_entry(&target, &snapshot).map_err(|error| {
                EntryError::copy_failed(name, "snapshot current state", &error)
            })?;
            Some(snapshot)
        } else {
            None
        };

        if current.is_some() {
            remove_entry(&target).map_err(|error| {
                EntryError::remove_failed(name, "remove current target", &error)
            })?;
        }

        copy_entry(&archived, &target)
            .map_err(|error| EntryError::copy_failed(name, "copy from archive", &error))?;

        Ok(RestoreRecord {
            name: name.to_string(),
            target,
            pre_restore,
        })
    }

    /// Keep the `keep_count` newest archives of `category` and delete the
    /// rest. Irreversible.
    pub fn clean_old_backups(
        &self,
        category: &str,
        keep_count: usize,
    ) -> Result<CleanupReport, BackupError> {
        let archives = self.list_backups(Some(category))?;
        let mut report = CleanupReport {
            kept: archives.len().min(keep_count),
            removed: Vec::new(),
            errors: Vec::new(),
        };

        for archive in archives.into_iter().skip(keep_count) {
            match fs::remove_dir_all(archive.root()) {
                Ok(()) => {
                    debug!("Removed old backup {}", archive.name());
                    report.removed.push(archive);
                }
                Err(error) => {
                    warn!("Failed to remove {}: {error}", archive.name());
                    report.errors.push(EntryError::remove_failed(
                        archive.name(),
                        "remove archive",
                        &error,
                    ));
                }
            }
        }

        info!(
            "Cleaned {} old {category} backups, kept {}",
            report.removed.len(),
            report.kept
        );
        Ok(report)
    }

    /// Size and file listing of an archive. Unreadable files are skipped.
    pub fn backup_info(&self, archive: &BackupArchive) -> Result<BackupInfo, BackupError> {
        if !archive.exists() {
            return Err(BackupError::archive_not_found(archive.root()));
        }

        let mut size_bytes = 0;
        let mut files = Vec::new();
        for entry in WalkDir::new(archive.root())
            .min_depth(1)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_file())
        {
            let Ok(metadata) = entry.metadata() else {
                continue;
            };
            if let Ok(relative) = entry.path().strip_prefix(archive.root()) {
                size_bytes += metadata.len();
                files.push(relative.to_path_buf());
            }
        }
        files.sort();

        Ok(BackupInfo {
            archive: archive.clone(),
            manifest: archive.read_manifest()?,
            size_bytes,
            files,
        })
    }
}

/// Entries to restore: the manifest's list, or every top-level child of
/// the archive (sorted by name) when no manifest exists.
fn restorable_entries(archive: &BackupArchive) -> Result<Vec<ManifestEntry>, BackupError> {
    if let Some(manifest) = archive.read_manifest()? {
        return Ok(manifest.entries);
    }

    let mut entries = Vec::new();
    for child in fs::read_dir(archive.root())? {
        let child = child?;
        let file_name = child.file_name();
        if file_name == MANIFEST_FILE_NAME {
            continue;
        }
        let name = file_name.to_string_lossy().into_owned();
        if child.path().is_dir() {
            entries.push(ManifestEntry::dir(name));
        } else {
            entries.push(ManifestEntry::file(name));
        }
    }
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

/// Base name of a home-relative path made only of normal components.
fn entry_name(relative: &Path) -> Option<String> {
    let mut components = relative.components().peekable();
    components.peek()?;
    if !components.all(|component| matches!(component, Component::Normal(_))) {
        return None;
    }
    relative
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
}

fn relative_label(relative: &Path) -> String {
    relative
        .components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[must_use]
pub fn pre_restore_path(target: &Path) -> PathBuf {
    let mut file_name = target
        .file_name()
        .map_or_else(OsString::new, std::ffi::OsStr::to_os_string);
    file_name.push(PRE_RESTORE_SUFFIX);
    target.with_file_name(file_name)
}
