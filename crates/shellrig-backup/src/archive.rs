use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};

use crate::error::BackupError;
use crate::manifest::{MANIFEST_FILE_NAME, Manifest};

pub const ARCHIVE_INFIX: &str = "-backup-";
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

/// Handle to a timestamped archive directory under the Backup Root.
///
/// Cheap to clone; it holds no open files and reads the manifest on demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupArchive {
    root: PathBuf,
    category: String,
    timestamp: NaiveDateTime,
}

impl BackupArchive {
    pub(crate) fn new(backup_root: &Path, category: &str, timestamp: NaiveDateTime) -> Self {
        Self {
            root: backup_root.join(archive_dir_name(category, timestamp)),
            category: category.to_string(),
            timestamp,
        }
    }

    /// Build a handle from an existing directory path, if its name follows
    /// the `<category>-backup-<YYYYMMDD-HHMMSS>` scheme.
    #[must_use]
    pub fn from_path(root: impl Into<PathBuf>) -> Option<Self> {
        let root = root.into();
        let name = root.file_name()?.to_str()?;
        let (category, timestamp) = parse_archive_name(name)?;
        let category = category.to_string();
        Some(Self {
            root,
            category,
            timestamp,
        })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    #[must_use]
    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    /// The directory name as it exists on disk.
    #[must_use]
    pub fn name(&self) -> String {
        self.root.file_name().map_or_else(
            || archive_dir_name(&self.category, self.timestamp),
            |name| name.to_string_lossy().into_owned(),
        )
    }

    #[must_use]
    pub fn manifest_path(&self) -> PathBuf {
        self.root.join(MANIFEST_FILE_NAME)
    }

    #[must_use]
    pub fn exists(&self) -> bool {
        self.root.is_dir()
    }

    /// Read the sidecar manifest. `Ok(None)` when the archive has none or
    /// the manifest path is not a regular file.
    pub fn read_manifest(&self) -> Result<Option<Manifest>, BackupError> {
        let manifest_path = self.manifest_path();
        if !manifest_path.is_file() {
            return Ok(None);
        }
        match std::fs::read_to_string(manifest_path) {
            Ok(content) => Ok(Some(Manifest::parse(&content))),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }
}

impl std::fmt::Display for BackupArchive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name())
    }
}

#[must_use]
pub fn archive_dir_name(category: &str, timestamp: NaiveDateTime) -> String {
    format!(
        "{category}{ARCHIVE_INFIX}{}",
        timestamp.format(TIMESTAMP_FORMAT)
    )
}

/// Split an archive directory name into category and timestamp.
///
/// Names whose suffix is not a valid timestamp are foreign directories and
/// yield `None`.
#[must_use]
pub fn parse_archive_name(name: &str) -> Option<(&str, NaiveDateTime)> {
    let (category, suffix) = name.rsplit_once(ARCHIVE_INFIX)?;
    if category.is_empty() {
        return None;
    }
    let timestamp = NaiveDateTime::parse_from_str(suffix, TIMESTAMP_FORMAT).ok()?;
    // chrono accepts unpadded fields; only the canonical rendering counts.
    if timestamp.format(TIMESTAMP_FORMAT).to_string() != suffix {
        return None;
    }
    Some((category, timestamp))
}

pub(crate) fn validate_category(category: &str) -> Result<(), BackupError> {
    let invalid = category.is_empty()
        || category.contains(['/', '\\'])
        || category.contains(ARCHIVE_INFIX)
        || category == "."
        || category == "..";
    if invalid {
        return Err(BackupError::invalid_category(category));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{BackupArchive, archive_dir_name, parse_archive_name, validate_category};
    use chrono::NaiveDate;
    use std::path::Path;

    fn timestamp() -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 9)
            .and_then(|date| date.and_hms_opt(7, 5, 1))
            .expect("valid timestamp")
    }

    #[test]
    fn archive_name_uses_category_and_sortable_timestamp() {
        assert_eq!(
            archive_dir_name("zsh-shell", timestamp()),
            "zsh-shell-backup-20240309-070501"
        );
    }

    #[test]
    fn parse_archive_name_accepts_hyphenated_categories() {
        let (category, parsed) =
            parse_archive_name("zsh-shell-backup-20240309-070501").expect("valid name");

        assert_eq!(category, "zsh-shell");
        assert_eq!(parsed, timestamp());
    }

    #[test]
    fn parse_archive_name_rejects_foreign_directories() {
        assert!(parse_archive_name("shell-backup-latest").is_none());
        assert!(parse_archive_name("shell-backup-20241399-000000").is_none());
        assert!(parse_archive_name("-backup-20240309-070501").is_none());
        assert!(parse_archive_name("fish").is_none());
    }

    #[test]
    fn parse_archive_name_requires_zero_padded_timestamp() {
        assert!(parse_archive_name("shell-backup-2024011-010101").is_none());
        assert!(parse_archive_name("shell-backup-20240101-10101").is_none());
        assert!(parse_archive_name("shell-backup-20240101-010101").is_some());
    }

    #[test]
    fn name_is_the_directory_name_on_disk() {
        let archive = BackupArchive::from_path("/home/a/.config/zsh-shell-backup-20240309-070501")
            .expect("parse archive path");

        assert_eq!(archive.name(), "zsh-shell-backup-20240309-070501");
        assert_eq!(archive.to_string(), "zsh-shell-backup-20240309-070501");
    }

    #[test]
    fn from_path_round_trips_through_name() {
        let archive = BackupArchive::new(Path::new("/home/a/.config"), "shell", timestamp());
        let reparsed = BackupArchive::from_path(archive.root()).expect("parse archive path");

        assert_eq!(reparsed, archive);
        assert_eq!(archive.name(), "shell-backup-20240309-070501");
        assert_eq!(
            archive.manifest_path(),
            Path::new("/home/a/.config/shell-backup-20240309-070501/backup_manifest.txt")
        );
    }

    #[test]
    fn validate_category_rejects_path_like_values() {
        assert!(validate_category("shell").is_ok());
        assert!(validate_category("zsh-shell").is_ok());
        assert!(validate_category("").is_err());
        assert!(validate_category("../etc").is_err());
        assert!(validate_category("a-backup-b").is_err());
    }
}
