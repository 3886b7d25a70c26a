use std::path::PathBuf;

use crate::archive::BackupArchive;
use crate::error::EntryError;
use crate::manifest::{Manifest, ManifestEntry};

/// Result of [`crate::BackupManager::create_backup`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackupOutcome {
    Created {
        archive: BackupArchive,
        entries: Vec<ManifestEntry>,
        errors: Vec<EntryError>,
    },
    /// None of the requested paths could be captured; no archive was left
    /// behind.
    NothingToBackUp { errors: Vec<EntryError> },
}

impl BackupOutcome {
    #[must_use]
    pub fn archive(&self) -> Option<&BackupArchive> {
        match self {
            Self::Created { archive, .. } => Some(archive),
            Self::NothingToBackUp { .. } => None,
        }
    }

    #[must_use]
    pub fn entries(&self) -> &[ManifestEntry] {
        match self {
            Self::Created { entries, .. } => entries,
            Self::NothingToBackUp { .. } => &[],
        }
    }

    #[must_use]
    pub fn captured_names(&self) -> Vec<&str> {
        self.entries()
            .iter()
            .map(|entry| entry.name.as_str())
            .collect()
    }

    #[must_use]
    pub fn errors(&self) -> &[EntryError] {
        match self {
            Self::Created { errors, .. } | Self::NothingToBackUp { errors } => errors,
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.errors().is_empty()
    }
}

/// What happened to one live path during a restore.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoreRecord {
    pub name: String,
    pub target: PathBuf,
    /// Snapshot of the content that was live before the restore, if any.
    pub pre_restore: Option<PathBuf>,
}

impl RestoreRecord {
    #[must_use]
    pub fn pre_existed(&self) -> bool {
        self.pre_restore.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoreReport {
    pub archive: BackupArchive,
    pub restored: Vec<RestoreRecord>,
    pub errors: Vec<EntryError>,
}

impl RestoreReport {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    /// The archive held nothing that matched the request.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.restored.is_empty() && self.errors.is_empty()
    }

    #[must_use]
    pub fn restored_names(&self) -> Vec<&str> {
        self.restored
            .iter()
            .map(|record| record.name.as_str())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupReport {
    pub kept: usize,
    pub removed: Vec<BackupArchive>,
    pub errors: Vec<EntryError>,
}

impl CleanupReport {
    #[must_use]
    pub fn removed_count(&self) -> usize {
        self.removed.len()
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupInfo {
    pub archive: BackupArchive,
    pub manifest: Option<Manifest>,
    pub size_bytes: u64,
    /// Archive-relative paths of every regular file, sorted.
    pub files: Vec<PathBuf>,
}
