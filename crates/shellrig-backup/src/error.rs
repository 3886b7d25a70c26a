use std::path::PathBuf;
use thiserror::Error;

/// Archive-level failures. These short-circuit the whole operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackupError {
    #[error("Backup archive not found: {}", path.display())]
    ArchiveNotFound { path: PathBuf },

    #[error("Invalid backup category: {category:?}")]
    InvalidCategory { category: String },

    #[error("IO error ({kind}): {message}")]
    Io {
        kind: std::io::ErrorKind,
        message: String,
    },
}

impl BackupError {
    pub fn archive_not_found(path: impl Into<PathBuf>) -> Self {
        Self::ArchiveNotFound { path: path.into() }
    }

    pub fn invalid_category(category: impl Into<String>) -> Self {
        Self::InvalidCategory {
            category: category.into(),
        }
    }
}

impl From<std::io::Error> for BackupError {
    fn from(err: std::io::Error) -> Self {
        BackupError::Io {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryErrorKind {
    #[error("copy failure")]
    CopyFailure,
    #[error("remove failure")]
    RemoveFailure,
    #[error("name collision")]
    NameCollision,
    #[error("not found")]
    NotFound,
    #[error("invalid path")]
    InvalidPath,
}

/// A failure confined to one entry. Collected into reports; sibling entries
/// keep going.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{name}: {action} failed ({kind}): {message}")]
pub struct EntryError {
    pub name: String,
    pub kind: EntryErrorKind,
    pub action: &'static str,
    pub message: String,
}

impl EntryError {
    pub fn copy_failed(
        name: impl Into<String>,
        action: &'static str,
        error: &std::io::Error,
    ) -> Self {
        Self {
            name: name.into(),
            kind: EntryErrorKind::CopyFailure,
            action,
            message: error.to_string(),
        }
    }

    pub fn remove_failed(
        name: impl Into<String>,
        action: &'static str,
        error: &std::io::Error,
    ) -> Self {
        Self {
            name: name.into(),
            kind: EntryErrorKind::RemoveFailure,
            action,
            message: error.to_string(),
        }
    }

    pub fn name_collision(name: impl Into<String>, source: &str) -> Self {
        Self {
            name: name.into(),
            kind: EntryErrorKind::NameCollision,
            action: "backup",
            message: format!("{source} has the same name as an entry already captured"),
        }
    }

    pub fn reserved_name(name: impl Into<String>, source: &str) -> Self {
        Self {
            name: name.into(),
            kind: EntryErrorKind::NameCollision,
            action: "backup",
            message: format!("{source} has the same name as the archive manifest"),
        }
    }

    pub fn not_found(name: impl Into<String>, action: &'static str) -> Self {
        Self {
            name: name.into(),
            kind: EntryErrorKind::NotFound,
            action,
            message: "entry is missing from the archive".to_string(),
        }
    }

    pub fn invalid_path(name: impl Into<String>, action: &'static str, path: &str) -> Self {
        Self {
            name: name.into(),
            kind: EntryErrorKind::InvalidPath,
            action,
            message: format!("{path:?} does not name an entry below the home directory"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{BackupError, EntryError, EntryErrorKind};

    #[test]
    fn io_error_conversion_maps_to_io_variant() {
        let mapped = BackupError::from(std::io::Error::other("disk full"));
        assert!(
            matches!(mapped, BackupError::Io { kind, ref message } if kind == std::io::ErrorKind::Other && message.contains("disk full"))
        );
    }

    #[test]
    fn archive_not_found_display_includes_path() {
        let error = BackupError::archive_not_found("/home/a/.config/shell-backup-20240101-000000");

        assert_eq!(
            error.to_string(),
            "Backup archive not found: /home/a/.config/shell-backup-20240101-000000"
        );
    }

    #[test]
    fn entry_error_display_includes_name_action_and_kind() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let error = EntryError::copy_failed(".zshrc", "copy into archive", &io);

        assert_eq!(error.kind, EntryErrorKind::CopyFailure);
        assert_eq!(
            error.to_string(),
            ".zshrc: copy into archive failed (copy failure): denied"
        );
    }

    #[test]
    fn name_collision_mentions_source() {
        let error = EntryError::name_collision("fish", ".local/fish");

        assert_eq!(error.kind, EntryErrorKind::NameCollision);
        assert!(error.message.contains(".local/fish"));
    }
}
