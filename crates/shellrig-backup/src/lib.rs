#![allow(clippy::missing_errors_doc)]

mod archive;
mod copy;
mod error;
mod manager;
mod manifest;
mod types;

pub use archive::{
    ARCHIVE_INFIX, BackupArchive, TIMESTAMP_FORMAT, archive_dir_name, parse_archive_name,
};
pub use copy::{copy_entry, copy_file, copy_tree, remove_entry};
pub use error::{BackupError, EntryError, EntryErrorKind};
pub use manager::{BackupManager, PRE_RESTORE_SUFFIX, pre_restore_path};
pub use manifest::{MANIFEST_FILE_NAME, Manifest, ManifestEntry};
pub use types::{BackupInfo, BackupOutcome, CleanupReport, RestoreRecord, RestoreReport};
