//! Filesystem copy primitive shared by backup and restore.

use std::fs;
use std::io;
use std::path::Path;
use walkdir::WalkDir;

/// Copy `src` to `dst`, recursing into directories.
///
/// Files overwrite an existing destination. Directories merge into an
/// existing destination tree instead of failing.
pub fn copy_entry(src: &Path, dst: &Path) -> io::Result<()> {
    if fs::metadata(src)?.is_dir() {
        copy_tree(src, dst)
    } else {
        copy_file(src, dst).map(|_| ())
    }
}

/// Copy a single file, creating missing parent directories.
pub fn copy_file(src: &Path, dst: &Path) -> io::Result<u64> {
    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(src, dst)
}

/// Recursively copy a directory tree into `dst`, merging with whatever is
/// already there. Symlinks inside the tree are recreated, not followed.
pub fn copy_tree(src: &Path, dst: &Path) -> io::Result<()> {
    for entry in WalkDir::new(src).follow_links(false) {
        let entry = entry.map_err(io::Error::from)?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(io::Error::other)?;
        let target = dst.join(relative);
        let file_type = entry.file_type();

        if file_type.is_dir() {
            fs::create_dir_all(&target)?;
        } else if file_type.is_symlink() {
            copy_symlink(entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

#[cfg(unix)]
fn copy_symlink(src: &Path, dst: &Path) -> io::Result<()> {
    let link_target = fs::read_link(src)?;
    if fs::symlink_metadata(dst).is_ok() {
        remove_entry(dst)?;
    }
    std::os::unix::fs::symlink(link_target, dst)
}

#[cfg(not(unix))]
fn copy_symlink(src: &Path, dst: &Path) -> io::Result<()> {
    if fs::metadata(src)?.is_dir() {
        copy_tree(src, dst)
    } else {
        fs::copy(src, dst).map(|_| ())
    }
}

/// Remove a file, symlink or whole directory tree.
pub fn remove_entry(path: &Path) -> io::Result<()> {
    let metadata = fs::symlink_metadata(path)?;
    if metadata.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    }
}

#[cfg(test)]
mod tests {
    use super::{copy_entry, copy_tree, remove_entry};
    use std::fs;

    #[test]
    fn copy_entry_copies_file_contents() {
        let temp_dir = tempfile::tempdir().expect("create temp dir");
        let src = temp_dir.path().join(".zshrc");
        let dst = temp_dir.path().join("archive").join(".zshrc");
        fs::write(&src, "export EDITOR=vim\n").expect("write source");

        copy_entry(&src, &dst).expect("copy file");

        assert_eq!(
            fs::read_to_string(&dst).expect("read copy"),
            "export EDITOR=vim\n"
        );
    }

    #[test]
    fn copy_entry_overwrites_existing_file() {
        let temp_dir = tempfile::tempdir().expect("create temp dir");
        let src = temp_dir.path().join("new");
        let dst = temp_dir.path().join("old");
        fs::write(&src, "new").expect("write source");
        fs::write(&dst, "old").expect("write destination");

        copy_entry(&src, &dst).expect("copy file");

        assert_eq!(fs::read_to_string(&dst).expect("read copy"), "new");
    }

    #[test]
    fn copy_tree_merges_into_existing_destination() {
        let temp_dir = tempfile::tempdir().expect("create temp dir");
        let src = temp_dir.path().join("src");
        let dst = temp_dir.path().join("dst");
        fs::create_dir_all(src.join("plugins/git")).expect("create source tree");
        fs::write(src.join("plugins/git/git.plugin.zsh"), "alias g=git").expect("write plugin");
        fs::create_dir_all(&dst).expect("create destination");
        fs::write(dst.join("keep.txt"), "untouched").expect("write existing file");

        copy_tree(&src, &dst).expect("copy tree");

        assert_eq!(
            fs::read_to_string(dst.join("plugins/git/git.plugin.zsh")).expect("read plugin"),
            "alias g=git"
        );
        assert_eq!(
            fs::read_to_string(dst.join("keep.txt")).expect("read existing file"),
            "untouched"
        );
    }

    #[test]
    fn copy_entry_reports_missing_source() {
        let temp_dir = tempfile::tempdir().expect("create temp dir");
        let error = copy_entry(
            &temp_dir.path().join("missing"),
            &temp_dir.path().join("dst"),
        )
        .expect_err("missing source should fail");

        assert_eq!(error.kind(), std::io::ErrorKind::NotFound);
    }

    #[cfg(unix)]
    #[test]
    fn copy_tree_recreates_symlinks() {
        let temp_dir = tempfile::tempdir().expect("create temp dir");
        let src = temp_dir.path().join("src");
        let dst = temp_dir.path().join("dst");
        fs::create_dir_all(&src).expect("create source");
        fs::write(src.join("real"), "data").expect("write file");
        std::os::unix::fs::symlink("real", src.join("link")).expect("create symlink");

        copy_tree(&src, &dst).expect("copy tree");

        let link = fs::read_link(dst.join("link")).expect("copied entry should be a symlink");
        assert_eq!(link, std::path::Path::new("real"));
    }

    #[test]
    fn remove_entry_handles_files_and_trees() {
        let temp_dir = tempfile::tempdir().expect("create temp dir");
        let file = temp_dir.path().join("file");
        let tree = temp_dir.path().join("tree");
        fs::write(&file, "x").expect("write file");
        fs::create_dir_all(tree.join("nested")).expect("create tree");

        remove_entry(&file).expect("remove file");
        remove_entry(&tree).expect("remove tree");

        assert!(!file.exists());
        assert!(!tree.exists());
    }
}
