use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Subdirectory holding pristine copies of files the macro updater touches.
pub const BACKUP_DIR: &str = "OLD_FILES";

fn backup_path(dir: &Path, name: &str) -> Result<PathBuf, io::Error> {
    let backup_dir = dir.join(BACKUP_DIR);
    fs::create_dir_all(&backup_dir)?;
    Ok(backup_dir.join(name))
}

/// Copy `dir/name` into the backup directory unless a backup already
/// exists, so reruns never clobber the pristine original. Returns whether a
/// new backup was written.
pub fn preserve(dir: &Path, name: &str) -> Result<bool, io::Error> {
    let dst = backup_path(dir, name)?;
    if dst.exists() {
        return Ok(false);
    }
    fs::copy(dir.join(name), dst)?;
    Ok(true)
}

/// Move `dir/name` into the backup directory, leaving nothing at the
/// original location.
pub fn relocate(dir: &Path, name: &str) -> Result<(), io::Error> {
    let dst = backup_path(dir, name)?;
    fs::rename(dir.join(name), dst)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserve_copies_once_and_keeps_pristine_original() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("RELEASE.local");
        fs::write(&path, "pristine").unwrap();

        assert!(preserve(dir.path(), "RELEASE.local").unwrap());
        fs::write(&path, "rewritten").unwrap();
        assert!(!preserve(dir.path(), "RELEASE.local").unwrap());

        let backed_up = dir.path().join(BACKUP_DIR).join("RELEASE.local");
        assert_eq!(fs::read_to_string(backed_up).unwrap(), "pristine");
    }

    #[test]
    fn relocate_moves_file_out_of_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("README.md");
        fs::write(&path, "docs").unwrap();

        relocate(dir.path(), "README.md").unwrap();
        assert!(!path.exists());
        assert!(dir.path().join(BACKUP_DIR).join("README.md").is_file());
    }
}
