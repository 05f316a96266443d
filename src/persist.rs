//! Atomic, change-aware file output.
//!
//! Pages are written to a temp file in the destination folder and renamed
//! over the final path, so an interrupted build leaves either the old page or
//! the new one, never half of either. Files whose bytes already match are left
//! alone: their mtime doesn't move and the build can report them unchanged.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PersistError {
    #[error("cannot write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot replace {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: tempfile::PersistError,
    },
}

impl PersistError {
    fn io(path: &Path, source: io::Error) -> Self {
        PersistError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStatus {
    Written,
    Unchanged,
}

/// Write `contents` to `path` unless it already holds exactly those bytes.
pub fn write_if_changed(path: &Path, contents: &[u8]) -> Result<WriteStatus, PersistError> {
    if fs::read(path).is_ok_and(|existing| existing == contents) {
        return Ok(WriteStatus::Unchanged);
    }

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| PersistError::io(dir, e))?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| PersistError::io(path, e))?;
    tmp.write_all(contents)
        .and_then(|()| tmp.as_file().sync_all())
        .map_err(|e| PersistError::io(path, e))?;

    // Temp files are created owner-only; pages must stay world-readable
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tmp.as_file()
            .set_permissions(fs::Permissions::from_mode(0o644))
            .map_err(|e| PersistError::io(path, e))?;
    }

    tmp.persist(path).map_err(|e| PersistError::Persist {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(WriteStatus::Written)
}

/// Copy `src` to `dst` unless `dst` already matches.
pub fn copy_if_changed(src: &Path, dst: &Path) -> Result<WriteStatus, PersistError> {
    let contents = fs::read(src).map_err(|e| PersistError::io(src, e))?;
    write_if_changed(dst, &contents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn writes_new_file_and_parents() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("news/camp/index.html");
        let status = write_if_changed(&path, b"<p>hi</p>").unwrap();
        assert_eq!(status, WriteStatus::Written);
        assert_eq!(fs::read_to_string(&path).unwrap(), "<p>hi</p>");
    }

    #[test]
    fn identical_contents_left_alone() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("news.html");
        write_if_changed(&path, b"same").unwrap();
        assert_eq!(
            write_if_changed(&path, b"same").unwrap(),
            WriteStatus::Unchanged
        );
    }

    #[test]
    fn changed_contents_replaced() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("news.html");
        write_if_changed(&path, b"old").unwrap();
        assert_eq!(
            write_if_changed(&path, b"new").unwrap(),
            WriteStatus::Written
        );
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn no_temp_files_left_behind() {
        let tmp = TempDir::new().unwrap();
        write_if_changed(&tmp.path().join("a.html"), b"a").unwrap();
        let names: Vec<_> = fs::read_dir(tmp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec!["a.html"]);
    }

    #[cfg(unix)]
    #[test]
    fn written_files_are_world_readable() {
        use std::os::unix::fs::PermissionsExt;
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("a.html");
        write_if_changed(&path, b"a").unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }

    #[test]
    fn copy_skips_identical_target() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("a.jpg");
        let dst = tmp.path().join("out/a.jpg");
        fs::write(&src, b"pixels").unwrap();

        assert_eq!(copy_if_changed(&src, &dst).unwrap(), WriteStatus::Written);
        assert_eq!(copy_if_changed(&src, &dst).unwrap(), WriteStatus::Unchanged);
        assert_eq!(fs::read(&dst).unwrap(), b"pixels");
    }

    #[test]
    fn copy_of_missing_source_fails() {
        let tmp = TempDir::new().unwrap();
        let result = copy_if_changed(&tmp.path().join("nope.jpg"), &tmp.path().join("x.jpg"));
        assert!(matches!(result, Err(PersistError::Io { .. })));
    }
}
