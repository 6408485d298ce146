//! Crash move folder file handling.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{AcquireError, Result};

/// Create `dir` and its parents. An existing directory is not an error.
pub fn ensure_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).map_err(|e| AcquireError::io(dir, e))
}

/// Copy `file` into `dir`, keeping its file name. Overwrites an existing copy.
pub fn copy_into(dir: &Path, file: &Path) -> Result<PathBuf> {
    ensure_dir(dir)?;
    let name = file
        .file_name()
        .ok_or_else(|| AcquireError::io(file, std::io::Error::other("path has no file name")))?;
    let target = dir.join(name);
    std::fs::copy(file, &target).map_err(|e| AcquireError::io(file, e))?;
    debug!(source = %file.display(), target = %target.display(), "copied dataset file");
    Ok(target)
}

/// Lists files in `dir` with the given extension (case-insensitive).
///
/// Returns files sorted by filename.
pub fn list_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| AcquireError::io(dir, e))?;

    let mut files = Vec::new();
    for entry_result in entries {
        let entry = entry_result.map_err(|e| AcquireError::io(dir, e))?;
        let path = entry.path();

        // Skip directories
        if !path.is_file() {
            continue;
        }

        let matches = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(extension));
        if matches {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// The file in `dir` with the greatest name, used by offline mode.
///
/// Relies on date-prefixed file names so that name order is release order.
pub fn latest_file(dir: &Path, extension: &str) -> Result<PathBuf> {
    if !dir.is_dir() {
        return Err(AcquireError::NoLocalFile {
            dir: dir.to_path_buf(),
            extension: extension.to_string(),
        });
    }
    list_files(dir, extension)?
        .pop()
        .ok_or_else(|| AcquireError::NoLocalFile {
            dir: dir.to_path_buf(),
            extension: extension.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        for name in [
            "20200514 ACAPS measures.xlsx",
            "20200326 ACAPS measures.xlsx",
            "20201210 ACAPS measures.XLSX",
            "20210101 notes.txt",
        ] {
            std::fs::write(dir.path().join(name), "data").unwrap();
        }
        std::fs::create_dir(dir.path().join("20991231 folder.xlsx")).unwrap();
        dir
    }

    #[test]
    fn test_list_files_filters_and_sorts() {
        let dir = create_test_dir();
        let files = list_files(dir.path(), "xlsx").unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(
            names,
            vec![
                "20200326 ACAPS measures.xlsx",
                "20200514 ACAPS measures.xlsx",
                "20201210 ACAPS measures.XLSX",
            ]
        );
    }

    #[test]
    fn test_latest_file() {
        let dir = create_test_dir();
        let latest = latest_file(dir.path(), "xlsx").unwrap();
        assert!(latest.ends_with("20201210 ACAPS measures.XLSX"));
    }

    #[test]
    fn test_latest_file_empty_dir() {
        let dir = TempDir::new().unwrap();
        let err = latest_file(dir.path(), "xlsx").unwrap_err();
        assert!(matches!(err, AcquireError::NoLocalFile { .. }));
    }

    #[test]
    fn test_latest_file_missing_dir() {
        let dir = TempDir::new().unwrap();
        let err = latest_file(&dir.path().join("active"), "xlsx").unwrap_err();
        assert!(matches!(err, AcquireError::NoLocalFile { .. }));
    }

    #[test]
    fn test_ensure_dir_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("output").join("2020-04-05");
        ensure_dir(&nested).unwrap();
        ensure_dir(&nested).unwrap();
        assert!(nested.is_dir());
    }

    #[test]
    fn test_copy_into_keeps_name() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("20200326 ACAPS.xlsx");
        std::fs::write(&source, "workbook").unwrap();

        let target = copy_into(&dir.path().join("active"), &source).unwrap();
        assert_eq!(target, dir.path().join("active").join("20200326 ACAPS.xlsx"));
        assert_eq!(std::fs::read_to_string(target).unwrap(), "workbook");
    }
}
