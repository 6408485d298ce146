//! Locating the measures workbook for a run.

use std::path::{Path, PathBuf};

use acaps_model::{DatasetConfig, PathsConfig};
use tracing::info;

use crate::error::{AcquireError, Result};
use crate::fs::{copy_into, latest_file};
use crate::source::{DatasetSource, select_latest};

/// How the run obtains its workbook.
pub enum Acquisition<'a> {
    /// Fetch from the catalog, then copy into the `active` directory.
    Remote(&'a dyn DatasetSource),
    /// Reuse the newest workbook already in the `active` directory.
    Offline,
}

/// Resolve the workbook path for a run rooted at `root`.
pub fn acquire_workbook(
    acquisition: Acquisition<'_>,
    dataset: &DatasetConfig,
    paths: &PathsConfig,
    root: &Path,
) -> Result<PathBuf> {
    let active_dir = paths.active_path(root);
    match acquisition {
        Acquisition::Remote(source) => {
            let scratch = paths.scratch_dir();
            let files = source.fetch(&dataset.address, &scratch)?;
            let (name, fetched) =
                select_latest(&files).ok_or_else(|| AcquireError::NoResource {
                    dataset: dataset.address.clone(),
                    extension: dataset.resource_extension.clone(),
                })?;
            let path = copy_into(&active_dir, fetched)?;
            info!(file = name, path = %path.display(), "acquired workbook");
            Ok(path)
        }
        Acquisition::Offline => {
            let path = latest_file(&active_dir, &dataset.resource_extension)?;
            info!(path = %path.display(), "offline mode, reusing local workbook");
            Ok(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::FetchedFiles;
    use tempfile::TempDir;

    struct StaticSource {
        names: Vec<&'static str>,
    }

    impl DatasetSource for StaticSource {
        fn fetch(&self, _dataset: &str, scratch_dir: &Path) -> Result<FetchedFiles> {
            std::fs::create_dir_all(scratch_dir).unwrap();
            let mut files = FetchedFiles::new();
            for name in &self.names {
                let path = scratch_dir.join(name);
                std::fs::write(&path, name.as_bytes()).unwrap();
                files.insert((*name).to_string(), path);
            }
            Ok(files)
        }
    }

    fn paths_in(dir: &TempDir) -> PathsConfig {
        PathsConfig {
            scratch_root: Some(dir.path().join("scratch")),
            ..PathsConfig::default()
        }
    }

    #[test]
    fn test_remote_copies_newest_into_active() {
        let dir = TempDir::new().unwrap();
        let source = StaticSource {
            names: vec!["20200326 measures.xlsx", "20200514 measures.xlsx"],
        };
        let path = acquire_workbook(
            Acquisition::Remote(&source),
            &DatasetConfig::default(),
            &paths_in(&dir),
            dir.path(),
        )
        .unwrap();
        assert_eq!(path, dir.path().join("active").join("20200514 measures.xlsx"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), "20200514 measures.xlsx");
    }

    #[test]
    fn test_remote_with_no_files() {
        let dir = TempDir::new().unwrap();
        let source = StaticSource { names: vec![] };
        let err = acquire_workbook(
            Acquisition::Remote(&source),
            &DatasetConfig::default(),
            &paths_in(&dir),
            dir.path(),
        )
        .unwrap_err();
        assert!(matches!(err, AcquireError::NoResource { .. }));
    }

    #[test]
    fn test_offline_reuses_newest_local() {
        let dir = TempDir::new().unwrap();
        let active = dir.path().join("active");
        std::fs::create_dir_all(&active).unwrap();
        std::fs::write(active.join("20200326 measures.xlsx"), "old").unwrap();
        std::fs::write(active.join("20200402 measures.xlsx"), "new").unwrap();

        let path = acquire_workbook(
            Acquisition::Offline,
            &DatasetConfig::default(),
            &paths_in(&dir),
            dir.path(),
        )
        .unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "new");
    }
}
