//! Local filesystem adapter using std::fs.

use std::io;
use std::path::{Path, PathBuf};

use presswright_core::{
    application::{ApplicationError, ports::Filesystem},
    error::{PresswrightError, PresswrightResult},
};
use tracing::debug;
use walkdir::WalkDir;

use super::file_name_matches;

/// Production filesystem implementation using `std::fs`.
#[derive(Debug, Clone, Copy)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    /// Create a new local filesystem adapter.
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for LocalFilesystem {
    fn read_to_string(&self, path: &Path) -> PresswrightResult<String> {
        std::fs::read_to_string(path).map_err(|e| map_io_error(path, e, "read file"))
    }

    fn write_file(&self, path: &Path, content: &str) -> PresswrightResult<()> {
        std::fs::write(path, content).map_err(|e| map_io_error(path, e, "write file"))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn find_files(&self, root: &Path, pattern: &str) -> PresswrightResult<Vec<PathBuf>> {
        let mut found = Vec::new();
        for entry in WalkDir::new(root) {
            let entry = entry.map_err(|e| ApplicationError::FilesystemError {
                path: root.to_path_buf(),
                reason: format!("Failed to walk directory: {e}"),
            })?;
            if entry.file_type().is_file()
                && file_name_matches(pattern, &entry.file_name().to_string_lossy())
            {
                found.push(entry.into_path());
            }
        }
        found.sort();
        debug!(root = %root.display(), pattern, matches = found.len(), "find_files");
        Ok(found)
    }

    fn remove_file(&self, path: &Path) -> PresswrightResult<()> {
        std::fs::remove_file(path).map_err(|e| map_io_error(path, e, "remove file"))
    }

    fn create_dir_all(&self, path: &Path) -> PresswrightResult<()> {
        std::fs::create_dir_all(path).map_err(|e| map_io_error(path, e, "create directory"))
    }

    fn set_permissions(&self, path: &Path, executable: bool) -> PresswrightResult<()> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let metadata =
                std::fs::metadata(path).map_err(|e| map_io_error(path, e, "get metadata"))?;
            let mut perms = metadata.permissions();
            let mode = perms.mode();
            perms.set_mode(if executable { mode | 0o111 } else { mode & !0o111 });
            std::fs::set_permissions(path, perms)
                .map_err(|e| map_io_error(path, e, "set permissions"))?;
        }
        #[cfg(not(unix))]
        {
            let _ = (path, executable);
        }
        Ok(())
    }
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> PresswrightError {
    if e.kind() == io::ErrorKind::NotFound {
        return ApplicationError::NotFound {
            path: path.to_path_buf(),
        }
        .into();
    }
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("Failed to {operation}: {e}"),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn finds_matching_files_recursively_in_order() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("uploads");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join(".gitkeep"), "").unwrap();
        std::fs::write(nested.join(".gitkeep"), "").unwrap();
        std::fs::write(nested.join("readme.txt"), "").unwrap();

        let found = LocalFilesystem::new()
            .find_files(dir.path(), ".gitkeep")
            .unwrap();
        assert_eq!(
            found,
            vec![dir.path().join(".gitkeep"), nested.join(".gitkeep")]
        );
    }

    #[test]
    fn missing_file_maps_to_not_found() {
        let dir = TempDir::new().unwrap();
        let err = LocalFilesystem::new()
            .read_to_string(&dir.path().join("wp-config.php"))
            .unwrap_err();
        assert!(matches!(
            err,
            PresswrightError::Application(ApplicationError::NotFound { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn set_permissions_toggles_executable_bit() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let phar = dir.path().join("wp-cli.phar");
        std::fs::write(&phar, "<?php").unwrap();

        let fs = LocalFilesystem::new();
        fs.set_permissions(&phar, true).unwrap();
        let mode = std::fs::metadata(&phar).unwrap().permissions().mode();
        assert_eq!(mode & 0o111, 0o111);

        fs.set_permissions(&phar, false).unwrap();
        let mode = std::fs::metadata(&phar).unwrap().permissions().mode();
        assert_eq!(mode & 0o111, 0);
    }
}
