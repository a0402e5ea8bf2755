use std::{
    fs, io,
    path::{Path, PathBuf},
};

use log::{debug, info};

use crate::error::{Error, Result};

/// Directory holding the diagrams of a single run.
///
/// It must not exist beforehand and must be empty when removed.
#[derive(Debug)]
pub struct WorkDir {
    path: PathBuf,
}

impl WorkDir {
    /// `<system temp>/<process id>`
    pub fn default_path() -> PathBuf {
        std::env::temp_dir().join(std::process::id().to_string())
    }

    pub fn create(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::create_dir(&path).map_err(|e| match e.kind() {
            io::ErrorKind::AlreadyExists => Error::WorkDirExists(path.clone()),
            _ => Error::Io(e),
        })?;
        info!("Created work directory {}", path.display());
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Removes the directory. Fails if any artifact was left behind.
    pub fn remove(self) -> Result<()> {
        fs::remove_dir(&self.path)?;
        debug!("Removed work directory {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_remove() {
        let scratch = tempfile::tempdir().unwrap();
        let path = scratch.path().join("run");
        let work_dir = WorkDir::create(&path).unwrap();
        assert!(path.is_dir());
        work_dir.remove().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_existing_directory_is_fatal() {
        let scratch = tempfile::tempdir().unwrap();
        let result = WorkDir::create(scratch.path());
        assert!(matches!(result, Err(Error::WorkDirExists(p)) if p == scratch.path()));
    }

    #[test]
    fn test_leftover_file_fails_removal() {
        let scratch = tempfile::tempdir().unwrap();
        let work_dir = WorkDir::create(scratch.path().join("run")).unwrap();
        fs::write(work_dir.path().join("stray.svg"), "<svg/>").unwrap();
        assert!(matches!(work_dir.remove(), Err(Error::Io(_))));
    }
}
