//! On-disk project layout.
//!
//! Nothing here touches the filesystem until [`ProjectPaths::ensure_directories`]
//! is called.

use std::io;
use std::path::{Path, PathBuf};

/// Directories used by an analysis run, relative to a project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectPaths {
    root: PathBuf,
}

impl ProjectPaths {
    /// Layout rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Project root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Raw input files, searched when no data file is given.
    pub fn raw_data_dir(&self) -> PathBuf {
        self.root.join("data").join("raw")
    }

    /// Cleaned intermediate tables.
    pub fn processed_data_dir(&self) -> PathBuf {
        self.root.join("data").join("processed")
    }

    /// Serialized models and preprocessors.
    pub fn models_dir(&self) -> PathBuf {
        self.root.join("models")
    }

    /// CSV tables and JSON reports.
    pub fn reports_dir(&self) -> PathBuf {
        self.root.join("reports")
    }

    /// Log files.
    pub fn logs_dir(&self) -> PathBuf {
        self.root.join("logs")
    }

    /// The analysis log file.
    pub fn log_file(&self) -> PathBuf {
        self.logs_dir().join("analytics.log")
    }

    /// Every directory in the layout.
    pub fn directories(&self) -> [PathBuf; 5] {
        [
            self.raw_data_dir(),
            self.processed_data_dir(),
            self.models_dir(),
            self.reports_dir(),
            self.logs_dir(),
        ]
    }

    /// Create every directory in the layout that does not exist yet.
    pub fn ensure_directories(&self) -> io::Result<()> {
        for dir in self.directories() {
            std::fs::create_dir_all(&dir)?;
        }
        Ok(())
    }
}

impl Default for ProjectPaths {
    fn default() -> Self {
        Self::new(".")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        let paths = ProjectPaths::new("/srv/claims");

        assert_eq!(paths.raw_data_dir(), Path::new("/srv/claims/data/raw"));
        assert_eq!(paths.reports_dir(), Path::new("/srv/claims/reports"));
        assert_eq!(paths.log_file(), Path::new("/srv/claims/logs/analytics.log"));
    }

    #[test]
    fn test_construction_does_not_create_directories() {
        let root = std::env::temp_dir().join(format!("claimlens-lazy-{}", std::process::id()));
        let paths = ProjectPaths::new(&root);

        assert!(!paths.models_dir().exists());
    }
}
