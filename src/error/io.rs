use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IoError {
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to read file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to scan directory '{path}': {source}")]
    DirectoryScanError {
        path: PathBuf,
        source: walkdir::Error,
    },
}

impl IoError {
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            return Self::FileNotFound { path };
        }
        Self::ReadError { path, source }
    }

    pub fn directory_scan(path: impl Into<PathBuf>, source: walkdir::Error) -> Self {
        Self::DirectoryScanError {
            path: path.into(),
            source,
        }
    }
}
