use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CallerError {
    #[error("stack depth {depth} exceeds the {available} captured frames")]
    DepthExceeded { depth: usize, available: usize },

    #[error("resolver frame not found in captured backtrace")]
    AnchorNotFound,

    #[error("frame at depth {depth} carries no file/line information")]
    MissingFrameInfo { depth: usize },

    #[error("cannot determine current directory: {source}")]
    CurrentDir { source: std::io::Error },

    #[error("cannot make {path} relative to {base}")]
    NotRelative { path: PathBuf, base: PathBuf },
}

impl CallerError {
    pub fn depth_exceeded(depth: usize, available: usize) -> Self {
        Self::DepthExceeded { depth, available }
    }

    pub fn missing_frame_info(depth: usize) -> Self {
        Self::MissingFrameInfo { depth }
    }

    pub fn not_relative(path: impl Into<PathBuf>, base: impl Into<PathBuf>) -> Self {
        Self::NotRelative {
            path: path.into(),
            base: base.into(),
        }
    }
}
