use std::path::{Component, Path, PathBuf};
use tracing::{debug, trace, warn};
use walkdir::WalkDir;

use crate::engine::{CallSite, Locator};
use crate::error::{IoError, Result};

/// Directories never descended into.
pub const EXCLUDED_DIRS: &[&str] = &["target"];

#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    pub file_path: String,
    pub sites: Vec<CallSite>,
    pub errors: Vec<String>,
}

impl ScanResult {
    pub fn new(file_path: String) -> Self {
        Self {
            file_path,
            sites: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn add_error(&mut self, error: String) {
        self.errors.push(error);
    }

    pub fn site_count(&self) -> usize {
        self.sites.len()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Lists the lookup call sites of a source tree with the entries they reach.
pub struct Scanner {
    locator: Locator,
}

impl Scanner {
    pub fn new() -> Self {
        Self::with_locator(Locator::new())
    }

    pub fn with_locator(locator: Locator) -> Self {
        Self { locator }
    }

    /// Scans a single `.rs` file or every `.rs` file below a directory, one
    /// result per file walked. Unreadable or malformed files are recorded on
    /// their result; only a failing directory walk aborts the scan.
    pub fn scan_path(&self, root: &Path) -> Result<Vec<ScanResult>> {
        let files = if root.is_file() {
            vec![root.to_path_buf()]
        } else {
            walk_source_files(root, "rs", EXCLUDED_DIRS, true)?
        };
        debug!("scanning {} files under {}", files.len(), root.display());

        Ok(files.iter().map(|file| self.scan_file(file)).collect())
    }

    pub fn scan_file(&self, path: &Path) -> ScanResult {
        let file_path = path.display().to_string();
        trace!(file_path = %file_path, "scanning file");

        let mut result = ScanResult::new(file_path.clone());
        match self.locator.call_sites(path, &file_path) {
            Ok(sites) => result.sites = sites,
            Err(e) => {
                warn!("skipping {}: {}", file_path, e);
                result.add_error(e.to_string());
            }
        }
        result
    }
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new()
    }
}

pub fn walk_source_files(
    root: &Path,
    extension: &str,
    excluded_dirs: &[&str],
    exclude_hidden: bool,
) -> std::result::Result<Vec<PathBuf>, IoError> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            if e.depth() == 0 || !e.file_type().is_dir() {
                return true;
            }
            let name = e.file_name().to_string_lossy();
            if exclude_hidden && name.starts_with('.') {
                return false;
            }
            !excluded_dirs.contains(&name.as_ref())
        })
    {
        let entry = entry.map_err(|e| IoError::directory_scan(root, e))?;
        if !entry.file_type().is_file() {
            continue;
        }
        if exclude_hidden && entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        if entry.path().extension().is_some_and(|ext| ext == extension)
            && !in_excluded_dir(entry.path(), root, excluded_dirs)
        {
            files.push(entry.path().to_path_buf());
        }
    }

    Ok(files)
}

fn in_excluded_dir(path: &Path, root: &Path, excluded_dirs: &[&str]) -> bool {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative.components().any(|component| match component {
        Component::Normal(name) => excluded_dirs.contains(&name.to_string_lossy().as_ref()),
        _ => false,
    })
}
