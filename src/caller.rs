//! Caller location: which file and line called into the lookup functions.
//!
//! Two capture paths are offered. [`from_stack`] walks a resolved
//! `backtrace::Backtrace` to any depth, so helpers can pass the key through a
//! few layers. [`tracked`] reads `#[track_caller]` locations, which only ever
//! describe the direct caller but survive optimized builds.
use backtrace::Backtrace;
use std::panic::Location;
use std::path::{Component, Path, PathBuf};

use crate::error::CallerError;

const ANCHOR: &str = "caller::from_stack";

/// One symbol of a captured backtrace. Inlined calls contribute one entry
/// each, innermost first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    pub function: Option<String>,
    pub file: Option<PathBuf>,
    pub line: Option<usize>,
}

/// A resolved caller: where to read the file from and how to report it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerFrame {
    pub disk_path: PathBuf,
    pub display: String,
    pub line: usize,
}

/// Flattens a backtrace into its symbols. Names are demangled without the
/// trailing hash.
pub fn frames_of(backtrace: &Backtrace) -> Vec<Frame> {
    backtrace
        .frames()
        .iter()
        .flat_map(|frame| frame.symbols())
        .map(|symbol| Frame {
            function: symbol.name().map(|name| format!("{name:#}")),
            file: symbol.filename().map(Path::to_path_buf),
            line: symbol.lineno().map(|line| line as usize),
        })
        .collect()
}

/// The frame `depth` levels above this function: 0 is `from_stack` itself,
/// 1 the public entry point, 2 the entry point's caller.
#[inline(never)]
pub fn from_stack(depth: usize) -> Result<CallerFrame, CallerError> {
    select_frame(&frames_of(&Backtrace::new()), depth)
}

fn select_frame(frames: &[Frame], depth: usize) -> Result<CallerFrame, CallerError> {
    let anchor = frames
        .iter()
        .position(|f| f.function.as_deref().is_some_and(|n| n.ends_with(ANCHOR)))
        .ok_or(CallerError::AnchorNotFound)?;
    let frames = &frames[anchor..];

    let frame = frames
        .get(depth)
        .ok_or_else(|| CallerError::depth_exceeded(depth, frames.len()))?;
    let (Some(file), Some(line)) = (frame.file.as_deref(), frame.line) else {
        return Err(CallerError::missing_frame_info(depth));
    };

    caller_frame(file.strip_prefix(".").unwrap_or(file), line)
}

/// Resolves a `#[track_caller]` location.
pub fn tracked(location: &Location<'_>) -> Result<CallerFrame, CallerError> {
    caller_frame(Path::new(location.file()), location.line() as usize)
}

fn caller_frame(file: &Path, line: usize) -> Result<CallerFrame, CallerError> {
    let cwd = current_dir()?;
    let (disk_path, display) = if file.is_absolute() {
        let relative =
            relative_to(file, &cwd).ok_or_else(|| CallerError::not_relative(file, &cwd))?;
        (file.to_path_buf(), relative.display().to_string())
    } else {
        locate_relative(file, &cwd)
    };

    Ok(CallerFrame {
        disk_path,
        display,
        line,
    })
}

fn current_dir() -> Result<PathBuf, CallerError> {
    std::env::current_dir().map_err(|source| CallerError::CurrentDir { source })
}

/// Compile-time paths are relative to the build root, which may be an
/// ancestor of the working directory in a workspace. Falls back to the path
/// as given when no ancestor holds the file.
fn locate_relative(file: &Path, cwd: &Path) -> (PathBuf, String) {
    for base in cwd.ancestors() {
        let candidate = base.join(file);
        if candidate.is_file() {
            let display = relative_to(&candidate, cwd)
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| file.display().to_string());
            return (candidate, display);
        }
    }
    (cwd.join(file), file.display().to_string())
}

/// `path` relative to `base`, climbing with `..` where needed. Both must be
/// absolute and share a root.
pub fn relative_to(path: &Path, base: &Path) -> Option<PathBuf> {
    if !path.is_absolute() || !base.is_absolute() {
        return None;
    }
    let path: Vec<Component> = path.components().collect();
    let base: Vec<Component> = base.components().collect();
    if path.first() != base.first() {
        return None;
    }

    let common = path
        .iter()
        .zip(base.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut relative = PathBuf::new();
    for _ in common..base.len() {
        relative.push("..");
    }
    for component in &path[common..] {
        relative.push(component.as_os_str());
    }
    Some(relative)
}
