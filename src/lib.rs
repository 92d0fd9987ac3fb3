//! dataloc
//!
//! Maps a table-driven test's key back to the line of the table entry that
//! defines it. A failing iteration can then report `tests/foo.rs:42` for the
//! entry instead of the loop body shared by every case.
//!
//! ```ignore
//! for tc in cases {
//!     assert_eq!(run(tc.input), tc.want, "{}", dataloc::l(tc.name));
//! }
//! ```
pub mod caller;
pub mod cli;
pub mod engine;
pub mod error;
pub mod logging;
pub mod output;
pub mod scanner;
pub mod utils;

pub use engine::{Locator, LocatorBuilder, SourcePosition};

use caller::CallerFrame;
use tracing::debug;

/// Returned whenever a position cannot be determined.
pub const UNKNOWN: &str = "unknown";

/// Position of the table entry whose key is `key`, for the lookup call
/// `depth` frames up the stack (2 is the direct caller of this function).
/// Always returns `"path:line"` or [`UNKNOWN`].
#[inline(never)]
pub fn locate(key: &str, depth: usize) -> String {
    resolve(caller::from_stack(depth), key, depth)
}

/// `key`'s table entry, for a direct call from a test loop.
#[inline(never)]
pub fn l(key: &str) -> String {
    resolve(caller::from_stack(2), key, 2)
}

/// Like [`l`], called through one helper function.
#[inline(never)]
pub fn l3(key: &str) -> String {
    resolve(caller::from_stack(3), key, 3)
}

/// Like [`l`], called through two helper functions.
#[inline(never)]
pub fn l4(key: &str) -> String {
    resolve(caller::from_stack(4), key, 4)
}

/// Like [`l`], called through three helper functions.
#[inline(never)]
pub fn l5(key: &str) -> String {
    resolve(caller::from_stack(5), key, 5)
}

/// Like [`l`], called through four helper functions.
#[inline(never)]
pub fn l6(key: &str) -> String {
    resolve(caller::from_stack(6), key, 6)
}

/// Like [`l`], but locates the caller through `#[track_caller]` rather than
/// a backtrace. Works in optimized builds; direct callers only.
#[track_caller]
pub fn at(key: &str) -> String {
    resolve(caller::tracked(std::panic::Location::caller()), key, 2)
}

fn resolve(frame: Result<CallerFrame, error::CallerError>, key: &str, depth: usize) -> String {
    let frame = match frame {
        Ok(frame) => frame,
        Err(e) => {
            debug!("caller at depth {} unavailable: {}", depth, e);
            return UNKNOWN.to_string();
        }
    };

    // Past the direct caller the line holds a helper call, not a lookup.
    let locator = if depth > 2 {
        Locator::builder().any_callee(true).build()
    } else {
        Locator::new()
    };

    match locator.locate_file(&frame.disk_path, frame.line, key) {
        Ok(Some(position)) => format!("{}:{}", frame.display, position.line),
        Ok(None) => UNKNOWN.to_string(),
        Err(e) => {
            debug!("cannot resolve {:?} from {}: {}", key, frame.display, e);
            UNKNOWN.to_string()
        }
    }
}
