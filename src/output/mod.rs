mod formatter;
mod report;

pub use formatter::OutputFormatter;
pub use report::{EntryReport, FileError, Report, SiteReport};
