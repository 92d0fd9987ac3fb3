use serde::Serialize;

use crate::engine::{CallSite, EntryInfo};
use crate::scanner::ScanResult;

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Every file walked, including those without lookup calls.
    pub files_scanned: usize,
    pub total_sites: usize,
    pub unresolved_sites: usize,
    pub sites: Vec<SiteReport>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FileError>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SiteReport {
    pub file: String,
    pub line: usize,
    pub callee: String,
    pub argument: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unresolved: Option<String>,
    pub entries: Vec<EntryReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EntryReport {
    /// Decoded key; `None` when the key is not a string literal.
    pub key: Option<String>,
    pub line: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct FileError {
    pub file: String,
    pub message: String,
}

impl Report {
    pub fn from_results(results: &[ScanResult]) -> Self {
        let sites: Vec<SiteReport> = results
            .iter()
            .flat_map(|r| r.sites.iter().map(SiteReport::from_call_site))
            .collect();

        let errors = results
            .iter()
            .flat_map(|r| {
                r.errors.iter().map(|message| FileError {
                    file: r.file_path.clone(),
                    message: message.clone(),
                })
            })
            .collect();

        Report {
            files_scanned: results.len(),
            total_sites: sites.len(),
            unresolved_sites: sites.iter().filter(|s| s.unresolved.is_some()).count(),
            sites,
            errors,
        }
    }
}

impl SiteReport {
    pub fn from_call_site(site: &CallSite) -> Self {
        SiteReport {
            file: site.position.file.clone(),
            line: site.position.line,
            callee: site.callee.clone(),
            argument: site.argument.clone(),
            unresolved: site.unresolved.map(|u| u.as_str().to_string()),
            entries: site.entries.iter().map(EntryReport::from_entry).collect(),
        }
    }
}

impl EntryReport {
    fn from_entry(entry: &EntryInfo) -> Self {
        EntryReport {
            key: entry.key.clone(),
            line: entry.position.line,
        }
    }
}
