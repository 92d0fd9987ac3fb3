use anyhow::Result;
use std::fmt::Write;

use crate::cli::OutputFormat;
use crate::scanner::ScanResult;

use super::{Report, SiteReport};

pub struct OutputFormatter;

impl OutputFormatter {
    pub fn format(results: &[ScanResult], format: OutputFormat) -> Result<String> {
        let report = Report::from_results(results);

        match format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&report)?),
            OutputFormat::Text => Ok(Self::format_text(&report)),
        }
    }

    fn format_text(report: &Report) -> String {
        let mut out = String::new();
        for site in &report.sites {
            Self::write_site(&mut out, site);
        }
        for error in &report.errors {
            let _ = writeln!(out, "{}: error: {}", error.file, error.message);
        }
        let _ = writeln!(
            out,
            "{} call sites in {} files ({} unresolved)",
            report.total_sites, report.files_scanned, report.unresolved_sites
        );
        out
    }

    fn write_site(out: &mut String, site: &SiteReport) {
        let _ = write!(out, "{}:{} {}({})", site.file, site.line, site.callee, site.argument);
        if let Some(reason) = &site.unresolved {
            let _ = writeln!(out, ": unresolved ({reason})");
            return;
        }
        let _ = writeln!(out);
        for entry in &site.entries {
            match &entry.key {
                Some(key) => {
                    let _ = writeln!(out, "  {:?} -> {}:{}", key, site.file, entry.line);
                }
                None => {
                    let _ = writeln!(out, "  <non-literal> -> {}:{}", site.file, entry.line);
                }
            }
        }
    }
}
