//! JSON output formatter for machine-readable results.

use super::formatter::JsonOutput;
use super::formatter::OutputFormatter;
use anyhow::Result;
use ptbundle_core::BundleReport;
use serde::Serialize;
use std::io::Write;
use std::io::{self};
use std::path::PathBuf;

pub struct JsonFormatter;

impl JsonFormatter {
    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }
}

#[derive(Serialize)]
struct BundleOutput {
    version: String,
    versioned_archive: String,
    unversioned_archive: String,
    versioned_marker: String,
    unversioned_marker: String,
    files_added: usize,
    directories_added: usize,
    bytes_written: u64,
    cleaned_before: usize,
    cleaned_after: usize,
    cleaned_archive: usize,
    version_injected: bool,
    duration_ms: u128,
    warnings: Vec<String>,
}

impl From<&BundleReport> for BundleOutput {
    fn from(report: &BundleReport) -> Self {
        Self {
            version: report.version.clone(),
            versioned_archive: report.versioned_archive.display().to_string(),
            unversioned_archive: report.unversioned_archive.display().to_string(),
            versioned_marker: report.versioned_marker.display().to_string(),
            unversioned_marker: report.unversioned_marker.display().to_string(),
            files_added: report.archive.files_added,
            directories_added: report.archive.directories_added,
            bytes_written: report.archive.bytes_written,
            cleaned_before: report.cleaned_before,
            cleaned_after: report.cleaned_after,
            cleaned_archive: report.cleaned_archive,
            version_injected: report.version_injected,
            duration_ms: report.duration.as_millis(),
            warnings: report.archive.warnings.clone(),
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_bundle_result(&self, report: &BundleReport) -> Result<()> {
        Self::output(&JsonOutput::success("bundle", BundleOutput::from(report)))
    }

    fn format_version(&self, version: &str) -> Result<()> {
        #[derive(Serialize)]
        struct VersionOutput<'a> {
            version: &'a str,
        }

        Self::output(&JsonOutput::success("version", VersionOutput { version }))
    }

    fn format_glob_matches(&self, pattern: &str, matches: &[PathBuf]) -> Result<()> {
        #[derive(Serialize)]
        struct GlobOutput<'a> {
            pattern: &'a str,
            matches: Vec<String>,
        }

        let data = GlobOutput {
            pattern,
            matches: matches.iter().map(|p| p.display().to_string()).collect(),
        };
        Self::output(&JsonOutput::success("glob", data))
    }

    fn format_error(&self, error: &anyhow::Error) {
        let output = JsonOutput::<()>::error("unknown", format!("{error:?}"));
        let _ = Self::output(&output);
    }

    fn format_warning(&self, message: &str) {
        #[derive(Serialize)]
        struct WarningData<'a> {
            message: &'a str,
        }

        let _ = Self::output(&JsonOutput::success("warning", WarningData { message }));
    }
}
