//! Human-readable output formatter with colors and styling.

use super::formatter::OutputFormatter;
use anyhow::Result;
use console::Term;
use console::style;
use ptbundle_core::BundleReport;
use std::path::PathBuf;

pub struct HumanFormatter {
    verbose: bool,
    quiet: bool,
    use_colors: bool,
    term: Term,
    err_term: Term,
}

impl HumanFormatter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            use_colors: console::colors_enabled(),
            term: Term::stdout(),
            err_term: Term::stderr(),
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn format_size(bytes: u64) -> String {
        const KB: u64 = 1024;
        const MB: u64 = KB * 1024;
        const GB: u64 = MB * 1024;

        if bytes >= GB {
            format!("{:.1} GB", bytes as f64 / GB as f64)
        } else if bytes >= MB {
            format!("{:.1} MB", bytes as f64 / MB as f64)
        } else if bytes >= KB {
            format!("{:.1} KB", bytes as f64 / KB as f64)
        } else {
            format!("{bytes} B")
        }
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_bundle_result(&self, report: &BundleReport) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        if self.use_colors {
            let _ = self.term.write_line(&format!(
                "{} Bundled version {}",
                style("✓").green().bold(),
                style(&report.version).bold()
            ));
        } else {
            let _ = self
                .term
                .write_line(&format!("Bundled version {}", report.version));
        }

        let _ = self.term.write_line("");
        for archive in report.archives() {
            let _ = self
                .term
                .write_line(&format!("  Archive:      {}", archive.display()));
        }
        let _ = self.term.write_line(&format!(
            "  Files:        {}",
            report.archive.files_added
        ));
        let _ = self.term.write_line(&format!(
            "  Directories:  {}",
            report.archive.directories_added
        ));
        let _ = self.term.write_line(&format!(
            "  Total size:   {}",
            Self::format_size(report.archive.bytes_written)
        ));

        if self.verbose {
            let _ = self.term.write_line(&format!(
                "  Markers:      {}, {}",
                report.versioned_marker.display(),
                report.unversioned_marker.display()
            ));
            let _ = self.term.write_line(&format!(
                "  Cleaned:      {} before build, {} after build, {} from bundle",
                report.cleaned_before, report.cleaned_after, report.cleaned_archive
            ));
            let _ = self.term.write_line(&format!(
                "  Version set:  {}",
                if report.version_injected { "yes" } else { "no entry file" }
            ));
            let _ = self
                .term
                .write_line(&format!("  Duration:     {:?}", report.duration));
        }

        Ok(())
    }

    fn format_version(&self, version: &str) -> Result<()> {
        self.term.write_line(version)?;
        Ok(())
    }

    fn format_glob_matches(&self, pattern: &str, matches: &[PathBuf]) -> Result<()> {
        for path in matches {
            self.term.write_line(&path.display().to_string())?;
        }
        if matches.is_empty() && !self.quiet {
            let _ = self
                .err_term
                .write_line(&format!("No matches for '{pattern}'"));
        }
        Ok(())
    }

    fn format_error(&self, error: &anyhow::Error) {
        if self.use_colors {
            let _ = self
                .err_term
                .write_line(&format!("{} {error:?}", style("ERROR:").red().bold()));
        } else {
            let _ = self.err_term.write_line(&format!("ERROR: {error:?}"));
        }
    }

    fn format_warning(&self, message: &str) {
        if self.quiet {
            return;
        }

        if self.use_colors {
            let _ = self
                .err_term
                .write_line(&format!("{} {message}", style("⚠").yellow().bold()));
        } else {
            let _ = self.err_term.write_line(&format!("WARNING: {message}"));
        }
    }
}
