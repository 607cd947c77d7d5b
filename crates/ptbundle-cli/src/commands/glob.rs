//! Glob command implementation.

use crate::cli::GlobArgs;
use crate::output::OutputFormatter;
use anyhow::Context;
use anyhow::Result;
use ptbundle_core::BaseDir;
use ptbundle_core::globstar;

pub fn execute(args: &GlobArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let pattern = match &args.base_dir {
        Some(dir) => BaseDir::new(dir)
            .context("Cannot open base directory")?
            .resolve(&args.pattern),
        None => args.pattern.clone(),
    };

    let matches = globstar(&pattern);
    log::debug!("{pattern} matched {} paths", matches.len());
    formatter.format_glob_matches(&pattern, &matches)
}
