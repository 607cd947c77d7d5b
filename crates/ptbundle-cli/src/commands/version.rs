//! Version command implementation.

use crate::cli::VersionArgs;
use crate::output::OutputFormatter;
use anyhow::Context;
use anyhow::Result;
use ptbundle_core::BaseDir;
use ptbundle_core::GitDescribe;
use ptbundle_core::version::resolve_version;

pub fn execute(args: &VersionArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let base = match &args.base_dir {
        Some(dir) => BaseDir::new(dir),
        None => BaseDir::current(),
    }
    .context("Cannot open repository directory")?;

    let version = resolve_version(&GitDescribe::new(base.as_path()));
    formatter.format_version(&version)
}
