//! Bundle command implementation.

use crate::cli::BundleArgs;
use crate::error::add_bundle_context;
use crate::output::OutputFormatter;
use anyhow::Result;
use anyhow::bail;
use ptbundle_core::BundleReport;
use ptbundle_core::BundleSpec;
use ptbundle_core::Bundler;
use ptbundle_core::CommandHook;
use ptbundle_core::FixedVersion;
use ptbundle_core::StagingStrategy;
use ptbundle_core::staging::AllowList;
use ptbundle_core::staging::DenyList;

pub fn execute(args: &BundleArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let spec = build_spec(args)?;

    let report = if args.inclusive {
        let strategy = DenyList::new().with_exclude(args.exclude.clone());
        run(spec, strategy, args.set_version.as_deref())?
    } else {
        if args.folders.is_empty() && args.files.is_empty() {
            bail!(
                "Nothing selected for bundle '{}'\n\
                 HINT: Name what to include with --folder/--file, or use --inclusive \
                 to bundle the whole project.",
                args.name
            );
        }
        let strategy = AllowList::new()
            .with_folders(args.folders.clone())
            .with_files(args.files.clone());
        run(spec, strategy, args.set_version.as_deref())?
    };

    for warning in &report.archive.warnings {
        formatter.format_warning(warning);
    }
    formatter.format_bundle_result(&report)
}

fn build_spec(args: &BundleArgs) -> Result<BundleSpec> {
    let mut spec = add_bundle_context(BundleSpec::new(&args.name), &args.name)?;
    if let Some(dir) = &args.base_dir {
        spec = add_bundle_context(spec.with_base_dir(dir), &args.name)?;
    }
    if let Some(dir) = &args.work_dir {
        spec = spec.with_work_dir(dir);
    }

    let base = spec.base_path().to_path_buf();
    spec = spec
        .with_outdir(&args.outdir)
        .with_entry_extension(&args.entry_extension)
        .with_clean_before_build(args.clean_before.clone())
        .with_clean_after_build(args.clean_after.clone())
        .with_archive_clean(args.clean_archive.clone());

    if let Some(command) = &args.build {
        spec = spec.with_build_hook(CommandHook::new(command).current_dir(&base));
    }
    if let Some(command) = &args.cleanup {
        spec = spec.with_cleanup_hook(CommandHook::new(command).current_dir(&base));
    }

    add_bundle_context(spec.validate(), &args.name)?;
    Ok(spec)
}

fn run<S: StagingStrategy>(
    spec: BundleSpec,
    strategy: S,
    version: Option<&str>,
) -> Result<BundleReport> {
    let name = spec.ptname.clone();
    let mut bundler = Bundler::new(spec, strategy);
    if let Some(version) = version {
        bundler = bundler.with_version_source(FixedVersion::new(version));
    }

    log::debug!("running {} bundler for {name}", bundler.strategy().name());
    add_bundle_context(bundler.run(), &name)
}
