//! The bundle pipeline.
//!
//! A run walks through a fixed sequence of stages:
//!
//! ```text
//! resolve version -> clean before build -> build hook -> clean after build
//!   -> cleanup hook -> create staging -> assemble -> clean archive
//!   -> inject version -> ensure outdir -> write markers
//!   -> archive (versioned) -> archive (unversioned) -> delete staging
//! ```
//!
//! Only the assemble stage differs between bundles; it is delegated to the
//! injected [`StagingStrategy`].

use crate::BundleReport;
use crate::BundleSpec;
use crate::Result;
use crate::archive::archive_directory;
use crate::config::VERSION_PLACEHOLDER;
use crate::fs_ops;
use crate::hooks;
use crate::hooks::HookKind;
use crate::staging::StagingStrategy;
use crate::staging::StagingTree;
use crate::staging::remove_matching;
use crate::version::GitDescribe;
use crate::version::VersionSource;
use crate::version::resolve_version;
use std::fmt;
use std::fs;
use std::io;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::time::Instant;

/// Marker file whose content is the versioned archive's file name.
pub const VERSIONED_MARKER: &str = "BUNDLE_FNAME_VERSION_APPENDED";

/// Marker file whose content is the unversioned archive's file name.
pub const UNVERSIONED_MARKER: &str = "BUNDLE_FNAME_NO_VERSION";

#[derive(Debug, Clone, Copy)]
enum Stage {
    ResolveVersion,
    CleanBefore,
    BuildHook,
    CleanAfter,
    CleanupHook,
    CreateStaging,
    Assemble,
    CleanArchive,
    InjectVersion,
    EnsureOutdir,
    WriteMarkers,
    ArchiveVersioned,
    ArchiveUnversioned,
    DeleteStaging,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ResolveVersion => "resolve version",
            Self::CleanBefore => "clean before build",
            Self::BuildHook => "build hook",
            Self::CleanAfter => "clean after build",
            Self::CleanupHook => "cleanup hook",
            Self::CreateStaging => "create staging",
            Self::Assemble => "assemble staging",
            Self::CleanArchive => "clean archive",
            Self::InjectVersion => "inject version",
            Self::EnsureOutdir => "ensure output directory",
            Self::WriteMarkers => "write markers",
            Self::ArchiveVersioned => "archive (versioned)",
            Self::ArchiveUnversioned => "archive (unversioned)",
            Self::DeleteStaging => "delete staging",
        };
        f.write_str(name)
    }
}

fn enter(stage: Stage) {
    log::debug!("stage: {stage}");
}

/// What the staging half of a run did.
#[derive(Debug, Default)]
struct StagingOutcome {
    cleaned_before: usize,
    cleaned_after: usize,
    cleaned_archive: usize,
    version_injected: bool,
}

/// Produces the versioned and unversioned archives for one [`BundleSpec`].
///
/// # Examples
///
/// ```no_run
/// use ptbundle_core::BundleSpec;
/// use ptbundle_core::Bundler;
/// use ptbundle_core::FixedVersion;
/// use ptbundle_core::staging::AllowList;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let spec = BundleSpec::new("my-plugin")?;
/// let strategy = AllowList::new()
///     .with_folders(vec!["dist".into()])
///     .with_files(vec!["my-plugin.php".into()]);
///
/// let report = Bundler::new(spec, strategy)
///     .with_version_source(FixedVersion::new("v2.1.0"))
///     .run()?;
/// assert_eq!(report.version, "2.1.0");
/// # Ok(())
/// # }
/// ```
pub struct Bundler<S: StagingStrategy> {
    spec: BundleSpec,
    strategy: S,
    version_source: Box<dyn VersionSource>,
}

impl<S: StagingStrategy> Bundler<S> {
    /// Creates a bundler that reads its version from `git describe` in the
    /// spec's base directory.
    #[must_use]
    pub fn new(spec: BundleSpec, strategy: S) -> Self {
        let version_source = Box::new(GitDescribe::new(spec.base_path()));
        Self {
            spec,
            strategy,
            version_source,
        }
    }

    /// Replaces the version source.
    #[must_use]
    pub fn with_version_source<V: VersionSource + 'static>(mut self, source: V) -> Self {
        self.version_source = Box::new(source);
        self
    }

    /// Returns the bundle configuration.
    #[must_use]
    pub fn spec(&self) -> &BundleSpec {
        &self.spec
    }

    /// Returns the staging strategy.
    #[must_use]
    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    /// Asks the version source for the bundle version.
    ///
    /// Falls back to `1.0.0` and drops one leading `v`/`V`.
    #[must_use]
    pub fn resolve_version(&self) -> String {
        resolve_version(self.version_source.as_ref())
    }

    /// Anchors a project-relative path to the base directory.
    #[must_use]
    pub fn resolve_relative_path(&self, relative: &str) -> String {
        self.spec.base_dir.resolve(relative)
    }

    /// Expands a pattern that may contain `**`.
    #[must_use]
    pub fn globstar(&self, pattern: &str) -> Vec<PathBuf> {
        crate::glob::globstar(pattern)
    }

    /// Runs every stage up to and including version injection and leaves the
    /// staging tree on disk.
    ///
    /// Returns the staging tree path. Remove it with
    /// [`delete_staging`](Self::delete_staging). On error the partially
    /// assembled staging tree is removed.
    pub fn prepare_staging(&self, version: &str) -> Result<PathBuf> {
        self.spec.validate()?;
        let (staging, _) = self.stage(version)?;
        Ok(staging.persist())
    }

    /// Removes the staging tree if present.
    pub fn delete_staging(&self) -> Result<()> {
        fs_ops::remove(&self.spec.staging_path())
    }

    /// Runs the whole pipeline.
    ///
    /// The staging tree is gone when this returns, whether it succeeded or
    /// not.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by a stage. Version lookup never fails;
    /// a missing version falls back to the default.
    pub fn run(&self) -> Result<BundleReport> {
        let start = Instant::now();
        self.spec.validate()?;
        log::debug!(
            "bundling {} from {} with {} staging",
            self.spec.ptname,
            self.spec.base_dir.as_str(),
            self.strategy.name()
        );

        enter(Stage::ResolveVersion);
        let version = self.resolve_version();
        log::debug!("version {version}");

        let (staging, outcome) = self.stage(&version)?;

        enter(Stage::EnsureOutdir);
        let outdir = self.spec.outdir_path();
        fs_ops::create_dir(&outdir, fs_ops::DIR_MODE)?;

        let versioned_name = format!("{}.{version}.zip", self.spec.ptname);
        let unversioned_name = format!("{}.zip", self.spec.ptname);

        enter(Stage::WriteMarkers);
        let versioned_marker = outdir.join(VERSIONED_MARKER);
        let unversioned_marker = outdir.join(UNVERSIONED_MARKER);
        fs::write(&versioned_marker, &versioned_name)?;
        fs::write(&unversioned_marker, &unversioned_name)?;

        enter(Stage::ArchiveVersioned);
        let versioned_archive = outdir.join(&versioned_name);
        let archive = archive_directory(staging.path(), &versioned_archive)?;
        log::info!("created {}", versioned_archive.display());

        enter(Stage::ArchiveUnversioned);
        let unversioned_archive = outdir.join(&unversioned_name);
        archive_directory(staging.path(), &unversioned_archive)?;
        log::info!("created {}", unversioned_archive.display());

        enter(Stage::DeleteStaging);
        staging.remove()?;

        Ok(BundleReport {
            version,
            versioned_archive,
            unversioned_archive,
            versioned_marker,
            unversioned_marker,
            archive,
            cleaned_before: outcome.cleaned_before,
            cleaned_after: outcome.cleaned_after,
            cleaned_archive: outcome.cleaned_archive,
            version_injected: outcome.version_injected,
            duration: start.elapsed(),
        })
    }

    /// Runs the pipeline, printing any error to stdout instead of returning
    /// it.
    ///
    /// Prefer [`run`](Self::run) when the caller needs to know whether the
    /// bundle was produced.
    pub fn create_zip_archive(&self) {
        let stdout = io::stdout();
        self.create_zip_archive_to(&mut stdout.lock());
    }

    /// Runs the pipeline, writing any error message to `out`.
    pub fn create_zip_archive_to(&self, out: &mut dyn Write) {
        if let Err(err) = self.run() {
            log::error!("bundling {} failed: {err}", self.spec.ptname);
            let _ = writeln!(out, "{err}");
        }
    }

    /// Runs the stages from pre-build cleanup through version injection.
    fn stage(&self, version: &str) -> Result<(StagingTree, StagingOutcome)> {
        let spec = &self.spec;
        let base = spec.base_dir.as_str();
        let mut outcome = StagingOutcome::default();

        enter(Stage::CleanBefore);
        outcome.cleaned_before = remove_matching(base, &spec.clean_before_build)?;

        enter(Stage::BuildHook);
        hooks::invoke(HookKind::Build, spec.build_hook())?;

        enter(Stage::CleanAfter);
        outcome.cleaned_after = remove_matching(base, &spec.clean_after_build)?;

        enter(Stage::CleanupHook);
        hooks::invoke(HookKind::Cleanup, spec.cleanup_hook())?;

        enter(Stage::CreateStaging);
        let staging = StagingTree::create(&spec.work_dir, &spec.ptname)?;

        enter(Stage::Assemble);
        self.strategy.assemble(&spec.base_dir, &staging)?;

        enter(Stage::CleanArchive);
        outcome.cleaned_archive = remove_matching(staging.as_str(), &spec.archive_clean)?;

        enter(Stage::InjectVersion);
        let entry_file = staging.path().join(spec.entry_file_name());
        outcome.version_injected = inject_version(&entry_file, version)?;

        Ok((staging, outcome))
    }
}

impl<S: StagingStrategy> fmt::Debug for Bundler<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bundler")
            .field("spec", &self.spec)
            .field("strategy", &self.strategy)
            .finish_non_exhaustive()
    }
}

/// Replaces every placeholder in `path` with `version`.
///
/// Returns `false` without touching anything if `path` is not a file.
fn inject_version(path: &Path, version: &str) -> Result<bool> {
    if !path.is_file() {
        log::debug!("no entry file at {}", path.display());
        return Ok(false);
    }

    let contents = fs::read(path)?;
    let replaced = replace_all(&contents, VERSION_PLACEHOLDER.as_bytes(), version.as_bytes());
    fs::write(path, replaced)?;
    Ok(true)
}

/// Byte-level find and replace, so entry files need not be UTF-8.
fn replace_all(haystack: &[u8], needle: &[u8], replacement: &[u8]) -> Vec<u8> {
    if needle.is_empty() {
        return haystack.to_vec();
    }

    let mut out = Vec::with_capacity(haystack.len());
    let mut rest = haystack;

    while let Some(pos) = rest.windows(needle.len()).position(|w| w == needle) {
        out.extend_from_slice(&rest[..pos]);
        out.extend_from_slice(replacement);
        rest = &rest[pos + needle.len()..];
    }
    out.extend_from_slice(rest);
    out
}
