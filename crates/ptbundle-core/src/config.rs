//! Configuration for a bundle run.

use crate::BundleError;
use crate::Hook;
use crate::Result;
use crate::types::BaseDir;
use std::fmt;
use std::path::Path;
use std::path::PathBuf;

/// Default output directory, relative to the working directory.
pub const DEFAULT_OUTDIR: &str = "bundled";

/// Default extension of the entry file that receives the version.
pub const DEFAULT_ENTRY_EXTENSION: &str = "php";

/// Placeholder replaced with the resolved version in the entry file.
pub const VERSION_PLACEHOLDER: &str = "%%VERSION%%";

/// What to bundle and where.
///
/// Everything except the name has a default, so the minimal spec is just
/// `BundleSpec::new("my-plugin")?`. Relative patterns in the cleanup lists
/// are anchored to [`base_dir`](Self::base_dir); archive-internal cleanup is
/// anchored to the staging tree instead.
///
/// # Examples
///
/// ```no_run
/// use ptbundle_core::BundleSpec;
/// use ptbundle_core::CommandHook;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let spec = BundleSpec::new("my-plugin")?
///     .with_base_dir("./my-plugin")?
///     .with_outdir("dist-zips")
///     .with_clean_before_build(vec!["dist".into()])
///     .with_build_hook(CommandHook::new("npm run build").current_dir("./my-plugin"));
/// spec.validate()?;
/// # Ok(())
/// # }
/// ```
pub struct BundleSpec {
    /// Base name of the staging tree, the archives and the entry file.
    pub ptname: String,

    /// Directory that project-relative paths and patterns resolve against.
    ///
    /// Default: the process working directory.
    pub base_dir: BaseDir,

    /// Directory the staging tree is created in.
    ///
    /// Default: the process working directory.
    pub work_dir: PathBuf,

    /// Where archives and marker files are written. Relative paths are
    /// resolved against `work_dir`.
    ///
    /// Default: `bundled`.
    pub outdir: PathBuf,

    /// Extension of the entry file `{ptname}.{entry_extension}`.
    ///
    /// Default: `php`.
    pub entry_extension: String,

    /// Patterns deleted from the base directory before the build hook runs.
    pub clean_before_build: Vec<String>,

    /// Patterns deleted from the base directory after the build hook runs.
    pub clean_after_build: Vec<String>,

    /// Patterns deleted from the staging tree once it is assembled.
    pub archive_clean: Vec<String>,

    build_hook: Option<Box<dyn Hook>>,
    cleanup_hook: Option<Box<dyn Hook>>,
}

impl BundleSpec {
    /// Creates a spec for `ptname` rooted at the process working directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the working directory cannot be determined.
    pub fn new(ptname: impl Into<String>) -> Result<Self> {
        let base_dir = BaseDir::current()?;
        let work_dir = base_dir.as_path().to_path_buf();
        Ok(Self {
            ptname: ptname.into(),
            base_dir,
            work_dir,
            outdir: PathBuf::from(DEFAULT_OUTDIR),
            entry_extension: DEFAULT_ENTRY_EXTENSION.to_owned(),
            clean_before_build: Vec::new(),
            clean_after_build: Vec::new(),
            archive_clean: Vec::new(),
            build_hook: None,
            cleanup_hook: None,
        })
    }

    /// Sets the base directory, canonicalizing it.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory does not exist or is not a directory.
    pub fn with_base_dir(mut self, path: impl Into<PathBuf>) -> Result<Self> {
        self.base_dir = BaseDir::new(path)?;
        Ok(self)
    }

    /// Sets the directory the staging tree is created in.
    #[must_use]
    pub fn with_work_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.work_dir = path.into();
        self
    }

    /// Sets the output directory. A blank value means the working directory.
    #[must_use]
    pub fn with_outdir(mut self, outdir: impl AsRef<str>) -> Self {
        let trimmed = outdir.as_ref().trim();
        self.outdir = PathBuf::from(if trimmed.is_empty() { "." } else { trimmed });
        self
    }

    /// Sets the entry file extension (without the dot).
    #[must_use]
    pub fn with_entry_extension(mut self, extension: impl AsRef<str>) -> Self {
        self.entry_extension = extension.as_ref().trim_start_matches('.').to_owned();
        self
    }

    /// Sets the patterns removed before the build hook.
    #[must_use]
    pub fn with_clean_before_build(mut self, patterns: Vec<String>) -> Self {
        self.clean_before_build = patterns;
        self
    }

    /// Sets the patterns removed after the build hook.
    #[must_use]
    pub fn with_clean_after_build(mut self, patterns: Vec<String>) -> Self {
        self.clean_after_build = patterns;
        self
    }

    /// Sets the patterns removed from the assembled staging tree.
    #[must_use]
    pub fn with_archive_clean(mut self, patterns: Vec<String>) -> Self {
        self.archive_clean = patterns;
        self
    }

    /// Sets the hook run between the two base-directory cleanup passes.
    #[must_use]
    pub fn with_build_hook<H: Hook + 'static>(mut self, hook: H) -> Self {
        self.build_hook = Some(Box::new(hook));
        self
    }

    /// Sets the hook run after the post-build cleanup pass.
    #[must_use]
    pub fn with_cleanup_hook<H: Hook + 'static>(mut self, hook: H) -> Self {
        self.cleanup_hook = Some(Box::new(hook));
        self
    }

    /// Returns the build hook, if any.
    #[must_use]
    pub fn build_hook(&self) -> Option<&dyn Hook> {
        self.build_hook.as_deref()
    }

    /// Returns the cleanup hook, if any.
    #[must_use]
    pub fn cleanup_hook(&self) -> Option<&dyn Hook> {
        self.cleanup_hook.as_deref()
    }

    /// Returns the output directory resolved against the working directory.
    #[must_use]
    pub fn outdir_path(&self) -> PathBuf {
        if self.outdir.is_absolute() {
            self.outdir.clone()
        } else {
            self.work_dir.join(&self.outdir)
        }
    }

    /// Returns the staging tree path.
    #[must_use]
    pub fn staging_path(&self) -> PathBuf {
        self.work_dir.join(&self.ptname)
    }

    /// Returns the entry file name, e.g. `my-plugin.php`.
    #[must_use]
    pub fn entry_file_name(&self) -> String {
        format!("{}.{}", self.ptname, self.entry_extension)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `ptname` is empty, `.` or `..`
    /// - `ptname` contains a path separator
    pub fn validate(&self) -> Result<()> {
        validate_name(&self.ptname)
    }

    /// Returns the base directory as a `&Path`.
    #[must_use]
    pub fn base_path(&self) -> &Path {
        self.base_dir.as_path()
    }
}

fn validate_name(name: &str) -> Result<()> {
    let reason = if name.is_empty() {
        "name is empty"
    } else if name == "." || name == ".." {
        "name is a relative directory reference"
    } else if name.contains(['/', '\\']) {
        "name contains a path separator"
    } else {
        return Ok(());
    };

    Err(BundleError::InvalidName {
        name: name.to_owned(),
        reason,
    })
}

impl fmt::Debug for BundleSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BundleSpec")
            .field("ptname", &self.ptname)
            .field("base_dir", &self.base_dir)
            .field("work_dir", &self.work_dir)
            .field("outdir", &self.outdir)
            .field("entry_extension", &self.entry_extension)
            .field("clean_before_build", &self.clean_before_build)
            .field("clean_after_build", &self.clean_after_build)
            .field("archive_clean", &self.archive_clean)
            .field("build_hook", &self.build_hook.is_some())
            .field("cleanup_hook", &self.cleanup_hook.is_some())
            .finish()
    }
}
