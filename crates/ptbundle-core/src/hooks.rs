//! Build and cleanup hooks invoked by the bundle pipeline.
//!
//! A hook is any zero-argument callable. Closures work directly through the
//! blanket implementation; [`CommandHook`] runs a shell command.

use crate::BundleError;
use crate::Result;
use std::fmt;
use std::path::PathBuf;
use std::process::Command;

/// Outcome of a hook invocation.
pub type HookResult = std::result::Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// The two fixed points where the pipeline calls out to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookKind {
    /// Runs after the pre-build cleanup pass.
    Build,
    /// Runs after the post-build cleanup pass, before staging.
    Cleanup,
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Build => f.write_str("build"),
            Self::Cleanup => f.write_str("cleanup"),
        }
    }
}

/// A caller-supplied action run synchronously by the pipeline.
///
/// # Examples
///
/// ```
/// use ptbundle_core::Hook;
/// use ptbundle_core::HookResult;
///
/// let hook = || -> HookResult { Ok(()) };
/// assert!(hook.run().is_ok());
/// ```
pub trait Hook {
    /// Runs the hook. An error aborts the pipeline.
    fn run(&self) -> HookResult;
}

impl<F> Hook for F
where
    F: Fn() -> HookResult,
{
    fn run(&self) -> HookResult {
        self()
    }
}

/// Runs a shell command through `sh -c`.
///
/// The command inherits stdout and stderr, so build tool output shows up
/// alongside the bundler's own. A non-zero exit status is a hook failure.
///
/// # Examples
///
/// ```no_run
/// use ptbundle_core::CommandHook;
/// use ptbundle_core::Hook;
///
/// let hook = CommandHook::new("npm run build").current_dir("./my-plugin");
/// hook.run().ok();
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandHook {
    command: String,
    dir: Option<PathBuf>,
}

impl CommandHook {
    /// Creates a hook for `command`.
    #[must_use]
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            dir: None,
        }
    }

    /// Sets the directory the command runs in.
    #[must_use]
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = Some(dir.into());
        self
    }

    /// Returns the command line.
    #[must_use]
    pub fn command(&self) -> &str {
        &self.command
    }
}

impl Hook for CommandHook {
    fn run(&self) -> HookResult {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(&self.command);
        if let Some(dir) = &self.dir {
            cmd.current_dir(dir);
        }

        let status = cmd.status()?;
        if status.success() {
            Ok(())
        } else {
            Err(format!("`{}` exited with {status}", self.command).into())
        }
    }
}

/// Runs `hook` if one is configured, converting its failure into a
/// [`BundleError::Hook`].
pub(crate) fn invoke(kind: HookKind, hook: Option<&dyn Hook>) -> Result<()> {
    let Some(hook) = hook else {
        return Ok(());
    };

    log::debug!("running {kind} hook");
    hook.run().map_err(|e| BundleError::Hook {
        hook: kind,
        reason: e.to_string(),
    })
}
