//! Packages plugin and theme directories into versioned ZIP bundles.
//!
//! `ptbundle-core` resolves a version string from source control, runs
//! optional build and cleanup hooks, assembles a filtered copy of a project
//! into a staging directory, injects the version into the entry file and
//! writes two ZIP archives (versioned and unversioned) plus two marker files
//! naming them.
//!
//! # Examples
//!
//! ```no_run
//! use ptbundle_core::BundleSpec;
//! use ptbundle_core::Bundler;
//! use ptbundle_core::staging::DenyList;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let spec = BundleSpec::new("my-plugin")?
//!     .with_base_dir("./my-plugin-src")?
//!     .with_archive_clean(vec!["node_modules".into(), "**/*.map".into()]);
//! let strategy = DenyList::new().with_exclude(vec!["tests".into(), ".git".into()]);
//!
//! let report = Bundler::new(spec, strategy).run()?;
//! println!("Bundled version {}", report.version);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod archive;
pub mod config;
pub mod copy;
pub mod error;
pub mod fs_ops;
pub mod glob;
pub mod hooks;
pub mod pipeline;
pub mod report;
pub mod staging;
#[doc(hidden)]
pub mod test_utils;
pub mod types;
pub mod version;

// Re-export main API types
pub use archive::ArchiveReport;
pub use archive::archive_directory;
pub use config::BundleSpec;
pub use error::BundleError;
pub use error::Result;
pub use glob::globstar;
pub use hooks::CommandHook;
pub use hooks::Hook;
pub use hooks::HookKind;
pub use hooks::HookResult;
pub use pipeline::Bundler;
pub use report::BundleReport;
pub use staging::StagingStrategy;
pub use types::BaseDir;
pub use version::FixedVersion;
pub use version::GitDescribe;
pub use version::VersionSource;
