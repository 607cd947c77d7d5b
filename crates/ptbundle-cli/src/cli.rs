//! CLI argument parsing using clap.

use clap::Parser;
use clap::Subcommand;
use clap_complete::Shell;
use ptbundle_core::config::DEFAULT_ENTRY_EXTENSION;
use ptbundle_core::config::DEFAULT_OUTDIR;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ptbundle")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Bundle a plugin or theme into versioned ZIP archives
    Bundle(BundleArgs),
    /// Print the version a bundle would be tagged with
    Version(VersionArgs),
    /// Expand a glob pattern, including `**` segments
    Glob(GlobArgs),
    /// Generate shell completions
    Completion(CompletionArgs),
}

#[derive(clap::Args)]
pub struct BundleArgs {
    /// Bundle name: staging directory, archive and entry file base name
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Project directory that paths and patterns are relative to
    /// (default: current directory)
    #[arg(short = 'C', long, value_name = "DIR")]
    pub base_dir: Option<PathBuf>,

    /// Directory the staging tree is created in (default: current directory)
    #[arg(long, value_name = "DIR")]
    pub work_dir: Option<PathBuf>,

    /// Output directory for archives and marker files
    #[arg(short, long, value_name = "DIR", default_value = DEFAULT_OUTDIR)]
    pub outdir: String,

    /// Folder to include (repeatable)
    #[arg(long = "folder", value_name = "PATH", conflicts_with = "inclusive")]
    pub folders: Vec<String>,

    /// File to include (repeatable)
    #[arg(long = "file", value_name = "PATH", conflicts_with = "inclusive")]
    pub files: Vec<String>,

    /// Bundle the whole project except paths matching --exclude
    #[arg(short, long)]
    pub inclusive: bool,

    /// Pattern to exclude with --inclusive (glob, can be repeated)
    #[arg(long = "exclude", short = 'x', value_name = "PATTERN", requires = "inclusive")]
    pub exclude: Vec<String>,

    /// Pattern deleted from the project before the build command (repeatable)
    #[arg(long = "clean-before", value_name = "PATTERN")]
    pub clean_before: Vec<String>,

    /// Pattern deleted from the project after the build command (repeatable)
    #[arg(long = "clean-after", value_name = "PATTERN")]
    pub clean_after: Vec<String>,

    /// Pattern deleted from the staged bundle before archiving (repeatable)
    #[arg(long = "clean-archive", value_name = "PATTERN")]
    pub clean_archive: Vec<String>,

    /// Shell command run in the project directory as the build step
    #[arg(long, value_name = "COMMAND")]
    pub build: Option<String>,

    /// Shell command run in the project directory after the build cleanup
    #[arg(long, value_name = "COMMAND")]
    pub cleanup: Option<String>,

    /// Extension of the entry file that receives the version
    #[arg(long, value_name = "EXT", default_value = DEFAULT_ENTRY_EXTENSION)]
    pub entry_extension: String,

    /// Use this version instead of asking `git describe`
    #[arg(long = "set-version", value_name = "VERSION")]
    pub set_version: Option<String>,
}

#[derive(clap::Args)]
pub struct VersionArgs {
    /// Repository directory (default: current directory)
    #[arg(short = 'C', long, value_name = "DIR")]
    pub base_dir: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct GlobArgs {
    /// Pattern to expand
    #[arg(value_name = "PATTERN")]
    pub pattern: String,

    /// Resolve the pattern relative to this directory
    #[arg(short = 'C', long, value_name = "DIR")]
    pub base_dir: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct CompletionArgs {
    /// Target shell
    #[arg(value_enum, value_name = "SHELL")]
    pub shell: Shell,
}
