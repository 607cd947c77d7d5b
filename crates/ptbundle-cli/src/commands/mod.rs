//! Subcommand implementations.

pub mod bundle;
pub mod completion;
pub mod glob;
pub mod version;
