//! Validated path types shared by the staging and cleanup steps.

pub mod base_dir;

pub use base_dir::BaseDir;
pub use base_dir::join_relative;
pub use base_dir::strip_relative_prefix;
