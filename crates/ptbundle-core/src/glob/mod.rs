//! Glob pattern resolution.
//!
//! Patterns use shell wildcards (`*`, `?`, bracket classes) within a path
//! segment plus the `**` segment for zero or more directory levels.

pub mod globstar;
pub mod matcher;
pub mod single;

pub use globstar::RECURSIVE_MARKER;
pub use globstar::globstar;
pub use single::MatchKind;
pub use single::glob;
