//! Domain types - pure rules independent of the filesystem

pub mod descriptor;
pub mod line;
pub mod record;

pub use descriptor::{package_name, ReleaseDescriptor};
pub use line::{DeclarationPatterns, LineKind};
pub use record::{PatchMode, VersionRecord};
