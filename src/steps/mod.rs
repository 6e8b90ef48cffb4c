//! Packaging steps abstraction layer
//!
//! The release run treats copying, archiving and moving files as
//! collaborators behind the [PackageSteps] trait:
//!
//! - [system::SystemSteps]: real filesystem operations plus a `tar` child process
//! - [mock::MockSteps]: records calls and can fail a chosen step, for tests

pub mod exclude;
pub mod mock;
pub mod system;

pub use exclude::ExclusionList;
pub use mock::{MockSteps, StepCall};
pub use system::SystemSteps;

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Named packaging steps, in run order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepKind {
    Stage,
    Archive,
    Publish,
    Cleanup,
}

impl StepKind {
    pub fn name(&self) -> &'static str {
        match self {
            StepKind::Stage => "stage",
            StepKind::Archive => "archive",
            StepKind::Publish => "publish",
            StepKind::Cleanup => "cleanup",
        }
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Operations that turn a source tree into a release archive.
///
/// Each operation either completes or returns a
/// [ReleaseError::Step](crate::error::ReleaseError::Step) naming itself.
pub trait PackageSteps: Send + Sync {
    /// Copy `source` into `staging`, skipping excluded paths.
    ///
    /// Returns the number of files copied.
    fn stage(&self, source: &Path, staging: &Path, exclusions: &ExclusionList) -> Result<usize>;

    /// Create `archive` from the directory `base_name` inside `work_dir`
    fn archive(&self, work_dir: &Path, base_name: &str, archive: &Path) -> Result<()>;

    /// Copy `archive` into `release_dir`, returning the destination path
    fn publish(&self, archive: &Path, release_dir: &Path) -> Result<PathBuf>;

    /// Delete a file or directory tree. A missing path is not an error.
    fn remove(&self, path: &Path) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_names() {
        assert_eq!(StepKind::Stage.to_string(), "stage");
        assert_eq!(StepKind::Archive.to_string(), "archive");
        assert_eq!(StepKind::Publish.to_string(), "publish");
        assert_eq!(StepKind::Cleanup.to_string(), "cleanup");
    }
}
