use std::path::{Path, PathBuf};

/// Naming and paths needed to produce one archive for one version.
///
/// Derived from the parsed version at the start of a run and never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseDescriptor {
    /// `<package>-v<version>`
    pub base_name: String,
    /// `<base_name>.tar`
    pub archive_name: String,
    pub source_dir: PathBuf,
    pub work_dir: PathBuf,
    pub release_dir: PathBuf,
}

impl ReleaseDescriptor {
    pub fn new(
        package_name: &str,
        version: u64,
        source_dir: impl Into<PathBuf>,
        work_dir: impl Into<PathBuf>,
        release_dir: impl Into<PathBuf>,
    ) -> Self {
        let base_name = format!("{}-v{}", package_name, version);
        let archive_name = format!("{}.tar", base_name);
        ReleaseDescriptor {
            base_name,
            archive_name,
            source_dir: source_dir.into(),
            work_dir: work_dir.into(),
            release_dir: release_dir.into(),
        }
    }

    /// Directory the source tree is copied into before archiving
    pub fn staging_dir(&self) -> PathBuf {
        self.work_dir.join(&self.base_name)
    }

    /// Archive produced inside the work directory
    pub fn staged_archive(&self) -> PathBuf {
        self.work_dir.join(&self.archive_name)
    }

    /// Final location of the archive
    pub fn release_archive(&self) -> PathBuf {
        self.release_dir.join(&self.archive_name)
    }

    pub fn source(&self) -> &Path {
        &self.source_dir
    }
}

/// Turn a display name into the name used for release files ("My AI" -> "My-AI")
pub fn package_name(ai_name: &str) -> String {
    ai_name.trim().replace(' ', "-")
}
