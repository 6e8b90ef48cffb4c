use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::{ReleaseError, Result};
use crate::steps::{ExclusionList, PackageSteps, StepKind};

/// A recorded call to [MockSteps]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepCall {
    Stage { source: PathBuf, staging: PathBuf },
    Archive { work_dir: PathBuf, base_name: String, archive: PathBuf },
    Publish { archive: PathBuf, release_dir: PathBuf },
    Remove { path: PathBuf },
}

impl StepCall {
    pub fn kind(&self) -> StepKind {
        match self {
            StepCall::Stage { .. } => StepKind::Stage,
            StepCall::Archive { .. } => StepKind::Archive,
            StepCall::Publish { .. } => StepKind::Publish,
            StepCall::Remove { .. } => StepKind::Cleanup,
        }
    }
}

/// Mock packaging steps for testing without touching the filesystem
pub struct MockSteps {
    calls: Mutex<Vec<StepCall>>,
    fail_at: Option<StepKind>,
    staged_files: usize,
}

impl MockSteps {
    /// Create a mock where every step succeeds
    pub fn new() -> Self {
        MockSteps {
            calls: Mutex::new(Vec::new()),
            fail_at: None,
            staged_files: 0,
        }
    }

    /// Make every call of `step` fail
    pub fn failing_at(mut self, step: StepKind) -> Self {
        self.fail_at = Some(step);
        self
    }

    /// Number of files the stage step reports
    pub fn with_staged_files(mut self, count: usize) -> Self {
        self.staged_files = count;
        self
    }

    /// Calls made so far, in order
    pub fn calls(&self) -> Vec<StepCall> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    fn record(&self, call: StepCall) -> Result<()> {
        let kind = call.kind();
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
        if self.fail_at == Some(kind) {
            return Err(ReleaseError::step(kind, "injected failure"));
        }
        Ok(())
    }
}

impl Default for MockSteps {
    fn default() -> Self {
        Self::new()
    }
}

impl PackageSteps for MockSteps {
    fn stage(&self, source: &Path, staging: &Path, _exclusions: &ExclusionList) -> Result<usize> {
        self.record(StepCall::Stage {
            source: source.to_path_buf(),
            staging: staging.to_path_buf(),
        })?;
        Ok(self.staged_files)
    }

    fn archive(&self, work_dir: &Path, base_name: &str, archive: &Path) -> Result<()> {
        self.record(StepCall::Archive {
            work_dir: work_dir.to_path_buf(),
            base_name: base_name.to_string(),
            archive: archive.to_path_buf(),
        })
    }

    fn publish(&self, archive: &Path, release_dir: &Path) -> Result<PathBuf> {
        self.record(StepCall::Publish {
            archive: archive.to_path_buf(),
            release_dir: release_dir.to_path_buf(),
        })?;
        let file_name = archive.file_name().unwrap_or(archive.as_os_str());
        Ok(release_dir.join(file_name))
    }

    fn remove(&self, path: &Path) -> Result<()> {
        self.record(StepCall::Remove {
            path: path.to_path_buf(),
        })
    }
}
