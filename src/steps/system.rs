use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{ReleaseError, Result};
use crate::steps::{ExclusionList, PackageSteps, StepKind};

/// Packaging steps backed by the local filesystem and a `tar` executable
#[derive(Debug, Clone)]
pub struct SystemSteps {
    tar_command: String,
}

impl SystemSteps {
    pub fn new(tar_command: impl Into<String>) -> Self {
        SystemSteps {
            tar_command: tar_command.into(),
        }
    }

    fn copy_tree(
        &self,
        root: &Path,
        dir: &Path,
        staging: &Path,
        exclusions: &ExclusionList,
    ) -> io::Result<usize> {
        let mut entries = fs::read_dir(dir)?.collect::<io::Result<Vec<_>>>()?;
        entries.sort_by_key(|entry| entry.file_name());

        let mut copied = 0;
        for entry in entries {
            let path = entry.path();
            let relative = path.strip_prefix(root).unwrap_or(&path);
            let file_type = entry.file_type()?;
            let is_dir = if file_type.is_symlink() {
                // Directory links may point back up the tree; only linked files are copied
                match fs::metadata(&path) {
                    Ok(target) if target.is_dir() => {
                        tracing::debug!(path = %relative.display(), "skipping directory symlink");
                        continue;
                    }
                    Ok(_) => false,
                    Err(e) => {
                        tracing::debug!(path = %relative.display(), error = %e, "skipping broken symlink");
                        continue;
                    }
                }
            } else {
                file_type.is_dir()
            };

            if exclusions.is_excluded(relative, is_dir) {
                tracing::debug!(path = %relative.display(), "excluded");
                continue;
            }

            if is_dir {
                if exclusions.is_skipped_dir(&path) {
                    tracing::debug!(path = %relative.display(), "skipping work directory");
                    continue;
                }
                copied += self.copy_tree(root, &path, staging, exclusions)?;
            } else {
                let target = staging.join(relative);
                if let Some(parent) = target.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::copy(&path, &target)?;
                copied += 1;
            }
        }
        Ok(copied)
    }
}

impl Default for SystemSteps {
    fn default() -> Self {
        Self::new("tar")
    }
}

impl PackageSteps for SystemSteps {
    fn stage(&self, source: &Path, staging: &Path, exclusions: &ExclusionList) -> Result<usize> {
        let fail = |e: io::Error| ReleaseError::step(StepKind::Stage, e.to_string());

        if !source.is_dir() {
            return Err(ReleaseError::step(
                StepKind::Stage,
                format!("source directory not found: {}", source.display()),
            ));
        }
        if staging.exists() {
            fs::remove_dir_all(staging).map_err(fail)?;
        }
        fs::create_dir_all(staging).map_err(fail)?;

        // The staging tree must not be copied into itself
        let exclusions = exclusions.clone().with_skip_dir(staging);
        self.copy_tree(source, source, staging, &exclusions)
            .map_err(fail)
    }

    fn archive(&self, work_dir: &Path, base_name: &str, archive: &Path) -> Result<()> {
        let tar = which::which(&self.tar_command).map_err(|e| {
            ReleaseError::step(
                StepKind::Archive,
                format!("'{}' not found: {}", self.tar_command, e),
            )
        })?;
        let archive = std::path::absolute(archive)
            .map_err(|e| ReleaseError::step(StepKind::Archive, e.to_string()))?;

        let output = Command::new(&tar)
            .arg("-cf")
            .arg(&archive)
            .arg("-C")
            .arg(work_dir)
            .arg(base_name)
            .output()
            .map_err(|e| {
                ReleaseError::step(
                    StepKind::Archive,
                    format!("failed to run {}: {}", tar.display(), e),
                )
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ReleaseError::step(
                StepKind::Archive,
                format!(
                    "{} exited with code {}: {}",
                    self.tar_command,
                    output.status.code().unwrap_or(-1),
                    stderr.trim()
                ),
            ));
        }
        Ok(())
    }

    fn publish(&self, archive: &Path, release_dir: &Path) -> Result<PathBuf> {
        let fail = |e: io::Error| ReleaseError::step(StepKind::Publish, e.to_string());

        let file_name = archive.file_name().ok_or_else(|| {
            ReleaseError::step(
                StepKind::Publish,
                format!("not a file path: {}", archive.display()),
            )
        })?;
        fs::create_dir_all(release_dir).map_err(fail)?;
        let destination = release_dir.join(file_name);
        fs::copy(archive, &destination).map_err(fail)?;
        Ok(destination)
    }

    fn remove(&self, path: &Path) -> Result<()> {
        let result = match fs::symlink_metadata(path) {
            Ok(meta) if meta.is_dir() => fs::remove_dir_all(path),
            Ok(_) => fs::remove_file(path),
            Err(e) => Err(e),
        };
        match result {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "nothing to remove");
                Ok(())
            }
            Err(e) => Err(ReleaseError::step(StepKind::Cleanup, e.to_string())),
        }
    }
}
