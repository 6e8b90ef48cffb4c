//! Release run orchestration
//!
//! Drives one release: refresh the date in the version file, package the
//! source tree under the name derived from the version, then increment the
//! version. The packaging steps sit behind [PackageSteps] so the sequence can
//! be exercised without a `tar` binary.

use std::path::PathBuf;

use crate::config::Config;
use crate::domain::{PatchMode, ReleaseDescriptor, VersionRecord};
use crate::editor::VersionFileEditor;
use crate::error::{ReleaseError, Result};
use crate::steps::{ExclusionList, PackageSteps};
use crate::ui;
use crate::warning::RunWarning;

/// Command-line overrides for a release run
///
/// Mirrors the CLI flags but decoupled from clap so the run can be driven
/// programmatically.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReleaseArgs {
    pub ai_name: Option<String>,
    pub source_dir: Option<PathBuf>,
    pub work_dir: Option<PathBuf>,
    pub release_dir: Option<PathBuf>,
    pub version_file: Option<PathBuf>,
}

impl ReleaseArgs {
    /// Overwrite the config values for every flag that was given
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(name) = &self.ai_name {
            config.package.ai_name = name.clone();
        }
        if let Some(dir) = &self.source_dir {
            config.paths.source_dir = dir.clone();
        }
        if let Some(dir) = &self.work_dir {
            config.paths.work_dir = dir.clone();
        }
        if let Some(dir) = &self.release_dir {
            config.paths.release_dir = dir.clone();
        }
        if let Some(path) = &self.version_file {
            config.paths.version_file = path.clone();
        }
    }
}

/// What a run would do, computed without writing anything
#[derive(Debug, Clone, PartialEq)]
pub struct ReleasePlan {
    pub descriptor: ReleaseDescriptor,
    pub version: u64,
    pub next_version: u64,
    /// Version file content after the date refresh
    pub refreshed: String,
    /// Version file content after the increment
    pub incremented: String,
}

/// Result of a completed release run
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub descriptor: ReleaseDescriptor,
    /// Version the archive was built for
    pub released_version: u64,
    /// Version stored in the version file after the run
    pub next_version: u64,
    pub staged_files: usize,
    /// Final archive location, absent when publishing failed in best-effort mode
    pub published: Option<PathBuf>,
    pub warnings: Vec<RunWarning>,
}

/// Runs the refresh-date / package / increment-version sequence
pub struct ReleasePackager<S: PackageSteps> {
    config: Config,
    editor: VersionFileEditor,
    steps: S,
}

impl<S: PackageSteps> ReleasePackager<S> {
    pub fn new(config: Config, steps: S) -> Result<Self> {
        config.validate()?;
        let editor = VersionFileEditor::from_config(&config.version_file)?;
        Ok(ReleasePackager {
            config,
            editor,
            steps,
        })
    }

    /// Replace the version file editor (e.g. to pin today's date)
    pub fn with_editor(mut self, editor: VersionFileEditor) -> Self {
        self.editor = editor;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn steps(&self) -> &S {
        &self.steps
    }

    /// Names and paths for releasing `version`
    pub fn descriptor(&self, version: u64) -> ReleaseDescriptor {
        let paths = &self.config.paths;
        ReleaseDescriptor::new(
            &self.config.package.package_name(),
            version,
            &paths.source_dir,
            &paths.work_dir,
            &paths.release_dir,
        )
    }

    /// Compute both version-file passes and the descriptor without side effects
    pub fn plan(&self) -> Result<ReleasePlan> {
        let path = &self.config.paths.version_file;
        let refreshed = self.editor.preview(path, PatchMode::RefreshDate)?;
        let version = refreshed.record.require_version()?;
        let incremented = self
            .editor
            .patch(&refreshed.content, PatchMode::IncrementVersion)?;

        Ok(ReleasePlan {
            descriptor: self.descriptor(version),
            version,
            next_version: next_version(version)?,
            refreshed: refreshed.content,
            incremented: incremented.content,
        })
    }

    /// Execute a full release run.
    ///
    /// # Errors
    /// * `VersionNotFound` - the version file has no version; nothing is packaged
    /// * `Step` - a packaging step failed (unless `behavior.best_effort`); the
    ///   version is not incremented, the refreshed date stays
    pub fn run(&self) -> Result<RunReport> {
        let version_path = &self.config.paths.version_file;
        let mut warnings = Vec::new();

        // RefreshDate
        let record = self
            .editor
            .load_and_patch(version_path, PatchMode::RefreshDate)?;
        for warning in record_warnings(version_path, &record) {
            report_warning(warning, &mut warnings);
        }
        let version = record.require_version()?;
        ui::display_success(&format!(
            "Release date set to {} (version {})",
            self.editor.today().format("%Y-%m-%d"),
            version
        ));

        // ComputeDescriptor
        let descriptor = self.descriptor(version);
        tracing::info!(
            base_name = %descriptor.base_name,
            staging = %descriptor.staging_dir().display(),
            release = %descriptor.release_archive().display(),
            "release descriptor"
        );

        // StageAndArchive
        let (staged_files, published) = self.package(&descriptor, &mut warnings)?;

        // IncrementVersion, on a fresh read so the refreshed date is kept
        let record = self
            .editor
            .load_and_patch(version_path, PatchMode::IncrementVersion)?;
        let released = record.require_version()?;
        let next = next_version(released)?;
        ui::display_success(&format!("Version bumped to {}", next));

        Ok(RunReport {
            descriptor,
            released_version: version,
            next_version: next,
            staged_files,
            published,
            warnings,
        })
    }

    /// Only increment the stored version, leaving the date untouched
    pub fn bump_only(&self) -> Result<VersionRecord> {
        let path = &self.config.paths.version_file;
        let record = self
            .editor
            .load_and_patch(path, PatchMode::IncrementVersion)?;
        for warning in record_warnings(path, &record) {
            ui::display_warning(&warning);
        }
        Ok(record)
    }

    fn package(
        &self,
        descriptor: &ReleaseDescriptor,
        warnings: &mut Vec<RunWarning>,
    ) -> Result<(usize, Option<PathBuf>)> {
        let paths = &self.config.paths;
        let exclusions = ExclusionList::load(&paths.exclude_file)?
            .with_skip_dir(&paths.work_dir)
            .with_skip_dir(&paths.release_dir);
        tracing::debug!(patterns = exclusions.len(), "exclusion list loaded");

        let staging = descriptor.staging_dir();
        let staged_archive = descriptor.staged_archive();

        ui::display_status(&format!(
            "Staging {} into {}",
            descriptor.source().display(),
            staging.display()
        ));
        let staged = self.check(
            self.steps.stage(descriptor.source(), &staging, &exclusions),
            warnings,
        )?;
        if staged == Some(0) {
            report_warning(
                RunWarning::NothingStaged {
                    source: descriptor.source().to_path_buf(),
                },
                warnings,
            );
        }

        ui::display_status(&format!("Creating {}", descriptor.archive_name));
        self.check(
            self.steps
                .archive(&descriptor.work_dir, &descriptor.base_name, &staged_archive),
            warnings,
        )?;

        let published = self.check(
            self.steps.publish(&staged_archive, &descriptor.release_dir),
            warnings,
        )?;
        if let Some(path) = &published {
            ui::display_success(&format!("Published {}", path.display()));
        }

        self.check(self.steps.remove(&staged_archive), warnings)?;
        if !self.config.behavior.keep_staging {
            self.check(self.steps.remove(&staging), warnings)?;
        }

        Ok((staged.unwrap_or(0), published))
    }

    /// Pass a step result through, or in best-effort mode turn its failure
    /// into a warning
    fn check<T>(&self, result: Result<T>, warnings: &mut Vec<RunWarning>) -> Result<Option<T>> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(ReleaseError::Step { step, message }) if self.config.behavior.best_effort => {
                tracing::warn!(%step, %message, "step failed in best-effort mode");
                report_warning(RunWarning::StepFailed { step, message }, warnings);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

fn next_version(version: u64) -> Result<u64> {
    version
        .checked_add(1)
        .ok_or(ReleaseError::VersionOverflow { value: version })
}

fn report_warning(warning: RunWarning, warnings: &mut Vec<RunWarning>) {
    ui::display_warning(&warning);
    warnings.push(warning);
}

fn record_warnings(path: &std::path::Path, record: &VersionRecord) -> Vec<RunWarning> {
    let mut warnings = Vec::new();
    if record.duplicate_versions > 0 {
        warnings.push(RunWarning::DuplicateVersionLines {
            path: path.to_path_buf(),
            extra: record.duplicate_versions,
        });
    }
    if record.date_line.is_none() {
        warnings.push(RunWarning::MissingDateLine {
            path: path.to_path_buf(),
        });
    }
    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::steps::MockSteps;

    #[test]
    fn test_release_args_override_config() {
        let mut config = Config::default();
        let args = ReleaseArgs {
            ai_name: Some("Worm AI".to_string()),
            release_dir: Some(PathBuf::from("dist")),
            ..Default::default()
        };
        args.apply_to(&mut config);
        assert_eq!(config.package.ai_name, "Worm AI");
        assert_eq!(config.paths.release_dir, PathBuf::from("dist"));
        assert_eq!(config.paths.source_dir, PathBuf::from("."));
    }

    #[test]
    fn test_empty_args_leave_config_alone() {
        let mut config = Config::default();
        ReleaseArgs::default().apply_to(&mut config);
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_new_keeps_config() {
        let mut config = Config::default();
        config.package.ai_name = "Worm AI".to_string();
        let packager = ReleasePackager::new(config.clone(), MockSteps::new()).unwrap();
        assert_eq!(packager.config(), &config);
        assert_eq!(packager.descriptor(3).base_name, "Worm-AI-v3");
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let mut config = Config::default();
        config.version_file.date_symbol = config.version_file.version_symbol.clone();
        assert!(ReleasePackager::new(config, MockSteps::new()).is_err());
    }

    #[test]
    fn test_next_version_overflow() {
        assert_eq!(next_version(41).unwrap(), 42);
        assert!(next_version(u64::MAX).is_err());
    }

    #[test]
    fn test_record_warnings() {
        let mut record = VersionRecord::default();
        record.record_version(1, 1);
        record.record_version(2, 2);
        let warnings = record_warnings(std::path::Path::new("v.nut"), &record);
        assert_eq!(warnings.len(), 2);
        assert!(matches!(warnings[0], RunWarning::DuplicateVersionLines { extra: 1, .. }));
        assert!(matches!(warnings[1], RunWarning::MissingDateLine { .. }));
    }
}
