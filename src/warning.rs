use std::fmt;
use std::path::PathBuf;

use crate::steps::StepKind;

/// Non-fatal issues found during a release run.
/// These are reported to the user but do not stop the run.
#[derive(Debug, Clone, PartialEq)]
pub enum RunWarning {
    /// More than one line declares the version; the last one was used
    DuplicateVersionLines { path: PathBuf, extra: usize },
    /// The version file has no date declaration to refresh
    MissingDateLine { path: PathBuf },
    /// The stage step copied nothing
    NothingStaged { source: PathBuf },
    /// A packaging step failed and the run continued in best-effort mode
    StepFailed { step: StepKind, message: String },
}

impl fmt::Display for RunWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunWarning::DuplicateVersionLines { path, extra } => write!(
                f,
                "{} has {} extra version declaration(s), using the last one",
                path.display(),
                extra
            ),
            RunWarning::MissingDateLine { path } => {
                write!(f, "No date declaration in {}", path.display())
            }
            RunWarning::NothingStaged { source } => {
                write!(f, "No files copied from '{}'", source.display())
            }
            RunWarning::StepFailed { step, message } => {
                write!(f, "{} step failed, continuing: {}", step, message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_version_display() {
        let warning = RunWarning::DuplicateVersionLines {
            path: PathBuf::from("version.nut"),
            extra: 2,
        };
        let msg = warning.to_string();
        assert!(msg.contains("version.nut"));
        assert!(msg.contains("2 extra"));
    }

    #[test]
    fn test_step_failed_display() {
        let warning = RunWarning::StepFailed {
            step: StepKind::Archive,
            message: "tar exited with code 2".to_string(),
        };
        assert_eq!(
            warning.to_string(),
            "archive step failed, continuing: tar exited with code 2"
        );
    }
}
