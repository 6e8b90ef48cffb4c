use std::fmt;

use crate::error::{ReleaseError, Result};

/// Which tagged field a patch pass rewrites
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchMode {
    /// Rewrite the date declaration to today, keep the version
    RefreshDate,
    /// Rewrite the version declaration to `version + 1`, keep the date
    IncrementVersion,
}

impl fmt::Display for PatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatchMode::RefreshDate => write!(f, "refresh-date"),
            PatchMode::IncrementVersion => write!(f, "increment-version"),
        }
    }
}

/// Result of one parse pass over a version file.
///
/// Line numbers are 1-based. When several lines declare the version, the
/// last one wins and `duplicate_versions` counts the extra matches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionRecord {
    pub version: Option<u64>,
    pub version_line: Option<usize>,
    pub date_line: Option<usize>,
    pub duplicate_versions: usize,
}

impl VersionRecord {
    /// Record a version declaration found on `line`
    pub fn record_version(&mut self, value: u64, line: usize) {
        if self.version.is_some() {
            self.duplicate_versions += 1;
        }
        self.version = Some(value);
        self.version_line = Some(line);
    }

    /// Record a date declaration found on `line`
    pub fn record_date(&mut self, line: usize) {
        self.date_line = Some(line);
    }

    /// The parsed version, or a version error when none was recorded
    pub fn require_version(&self) -> Result<u64> {
        self.version
            .ok_or_else(|| ReleaseError::version("no version recorded"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_version_wins() {
        let mut record = VersionRecord::default();
        record.record_version(3, 2);
        record.record_version(9, 5);
        assert_eq!(record.version, Some(9));
        assert_eq!(record.version_line, Some(5));
        assert_eq!(record.duplicate_versions, 1);
    }

    #[test]
    fn test_require_version() {
        let mut record = VersionRecord::default();
        assert!(record.require_version().is_err());
        record.record_version(1, 1);
        assert_eq!(record.require_version().unwrap(), 1);
    }

    #[test]
    fn test_patch_mode_display() {
        assert_eq!(PatchMode::RefreshDate.to_string(), "refresh-date");
        assert_eq!(PatchMode::IncrementVersion.to_string(), "increment-version");
    }
}
