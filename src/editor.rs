//! Version file read/patch/rewrite.
//!
//! A patch pass reads the whole file, classifies every line, rewrites at most
//! the tagged declarations selected by the [`PatchMode`], and replaces the file
//! in one atomic write. Nothing is written when the version declaration is
//! missing.

use std::fs;
use std::io::Write;
use std::path::Path;

use chrono::NaiveDate;
use tempfile::NamedTempFile;

use crate::config::VersionFileConfig;
use crate::domain::{DeclarationPatterns, LineKind, PatchMode, VersionRecord};
use crate::error::{ReleaseError, Result};

/// New file content together with what the pass found
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patched {
    pub content: String,
    pub record: VersionRecord,
}

/// Reads and rewrites the tagged declarations of a version file
#[derive(Debug, Clone)]
pub struct VersionFileEditor {
    patterns: DeclarationPatterns,
    version_symbol: String,
    today: NaiveDate,
}

impl VersionFileEditor {
    /// Create an editor for the given symbols, dated with the local clock
    pub fn new(version_symbol: &str, date_symbol: &str) -> Result<Self> {
        Ok(VersionFileEditor {
            patterns: DeclarationPatterns::new(version_symbol, date_symbol)?,
            version_symbol: version_symbol.to_string(),
            today: chrono::Local::now().date_naive(),
        })
    }

    pub fn from_config(config: &VersionFileConfig) -> Result<Self> {
        Self::new(&config.version_symbol, &config.date_symbol)
    }

    /// Pin the date written by [`PatchMode::RefreshDate`]
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Compute the patched content of `content` without touching the filesystem.
    ///
    /// Trailing empty lines are collapsed and exactly one is appended, so the
    /// trailer never grows across repeated passes. The returned record may lack
    /// a version; callers that write decide what that means.
    pub fn patch(&self, content: &str, mode: PatchMode) -> Result<Patched> {
        let mut lines: Vec<&str> = content.split('\n').collect();
        while lines
            .last()
            .is_some_and(|line| line.trim_end_matches('\r').is_empty())
        {
            lines.pop();
        }

        let date = self.today.format("%Y-%m-%d").to_string();
        let mut record = VersionRecord::default();
        let mut out = String::with_capacity(content.len() + 2);

        for (index, line) in lines.iter().enumerate() {
            let line_number = index + 1;
            let kind = self.patterns.classify(line).map_err(|e| match e {
                ReleaseError::Version(msg) => {
                    ReleaseError::version(format!("line {}: {}", line_number, msg))
                }
                other => other,
            })?;
            match (kind, mode) {
                (LineKind::VersionDecl { value, span }, PatchMode::IncrementVersion) => {
                    record.record_version(value, line_number);
                    let next = value
                        .checked_add(1)
                        .ok_or(ReleaseError::VersionOverflow { value })?;
                    out.push_str(&line[..span.start]);
                    out.push_str(&next.to_string());
                    out.push_str(&line[span.end..]);
                }
                (LineKind::VersionDecl { value, .. }, PatchMode::RefreshDate) => {
                    record.record_version(value, line_number);
                    out.push_str(line);
                }
                (LineKind::DateDecl { span }, PatchMode::RefreshDate) => {
                    record.record_date(line_number);
                    out.push_str(&line[..span.start]);
                    out.push_str(&date);
                    out.push_str(&line[span.end..]);
                }
                (LineKind::DateDecl { .. }, PatchMode::IncrementVersion) => {
                    record.record_date(line_number);
                    out.push_str(line);
                }
                (LineKind::Other, _) => out.push_str(line),
            }
            out.push('\n');
        }
        out.push('\n');

        Ok(Patched {
            content: out,
            record,
        })
    }

    /// Read `path` and compute the patched content, failing when no version
    /// declaration exists. Nothing is written.
    pub fn preview(&self, path: &Path, mode: PatchMode) -> Result<Patched> {
        let content = fs::read_to_string(path)?;
        let patched = self.patch(&content, mode)?;
        if patched.record.version.is_none() {
            return Err(ReleaseError::VersionNotFound {
                path: path.to_path_buf(),
                symbol: self.version_symbol.clone(),
            });
        }
        Ok(patched)
    }

    /// Patch the version file at `path` in place and report what was found.
    ///
    /// # Errors
    /// * `VersionNotFound` - no version declaration; the file is left unchanged
    /// * `VersionOverflow` - the version cannot be incremented
    /// * `Io` - the file cannot be read or replaced
    pub fn load_and_patch(&self, path: &Path, mode: PatchMode) -> Result<VersionRecord> {
        let patched = self.preview(path, mode)?;

        if patched.record.duplicate_versions > 0 {
            tracing::debug!(
                path = %path.display(),
                duplicates = patched.record.duplicate_versions,
                "multiple version declarations, using the last one"
            );
        }
        if patched.record.date_line.is_none() {
            tracing::debug!(path = %path.display(), "no date declaration found");
        }

        write_atomic(path, &patched.content)?;
        tracing::debug!(
            path = %path.display(),
            %mode,
            version = ?patched.record.version,
            version_line = ?patched.record.version_line,
            date_line = ?patched.record.date_line,
            "version file patched"
        );

        Ok(patched.record)
    }
}

/// Replace `path` with `content` through a temporary file in the same directory
fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.as_file().sync_all()?;

    if let Ok(metadata) = fs::metadata(path) {
        fs::set_permissions(tmp.path(), metadata.permissions())?;
    }

    tmp.persist(path).map_err(|e| ReleaseError::Io(e.error))?;
    Ok(())
}
