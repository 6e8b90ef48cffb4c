use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use glob::Pattern;

use crate::error::{ReleaseError, Result};

#[derive(Debug, Clone)]
enum ExcludePattern {
    Glob(Pattern),
    Substring(String),
}

/// Paths left out when staging the source tree.
///
/// One pattern per line; blank lines and `#` comments are ignored. Patterns
/// with glob metacharacters are matched against the relative path and the file
/// name. Plain patterns exclude every path containing them, with directories
/// seen as `/dir/` so `\lang\` or `/lang/` names a whole directory.
#[derive(Debug, Clone, Default)]
pub struct ExclusionList {
    patterns: Vec<ExcludePattern>,
    skip_dirs: Vec<PathBuf>,
}

impl ExclusionList {
    /// Parse the contents of an exclusion file
    pub fn parse(text: &str) -> Result<Self> {
        let mut patterns = Vec::new();
        for raw in text.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let normalized = line.replace('\\', "/");
            if normalized.contains(['*', '?', '[']) {
                let pattern = Pattern::new(normalized.trim_matches('/')).map_err(|e| {
                    ReleaseError::config(format!("invalid exclude pattern '{}': {}", line, e))
                })?;
                patterns.push(ExcludePattern::Glob(pattern));
            } else {
                patterns.push(ExcludePattern::Substring(normalized));
            }
        }
        Ok(ExclusionList {
            patterns,
            skip_dirs: Vec::new(),
        })
    }

    /// Load an exclusion file. A missing file means nothing is excluded.
    pub fn load(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(text) => Self::parse(&text),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no exclusion file");
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Never descend into `dir`, wherever it appears in the source tree
    pub fn with_skip_dir(mut self, dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        let resolved = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
        self.skip_dirs.push(resolved);
        self
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Whether `path` (an absolute or source-relative directory) is one of the skip dirs
    pub fn is_skipped_dir(&self, path: &Path) -> bool {
        if self.skip_dirs.is_empty() {
            return false;
        }
        let resolved = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        self.skip_dirs.iter().any(|dir| *dir == resolved)
    }

    /// Whether `relative` (relative to the source root) is excluded
    pub fn is_excluded(&self, relative: &Path, is_dir: bool) -> bool {
        let joined = relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/");
        if joined.is_empty() {
            return false;
        }
        let file_name = relative
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let framed = if is_dir {
            format!("/{}/", joined)
        } else {
            format!("/{}", joined)
        };

        self.patterns.iter().any(|pattern| match pattern {
            ExcludePattern::Glob(glob) => glob.matches(&joined) || glob.matches(&file_name),
            ExcludePattern::Substring(text) => framed.contains(text.as_str()),
        })
    }
}
