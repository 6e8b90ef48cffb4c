use std::ops::Range;

use regex::Regex;

use crate::error::{ReleaseError, Result};

/// Classification of a single version-file line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    /// `SYMBOL <- 42` with the parsed value and the byte span of the literal
    VersionDecl { value: u64, span: Range<usize> },
    /// `SYMBOL <- "YYYY-MM-DD"` with the byte span of the date inside the quotes
    DateDecl { span: Range<usize> },
    /// Anything else, passed through untouched
    Other,
}

/// Compiled patterns for the two tagged declarations of a version file.
///
/// Symbols are matched literally at the start of a statement (line start or
/// after `;`), so `SELF_VERSION` does not match inside `MY_SELF_VERSION` or
/// inside a trailing comment.
#[derive(Debug, Clone)]
pub struct DeclarationPatterns {
    version: Regex,
    date: Regex,
}

impl DeclarationPatterns {
    /// Build the patterns for the given version and date symbols
    pub fn new(version_symbol: &str, date_symbol: &str) -> Result<Self> {
        if version_symbol.trim().is_empty() || date_symbol.trim().is_empty() {
            return Err(ReleaseError::config(
                "version and date symbols must not be empty",
            ));
        }
        if version_symbol == date_symbol {
            return Err(ReleaseError::config(format!(
                "version and date symbols must differ (both are '{}')",
                version_symbol
            )));
        }

        let version = Regex::new(&format!(
            r"(?:^|;)\s*{}\s*<-\s*([0-9]+)",
            regex::escape(version_symbol)
        ))?;
        let date = Regex::new(&format!(
            r#"(?:^|;)\s*{}\s*<-\s*"([0-9]{{4}}-[0-9]{{2}}-[0-9]{{2}})""#,
            regex::escape(date_symbol)
        ))?;

        Ok(DeclarationPatterns { version, date })
    }

    /// Classify a line. The version test runs first; a line is never both.
    pub fn classify(&self, line: &str) -> Result<LineKind> {
        if let Some(literal) = self.version.captures(line).and_then(|c| c.get(1)) {
            let value = literal.as_str().parse::<u64>().map_err(|e| {
                ReleaseError::version(format!(
                    "Invalid version literal '{}': {}",
                    literal.as_str(),
                    e
                ))
            })?;
            return Ok(LineKind::VersionDecl {
                value,
                span: literal.range(),
            });
        }

        if let Some(date) = self.date.captures(line).and_then(|c| c.get(1)) {
            return Ok(LineKind::DateDecl { span: date.range() });
        }

        Ok(LineKind::Other)
    }
}
