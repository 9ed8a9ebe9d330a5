//! Ignore patterns value object
//!
//! Matches `config.ignores` entries against source-relative paths using
//! gitignore semantics.

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use std::path::Path;
use thiserror::Error;

/// Maximum number of patterns allowed
const MAX_PATTERNS: usize = 1000;

/// Compiled ignore rule set for the local walk.
///
/// Uses the `ignore` crate for gitignore-compatible pattern matching.
#[derive(Debug)]
pub struct IgnorePatterns {
    matcher: Gitignore,
    pattern_count: usize,
}

impl Default for IgnorePatterns {
    fn default() -> Self {
        Self::empty()
    }
}

impl IgnorePatterns {
    /// Create an empty pattern set (matches nothing).
    pub fn empty() -> Self {
        Self {
            matcher: Gitignore::empty(),
            pattern_count: 0,
        }
    }

    /// Compile the configured patterns relative to `root`.
    ///
    /// Blank entries and `#` comments are skipped.
    pub fn from_patterns(root: &Path, patterns: &[String]) -> Result<Self, IgnoreError> {
        let mut builder = GitignoreBuilder::new(root);
        let mut pattern_count = 0;

        for pattern in patterns {
            let trimmed = pattern.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            pattern_count += 1;
            if pattern_count > MAX_PATTERNS {
                return Err(IgnoreError::TooManyPatterns {
                    count: pattern_count,
                    limit: MAX_PATTERNS,
                });
            }

            builder
                .add_line(None, trimmed)
                .map_err(|e| IgnoreError::InvalidPattern {
                    pattern: trimmed.to_string(),
                    message: e.to_string(),
                })?;
        }

        let matcher = builder
            .build()
            .map_err(|e| IgnoreError::BuildFailed(e.to_string()))?;

        Ok(Self {
            matcher,
            pattern_count,
        })
    }

    /// Check if a path should be ignored.
    ///
    /// `rel_path` is relative to the root; `is_dir` should be true for directories.
    pub fn is_ignored(&self, rel_path: &Path, is_dir: bool) -> bool {
        self.matcher
            .matched_path_or_any_parents(rel_path, is_dir)
            .is_ignore()
    }

    /// Get the number of patterns loaded.
    pub fn pattern_count(&self) -> usize {
        self.pattern_count
    }

    /// Check if this is an empty pattern set.
    pub fn is_empty(&self) -> bool {
        self.pattern_count == 0
    }
}

/// Errors that can occur when compiling ignore patterns.
#[derive(Debug, Error)]
pub enum IgnoreError {
    #[error("{count} ignore patterns exceed the limit of {limit}")]
    TooManyPatterns { count: usize, limit: usize },

    #[error("invalid ignore pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("failed to build ignore matcher: {0}")]
    BuildFailed(String),
}
