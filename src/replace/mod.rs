//! In-place regex replacement over files.
//!
//! - `substitution` - Pure text substitution (pattern + template)
//! - This module - Reading and rewriting the target files

pub mod substitution;

pub use substitution::{Substituted, Substitution, Template};

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// One configured substitution job
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ReplacementSpec {
    /// File to rewrite
    pub path: String,

    /// Regular expression to search for
    #[serde(alias = "pattern")]
    pub expression: String,

    /// Replacement template; `$ver` is replaced with the new version first
    pub replacement: String,
}

impl ReplacementSpec {
    pub fn new(
        path: impl Into<String>,
        expression: impl Into<String>,
        replacement: impl Into<String>,
    ) -> Self {
        ReplacementSpec {
            path: path.into(),
            expression: expression.into(),
            replacement: replacement.into(),
        }
    }
}

/// What happened to a file during replacement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplacementOutcome {
    Replaced,
    Unmatched,
}

/// Apply `substitution` to the file at `path`.
///
/// The file is only rewritten when the pattern matched.
pub fn replace_in_file(path: &Path, substitution: &Substitution) -> Result<ReplacementOutcome> {
    let content = fs::read_to_string(path)?;
    let result = substitution.apply(&content);

    if !result.matched {
        tracing::debug!(path = %path.display(), expression = substitution.expression(), "No match");
        return Ok(ReplacementOutcome::Unmatched);
    }

    fs::write(path, result.text)?;
    tracing::debug!(path = %path.display(), expression = substitution.expression(), "Replaced");
    Ok(ReplacementOutcome::Replaced)
}

/// Replace the first match of `expression` in the file at `path` with
/// `template`. Template references are expanded; `$ver` is not special here.
pub fn replace_version_in_file(
    path: impl AsRef<Path>,
    expression: &str,
    template: &str,
) -> Result<ReplacementOutcome> {
    let substitution = Substitution::new(expression, template)?;
    replace_in_file(path.as_ref(), &substitution)
}
