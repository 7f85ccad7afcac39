use std::fmt;

/// Non-fatal issues met while bumping a version.
/// These are reported to the user but do not stop the run.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// Tag matched the filter but its version text is not a valid triplet
    UnparsableTag { tag: String, reason: String },
    /// Tag doesn't match the configured filter
    TagMismatchPattern { tag: String, pattern: String },
    /// Replacement expression found nothing to replace in a file
    UnmatchedReplacement { path: String, expression: String },
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::UnparsableTag { tag, reason } => {
                write!(f, "Cannot parse tag '{}': {}", tag, reason)
            }
            BoundaryWarning::TagMismatchPattern { tag, pattern } => {
                write!(f, "Tag '{}' does not match pattern '{}'", tag, pattern)
            }
            BoundaryWarning::UnmatchedReplacement { path, expression } => {
                write!(
                    f,
                    "Pattern '{}' did not match anything in '{}'; file left unchanged",
                    expression, path
                )
            }
        }
    }
}
