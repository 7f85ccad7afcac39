use crate::boundary::BoundaryWarning;
use crate::domain::Version;
use crate::error::{MagikarpError, Result};
use regex::Regex;

/// Default pattern used to pull a version out of a tag name
pub const DEFAULT_TAG_FILTER: &str = r"\d+\.\d+\.\d+";

/// Extracts version text from tag names (e.g. `^v(\d+\.\d+\.\d+)$`).
///
/// The candidate is capture group 1 when the pattern has one, otherwise the
/// whole match.
#[derive(Debug, Clone)]
pub struct TagFilter {
    regex: Regex,
}

impl TagFilter {
    pub fn new(pattern: &str) -> Result<Self> {
        Ok(TagFilter {
            regex: Regex::new(pattern)?,
        })
    }

    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    /// Candidate version text embedded in `tag`, if the filter matches
    pub fn extract<'t>(&self, tag: &'t str) -> Option<&'t str> {
        let captures = self.regex.captures(tag)?;
        captures
            .get(1)
            .or_else(|| captures.get(0))
            .map(|m| m.as_str())
    }

    /// Extract and validate the version of a single tag
    pub fn version_of(&self, tag: &str) -> Result<Version> {
        let candidate = self.extract(tag).ok_or_else(|| {
            MagikarpError::tag(tag, format!("does not match filter '{}'", self.pattern()))
        })?;
        Version::parse(candidate)
            .map_err(|e| MagikarpError::tag(tag, format!("'{}' is not valid: {}", candidate, e)))
    }
}

/// Highest version found among a set of tags
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub version: Version,
    /// Name of the tag the version came from
    pub tag: String,
    /// Tags that were skipped in lenient mode
    pub warnings: Vec<BoundaryWarning>,
}

/// Selects the highest version among tag names.
///
/// Strict by default: one tag that does not match the filter, or whose
/// extracted text is not a valid version, fails the whole resolution.
#[derive(Debug, Clone)]
pub struct TagResolver {
    filter: TagFilter,
    skip_invalid: bool,
}

impl TagResolver {
    pub fn new(filter: TagFilter) -> Self {
        TagResolver {
            filter,
            skip_invalid: false,
        }
    }

    /// Skip invalid tags instead of failing, recording a warning for each
    pub fn lenient(mut self) -> Self {
        self.skip_invalid = true;
        self
    }

    pub fn resolve(&self, tags: &[String]) -> Result<Resolution> {
        if tags.is_empty() {
            return Err(MagikarpError::NoTagsFound);
        }

        let mut best: Option<(Version, &str)> = None;
        let mut warnings = Vec::new();

        for tag in tags {
            let version = match self.filter.version_of(tag) {
                Ok(version) => version,
                Err(e) if self.skip_invalid => {
                    let warning = match self.filter.extract(tag) {
                        None => BoundaryWarning::TagMismatchPattern {
                            tag: tag.clone(),
                            pattern: self.filter.pattern().to_string(),
                        },
                        Some(_) => BoundaryWarning::UnparsableTag {
                            tag: tag.clone(),
                            reason: e.to_string(),
                        },
                    };
                    tracing::warn!(tag = %tag, "Skipping tag: {}", warning);
                    warnings.push(warning);
                    continue;
                }
                Err(e) => return Err(e),
            };

            best = match best {
                Some((current, name)) if current >= version => Some((current, name)),
                _ => Some((version, tag.as_str())),
            };
        }

        let (version, tag) = best.ok_or(MagikarpError::NoTagsFound)?;
        tracing::debug!(tag, %version, candidates = tags.len(), "Resolved highest tag");

        Ok(Resolution {
            version,
            tag: tag.to_string(),
            warnings,
        })
    }
}

/// Highest version among `tags` using strict resolution
pub fn resolve_highest(tags: &[String], filter: &TagFilter) -> Result<Version> {
    TagResolver::new(filter.clone())
        .resolve(tags)
        .map(|resolution| resolution.version)
}
