use crate::error::{MagikarpError, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A `major.minor.build` version triplet.
///
/// Ordering is numeric and component-wise, so `9.1.1 < 10.0.1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub build: u32,
}

impl Version {
    /// Create a new version
    pub fn new(major: u32, minor: u32, build: u32) -> Self {
        Version {
            major,
            minor,
            build,
        }
    }

    /// Parse a canonical `X.Y.Z` string.
    ///
    /// Exactly three dot-separated groups of ASCII digits are accepted. No
    /// prefixes, suffixes or surrounding whitespace.
    pub fn parse(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split('.').collect();
        if parts.len() != 3 {
            return Err(MagikarpError::version(format!(
                "'{}' - expected X.Y.Z",
                s
            )));
        }

        let component = |part: &str, name: &str| -> Result<u32> {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(MagikarpError::version(format!(
                    "'{}' - {} component '{}' is not numeric",
                    s, name, part
                )));
            }
            part.parse::<u32>().map_err(|_| {
                MagikarpError::version(format!(
                    "'{}' - {} component '{}' is out of range",
                    s, name, part
                ))
            })
        };

        Ok(Version {
            major: component(parts[0], "major")?,
            minor: component(parts[1], "minor")?,
            build: component(parts[2], "build")?,
        })
    }

    /// Whether `s` is a well-formed version string
    pub fn is_valid(s: &str) -> bool {
        Version::parse(s).is_ok()
    }
}

impl FromStr for Version {
    type Err = MagikarpError;

    fn from_str(s: &str) -> Result<Self> {
        Version::parse(s)
    }
}

impl TryFrom<String> for Version {
    type Error = MagikarpError;

    fn try_from(s: String) -> Result<Self> {
        Version::parse(&s)
    }
}

impl From<Version> for String {
    fn from(version: Version) -> Self {
        version.to_string()
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.build)
    }
}

/// Compare two versions numerically, major first.
pub fn compare(a: &Version, b: &Version) -> Ordering {
    a.cmp(b)
}

/// Return whichever version is not less than the other. Ties return `a`.
pub fn highest(a: Version, b: Version) -> Version {
    if compare(&a, &b) == Ordering::Less {
        b
    } else {
        a
    }
}

/// Parse and compare two version strings.
pub fn compare_versions(a: &str, b: &str) -> Result<Ordering> {
    Ok(compare(&Version::parse(a)?, &Version::parse(b)?))
}

/// Parse two version strings and return the higher one.
pub fn highest_version(a: &str, b: &str) -> Result<Version> {
    Ok(highest(Version::parse(a)?, Version::parse(b)?))
}
