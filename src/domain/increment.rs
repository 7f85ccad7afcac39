//! Version increment rules with limit-driven rollover.

use crate::domain::Version;
use crate::error::{MagikarpError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which component of the version to bump
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncrementTarget {
    Major,
    Minor,
    #[default]
    #[serde(alias = "patch")]
    Build,
}

impl IncrementTarget {
    /// Position of the component counted from the right (build = 0)
    fn level(self) -> usize {
        match self {
            IncrementTarget::Build => 0,
            IncrementTarget::Minor => 1,
            IncrementTarget::Major => 2,
        }
    }
}

impl FromStr for IncrementTarget {
    type Err = MagikarpError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "major" => Ok(IncrementTarget::Major),
            "minor" => Ok(IncrementTarget::Minor),
            "build" | "patch" => Ok(IncrementTarget::Build),
            other => Err(MagikarpError::config(format!(
                "Unknown increment target '{}': expected major, minor or build",
                other
            ))),
        }
    }
}

impl fmt::Display for IncrementTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IncrementTarget::Major => write!(f, "major"),
            IncrementTarget::Minor => write!(f, "minor"),
            IncrementTarget::Build => write!(f, "build"),
        }
    }
}

/// Exclusive upper bounds for the build and minor components.
///
/// When a bumped component reaches its limit it resets to 0 and the next
/// component up is bumped. A limit of 0 disables rollover for that component.
/// In configuration files this is written as `[build, minor]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "[u32; 2]", into = "[u32; 2]")]
pub struct Limits {
    pub build: u32,
    pub minor: u32,
}

impl Limits {
    pub fn new(build: u32, minor: u32) -> Self {
        Limits { build, minor }
    }

    /// No rollover at any level
    pub fn unlimited() -> Self {
        Limits::default()
    }

    fn for_level(&self, level: usize) -> Option<u32> {
        let limit = match level {
            0 => self.build,
            1 => self.minor,
            _ => return None,
        };
        (limit != 0).then_some(limit)
    }
}

impl From<[u32; 2]> for Limits {
    fn from([build, minor]: [u32; 2]) -> Self {
        Limits { build, minor }
    }
}

impl From<Limits> for [u32; 2] {
    fn from(limits: Limits) -> Self {
        [limits.build, limits.minor]
    }
}

/// Compute the next version.
///
/// The targeted component is bumped by one. If it reaches its limit, it and
/// every component below it reset to 0 and the next component up is bumped,
/// cascading until a component stays under its limit. Major never rolls.
///
/// With `zero_right` set, components to the right of the target are reset
/// even when no rollover happened; otherwise they keep their values.
pub fn increment(
    version: Version,
    target: IncrementTarget,
    limits: Limits,
    zero_right: bool,
) -> Result<Version> {
    // [build, minor, major]
    let mut parts = [version.build, version.minor, version.major];
    let mut level = target.level();

    loop {
        parts[level] = parts[level].checked_add(1).ok_or_else(|| {
            MagikarpError::version(format!(
                "cannot increment {}: component overflow",
                version
            ))
        })?;

        match limits.for_level(level) {
            Some(limit) if parts[level] >= limit => {
                parts[..=level].iter_mut().for_each(|p| *p = 0);
                level += 1;
            }
            _ => break,
        }
    }

    if zero_right {
        parts[..target.level()].iter_mut().for_each(|p| *p = 0);
    }

    Ok(Version::new(parts[2], parts[1], parts[0]))
}
