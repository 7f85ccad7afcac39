use crate::domain::{IncrementTarget, Limits, DEFAULT_TAG_FILTER};
use crate::error::{MagikarpError, Result};
use crate::manifest::DEFAULT_VERSION_FIELD;
use crate::replace::ReplacementSpec;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Name of the project-local configuration file
pub const CONFIG_FILE_NAME: &str = "magikarp.toml";

/// Represents the complete configuration for magikarp.
///
/// Holds the increment rules, the version source, and the list of files to
/// propagate the new version into.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    /// Manifest file holding the authoritative version
    #[serde(default = "default_manifest")]
    pub manifest: String,

    /// Field of the manifest holding the version
    #[serde(default = "default_version_field")]
    pub version_field: String,

    #[serde(default)]
    pub increment: IncrementTarget,

    /// `[build, minor]` rollover limits, 0 meaning unlimited
    #[serde(default)]
    pub limits: Limits,

    #[serde(default = "default_zero_right")]
    pub zero_right: bool,

    /// Take the current version from the highest git tag instead of the manifest
    #[serde(default)]
    pub git_tags: bool,

    #[serde(default)]
    pub git: GitConfig,

    #[serde(default)]
    pub replacements: Vec<ReplacementSpec>,

    #[serde(default)]
    pub on_no_match: NoMatchPolicy,

    /// Compute and report without writing any file
    #[serde(default)]
    pub dry_run: bool,
}

/// Returns the default manifest path.
fn default_manifest() -> String {
    "package.json".to_string()
}

/// Returns the default version field name.
fn default_version_field() -> String {
    DEFAULT_VERSION_FIELD.to_string()
}

fn default_zero_right() -> bool {
    true
}

/// Configuration for reading the current version from git tags.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct GitConfig {
    /// Directory inside the repository to open
    #[serde(default = "default_project_directory")]
    pub project_directory: String,

    /// Remote to fetch tags from
    #[serde(default = "default_remote")]
    pub remote: String,

    /// Fetch tags from the remote before listing them
    #[serde(default = "default_fetch")]
    pub fetch: bool,

    /// Pattern extracting the version from a tag name
    #[serde(default = "default_filter_regex")]
    pub filter_regex: String,

    /// Skip tags that don't yield a valid version instead of failing
    #[serde(default)]
    pub skip_invalid: bool,
}

fn default_project_directory() -> String {
    ".".to_string()
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_fetch() -> bool {
    true
}

fn default_filter_regex() -> String {
    DEFAULT_TAG_FILTER.to_string()
}

impl Default for GitConfig {
    fn default() -> Self {
        GitConfig {
            project_directory: default_project_directory(),
            remote: default_remote(),
            fetch: default_fetch(),
            filter_regex: default_filter_regex(),
            skip_invalid: false,
        }
    }
}

/// What to do when a replacement expression matches nothing.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum NoMatchPolicy {
    /// Leave the file unchanged silently
    Ignore,
    /// Leave the file unchanged and report a warning
    #[default]
    Warn,
    /// Abort the run
    Fail,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            manifest: default_manifest(),
            version_field: default_version_field(),
            increment: IncrementTarget::default(),
            limits: Limits::unlimited(),
            zero_right: default_zero_right(),
            git_tags: false,
            git: GitConfig::default(),
            replacements: Vec::new(),
            on_no_match: NoMatchPolicy::default(),
            dry_run: false,
        }
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `magikarp.toml` in current directory
/// 3. `.magikarp.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        read_config_file(Path::new(path))?
    } else if Path::new(CONFIG_FILE_NAME).exists() {
        read_config_file(Path::new(CONFIG_FILE_NAME))?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(format!(".{}", CONFIG_FILE_NAME));
        if config_path.exists() {
            read_config_file(&config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    parse_config(&config_str)
}

/// Parse configuration from TOML text.
pub fn parse_config(config_str: &str) -> Result<Config> {
    toml::from_str(config_str).map_err(|e| MagikarpError::config(e.to_string()))
}

fn read_config_file(path: &Path) -> Result<String> {
    tracing::debug!(path = %path.display(), "Loading configuration");
    fs::read_to_string(path).map_err(|e| {
        MagikarpError::config(format!("Cannot read '{}': {}", path.display(), e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = Config::default();
        assert_eq!(config.manifest, "package.json");
        assert_eq!(config.version_field, "version");
        assert_eq!(config.increment, IncrementTarget::Build);
        assert_eq!(config.limits, Limits::new(0, 0));
        assert!(config.zero_right);
        assert!(!config.git_tags);
        assert!(config.git.fetch);
        assert_eq!(config.git.remote, "origin");
        assert_eq!(config.git.filter_regex, DEFAULT_TAG_FILTER);
        assert!(config.replacements.is_empty());
        assert_eq!(config.on_no_match, NoMatchPolicy::Warn);
    }

    #[test]
    fn test_empty_file_matches_defaults() {
        assert_eq!(parse_config("").unwrap(), Config::default());
    }

    #[test]
    fn test_parse_full_config() {
        let config = parse_config(
            r#"
manifest = "app/package.json"
increment = "minor"
limits = [10, 20]
zero_right = false
git_tags = true
on_no_match = "fail"

[git]
remote = "upstream"
fetch = false
filter_regex = '^v(\d+\.\d+\.\d+)$'
skip_invalid = true

[[replacements]]
path = "src/version.js"
expression = "('version':')(\\d+\\.\\d+\\.\\d+)(')"
replacement = "$1$ver$3"

[[replacements]]
path = "README.md"
expression = 'Ver:\d+\.\d+\.\d+'
replacement = "Ver:$ver"
"#,
        )
        .unwrap();

        assert_eq!(config.manifest, "app/package.json");
        assert_eq!(config.increment, IncrementTarget::Minor);
        assert_eq!(config.limits, Limits::new(10, 20));
        assert!(!config.zero_right);
        assert!(config.git_tags);
        assert_eq!(config.on_no_match, NoMatchPolicy::Fail);
        assert_eq!(config.git.remote, "upstream");
        assert!(!config.git.fetch);
        assert!(config.git.skip_invalid);
        assert_eq!(config.git.project_directory, ".");
        assert_eq!(config.replacements.len(), 2);
        assert_eq!(config.replacements[0].path, "src/version.js");
        assert_eq!(
            config.replacements[0].expression,
            r"('version':')(\d+\.\d+\.\d+)(')"
        );
        assert_eq!(config.replacements[1].replacement, "Ver:$ver");
    }

    #[test]
    fn test_patch_is_an_alias_for_build() {
        let config = parse_config(r#"increment = "patch""#).unwrap();
        assert_eq!(config.increment, IncrementTarget::Build);
    }

    #[test]
    fn test_invalid_increment_is_rejected() {
        let err = parse_config(r#"increment = "micro""#).unwrap_err();
        assert!(matches!(err, MagikarpError::Config(_)));
    }

    #[test]
    fn test_limits_must_be_a_pair() {
        assert!(parse_config("limits = [1]").is_err());
    }
}
