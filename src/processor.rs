//! Version bump orchestration
//!
//! Ties the pieces together for one run:
//! 1. Read the current version (manifest, or highest git tag)
//! 2. Compute the next version
//! 3. Write it back into the manifest
//! 4. Propagate it into the configured files, in order
//!
//! Any error aborts the run. Files already written stay written.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::boundary::BoundaryWarning;
use crate::config::{Config, NoMatchPolicy};
use crate::domain::{compare, increment, TagFilter, TagResolver, Version};
use crate::error::{MagikarpError, Result};
use crate::git::TagSource;
use crate::manifest::Manifest;
use crate::replace::{replace_in_file, ReplacementOutcome, ReplacementSpec, Substitution};

/// Token in replacement templates standing for the new version
pub const VERSION_TOKEN: &str = "$ver";

/// Where the current version was read from
#[derive(Debug, Clone, PartialEq)]
pub enum VersionSource {
    Manifest,
    /// Highest tag among the repository's tags
    GitTag(String),
}

/// Outcome of one configured replacement
#[derive(Debug, Clone, PartialEq)]
pub struct ReplacementReport {
    pub path: String,
    pub outcome: ReplacementOutcome,
}

/// Summary of a run
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessReport {
    pub previous: Version,
    pub version: Version,
    pub source: VersionSource,
    pub replacements: Vec<ReplacementReport>,
    pub warnings: Vec<BoundaryWarning>,
    /// Nothing was written
    pub dry_run: bool,
}

/// Substitute every `$ver` in `template` with `version`
pub fn resolve_version_token(template: &str, version: &Version) -> String {
    template.replace(VERSION_TOKEN, &version.to_string())
}

/// Drives a version bump for one manifest
pub struct PackageProcessor<'a> {
    config: &'a Config,
    tag_source: Option<&'a dyn TagSource>,
}

impl<'a> PackageProcessor<'a> {
    pub fn new(config: &'a Config) -> Self {
        PackageProcessor {
            config,
            tag_source: None,
        }
    }

    /// Tag source used when `git_tags` is enabled
    pub fn with_tag_source(mut self, source: &'a dyn TagSource) -> Self {
        self.tag_source = Some(source);
        self
    }

    pub fn process(&self, manifest_path: impl AsRef<Path>) -> Result<ProcessReport> {
        let manifest_path = manifest_path.as_ref();
        let mut warnings = Vec::new();

        let mut manifest = Manifest::load(manifest_path, &self.config.version_field)?;
        let (previous, source) = self.current_version(&manifest, &mut warnings)?;
        let version = self.next_version(previous)?;

        tracing::info!(%previous, %version, source = ?source, "Computed new version");

        if !self.config.dry_run {
            manifest.set_version(&version);
            manifest.save()?;
            tracing::debug!(path = %manifest_path.display(), "Manifest updated");
        }

        // dry-run keeps rewritten contents in memory so later replacements
        // on the same file see earlier results
        let mut pending = HashMap::new();
        let mut replacements = Vec::with_capacity(self.config.replacements.len());
        for spec in &self.config.replacements {
            replacements.push(self.apply_replacement(
                spec,
                &version,
                &mut pending,
                &mut warnings,
            )?);
        }

        Ok(ProcessReport {
            previous,
            version,
            source,
            replacements,
            warnings,
            dry_run: self.config.dry_run,
        })
    }

    fn current_version(
        &self,
        manifest: &Manifest,
        warnings: &mut Vec<BoundaryWarning>,
    ) -> Result<(Version, VersionSource)> {
        if !self.config.git_tags {
            return Ok((manifest.version()?, VersionSource::Manifest));
        }

        let source = self.tag_source.ok_or_else(|| {
            MagikarpError::config("git_tags is enabled but no tag source is available")
        })?;

        if self.config.git.fetch {
            source.fetch_tags()?;
        }
        let tags = source.list_tags()?;
        tracing::debug!(count = tags.len(), "Listed tags");

        let mut resolver = TagResolver::new(TagFilter::new(&self.config.git.filter_regex)?);
        if self.config.git.skip_invalid {
            resolver = resolver.lenient();
        }
        let resolution = resolver.resolve(&tags)?;
        warnings.extend(resolution.warnings);

        Ok((resolution.version, VersionSource::GitTag(resolution.tag)))
    }

    fn next_version(&self, current: Version) -> Result<Version> {
        let next = increment(
            current,
            self.config.increment,
            self.config.limits,
            self.config.zero_right,
        )?;

        if compare(&next, &current) != Ordering::Greater {
            return Err(MagikarpError::version(format!(
                "computed version {} is not higher than {}",
                next, current
            )));
        }
        Ok(next)
    }

    fn apply_replacement(
        &self,
        spec: &ReplacementSpec,
        version: &Version,
        pending: &mut HashMap<PathBuf, String>,
        warnings: &mut Vec<BoundaryWarning>,
    ) -> Result<ReplacementReport> {
        let template = resolve_version_token(&spec.replacement, version);
        let substitution = Substitution::new(&spec.expression, &template)?;
        let path = Path::new(&spec.path);

        let outcome = if self.config.dry_run {
            let content = match pending.remove(path) {
                Some(content) => content,
                None => fs::read_to_string(path)?,
            };
            let result = substitution.apply(&content);
            pending.insert(path.to_path_buf(), result.text);
            if result.matched {
                ReplacementOutcome::Replaced
            } else {
                ReplacementOutcome::Unmatched
            }
        } else {
            replace_in_file(path, &substitution)?
        };

        if outcome == ReplacementOutcome::Unmatched {
            match self.config.on_no_match {
                NoMatchPolicy::Fail => {
                    return Err(MagikarpError::replacement(&spec.path, &spec.expression));
                }
                NoMatchPolicy::Warn => {
                    let warning = BoundaryWarning::UnmatchedReplacement {
                        path: spec.path.clone(),
                        expression: spec.expression.clone(),
                    };
                    tracing::warn!(path = %spec.path, "{}", warning);
                    warnings.push(warning);
                }
                NoMatchPolicy::Ignore => {}
            }
        }

        Ok(ReplacementReport {
            path: spec.path.clone(),
            outcome,
        })
    }
}

/// Bump the version of the manifest at `manifest_path` without a tag source
pub fn process_package(manifest_path: impl AsRef<Path>, config: &Config) -> Result<ProcessReport> {
    PackageProcessor::new(config).process(manifest_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{IncrementTarget, Limits};
    use crate::git::MockRepository;
    use tempfile::TempDir;

    fn write_package(dir: &TempDir, version: &str) -> std::path::PathBuf {
        let path = dir.path().join("package.json");
        let json = format!(
            r#"{{"title": "Some Package", "description": "Some description text.", "version": "{}"}}"#,
            version
        );
        fs::write(&path, json).unwrap();
        path
    }

    fn read_version(path: &Path) -> String {
        Manifest::load(path, "version")
            .unwrap()
            .version_text()
            .unwrap()
            .to_string()
    }

    #[test]
    fn test_basic_increment() {
        let dir = TempDir::new().unwrap();
        let path = write_package(&dir, "1.1.1");

        let report = process_package(&path, &Config::default()).unwrap();

        assert_eq!(read_version(&path), "1.1.2");
        assert_eq!(report.previous, Version::new(1, 1, 1));
        assert_eq!(report.version, Version::new(1, 1, 2));
        assert_eq!(report.source, VersionSource::Manifest);
    }

    #[test]
    fn test_increment_with_zeroing() {
        let dir = TempDir::new().unwrap();
        let path = write_package(&dir, "9.9.9");
        let config = Config {
            increment: IncrementTarget::Minor,
            zero_right: true,
            ..Config::default()
        };

        process_package(&path, &config).unwrap();
        assert_eq!(read_version(&path), "9.10.0");
    }

    #[test]
    fn test_increment_without_zeroing() {
        let dir = TempDir::new().unwrap();
        let path = write_package(&dir, "9.9.9");
        let config = Config {
            increment: IncrementTarget::Minor,
            zero_right: false,
            ..Config::default()
        };

        process_package(&path, &config).unwrap();
        assert_eq!(read_version(&path), "9.10.9");
    }

    #[test]
    fn test_limits_applied() {
        let dir = TempDir::new().unwrap();
        let path = write_package(&dir, "1.9.9");
        let config = Config {
            limits: Limits::new(10, 10),
            ..Config::default()
        };

        process_package(&path, &config).unwrap();
        assert_eq!(read_version(&path), "2.0.0");
    }

    #[test]
    fn test_increment_replaces_text_in_file() {
        let dir = TempDir::new().unwrap();
        let path = write_package(&dir, "1.1.0");
        let companion = dir.path().join("test_file.js");
        fs::write(
            &companion,
            "/* header */\nvar item = { 'title': 'test', 'version':'1.1.0' };\n// end\n",
        )
        .unwrap();

        let config = Config {
            increment: IncrementTarget::Build,
            replacements: vec![ReplacementSpec::new(
                companion.to_string_lossy(),
                r"('version':')(\d+\.\d+\.\d+)(')",
                "$1$ver$3",
            )],
            ..Config::default()
        };

        let report = process_package(&path, &config).unwrap();

        assert_eq!(read_version(&path), "1.1.1");
        let content = fs::read_to_string(&companion).unwrap();
        assert!(content.contains("'version':'1.1.1'"));
        assert_eq!(report.replacements[0].outcome, ReplacementOutcome::Replaced);
    }

    #[test]
    fn test_replacements_apply_in_order_to_same_file() {
        let dir = TempDir::new().unwrap();
        let path = write_package(&dir, "0.1.0");
        let target = dir.path().join("VERSION.txt");
        fs::write(&target, "current=0.1.0\n").unwrap();
        let target_str = target.to_string_lossy().to_string();

        let config = Config {
            replacements: vec![
                ReplacementSpec::new(&target_str, r"current=(\S+)", "current=$ver"),
                ReplacementSpec::new(&target_str, r"current=(\S+)", "current=$1 (from $1)"),
            ],
            ..Config::default()
        };

        process_package(&path, &config).unwrap();
        assert_eq!(
            fs::read_to_string(&target).unwrap(),
            "current=0.1.1 (from 0.1.1)\n"
        );
    }

    #[test]
    fn test_unmatched_replacement_warns_by_default() {
        let dir = TempDir::new().unwrap();
        let path = write_package(&dir, "1.0.0");
        let target = dir.path().join("notes.txt");
        fs::write(&target, "no version here\n").unwrap();

        let config = Config {
            replacements: vec![ReplacementSpec::new(
                target.to_string_lossy(),
                r"Ver:\d+",
                "Ver:$ver",
            )],
            ..Config::default()
        };

        let report = process_package(&path, &config).unwrap();
        assert_eq!(report.replacements[0].outcome, ReplacementOutcome::Unmatched);
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(fs::read_to_string(&target).unwrap(), "no version here\n");
    }

    #[test]
    fn test_unmatched_replacement_ignored() {
        let dir = TempDir::new().unwrap();
        let path = write_package(&dir, "1.0.0");
        let target = dir.path().join("notes.txt");
        fs::write(&target, "no version here\n").unwrap();

        let config = Config {
            replacements: vec![ReplacementSpec::new(
                target.to_string_lossy(),
                r"Ver:\d+",
                "Ver:$ver",
            )],
            on_no_match: NoMatchPolicy::Ignore,
            ..Config::default()
        };

        let report = process_package(&path, &config).unwrap();
        assert_eq!(report.replacements[0].outcome, ReplacementOutcome::Unmatched);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_unmatched_replacement_fails_without_rollback() {
        let dir = TempDir::new().unwrap();
        let path = write_package(&dir, "1.0.0");
        let first = dir.path().join("first.txt");
        let second = dir.path().join("second.txt");
        fs::write(&first, "v1.0.0\n").unwrap();
        fs::write(&second, "nothing\n").unwrap();

        let config = Config {
            replacements: vec![
                ReplacementSpec::new(first.to_string_lossy(), r"v\d+\.\d+\.\d+", "v$ver"),
                ReplacementSpec::new(second.to_string_lossy(), r"v\d+\.\d+\.\d+", "v$ver"),
            ],
            on_no_match: NoMatchPolicy::Fail,
            ..Config::default()
        };

        let err = process_package(&path, &config).unwrap_err();
        assert!(matches!(err, MagikarpError::ReplacementFailed { .. }));
        assert_eq!(read_version(&path), "1.0.1");
        assert_eq!(fs::read_to_string(&first).unwrap(), "v1.0.1\n");
    }

    #[test]
    fn test_missing_replacement_target_aborts() {
        let dir = TempDir::new().unwrap();
        let path = write_package(&dir, "1.0.0");
        let config = Config {
            replacements: vec![ReplacementSpec::new(
                dir.path().join("missing.txt").to_string_lossy(),
                "x",
                "y",
            )],
            ..Config::default()
        };

        assert!(matches!(
            process_package(&path, &config),
            Err(MagikarpError::Io(_))
        ));
    }

    #[test]
    fn test_invalid_manifest_version_aborts_before_writing() {
        let dir = TempDir::new().unwrap();
        let path = write_package(&dir, "1.0");

        let err = process_package(&path, &Config::default()).unwrap_err();
        assert!(matches!(err, MagikarpError::InvalidVersion(_)));
        assert_eq!(read_version(&path), "1.0");
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let path = write_package(&dir, "1.1.0");
        let target = dir.path().join("app.js");
        fs::write(&target, "const VERSION = '1.1.0';\n").unwrap();

        let config = Config {
            dry_run: true,
            replacements: vec![ReplacementSpec::new(
                target.to_string_lossy(),
                r"VERSION = '[^']*'",
                "VERSION = '$ver'",
            )],
            ..Config::default()
        };

        let report = process_package(&path, &config).unwrap();
        assert!(report.dry_run);
        assert_eq!(report.version, Version::new(1, 1, 1));
        assert_eq!(report.replacements[0].outcome, ReplacementOutcome::Replaced);
        assert_eq!(read_version(&path), "1.1.0");
        assert_eq!(
            fs::read_to_string(&target).unwrap(),
            "const VERSION = '1.1.0';\n"
        );
    }

    #[test]
    fn test_git_tags_as_version_source() {
        let dir = TempDir::new().unwrap();
        let path = write_package(&dir, "0.0.1");
        let repo = MockRepository::with_tags(["0.1.1", "1.2.3", "1.2.4", "1.0.9", "0.9.99"]);
        let config = Config {
            git_tags: true,
            ..Config::default()
        };

        let report = PackageProcessor::new(&config)
            .with_tag_source(&repo)
            .process(&path)
            .unwrap();

        assert_eq!(repo.fetch_count(), 1);
        assert_eq!(report.previous, Version::new(1, 2, 4));
        assert_eq!(report.source, VersionSource::GitTag("1.2.4".to_string()));
        assert_eq!(read_version(&path), "1.2.5");
    }

    #[test]
    fn test_git_tags_without_fetch() {
        let dir = TempDir::new().unwrap();
        let path = write_package(&dir, "0.0.1");
        let repo = MockRepository::with_tags(["v2.0.0"]);
        let mut config = Config {
            git_tags: true,
            increment: IncrementTarget::Major,
            ..Config::default()
        };
        config.git.fetch = false;
        config.git.filter_regex = r"^v(\d+\.\d+\.\d+)$".to_string();

        PackageProcessor::new(&config)
            .with_tag_source(&repo)
            .process(&path)
            .unwrap();

        assert_eq!(repo.fetch_count(), 0);
        assert_eq!(read_version(&path), "3.0.0");
    }

    #[test]
    fn test_git_fetch_failure_aborts() {
        let dir = TempDir::new().unwrap();
        let path = write_package(&dir, "0.0.1");
        let mut repo = MockRepository::with_tags(["1.0.0"]);
        repo.fail_fetch("could not resolve host");
        let config = Config {
            git_tags: true,
            ..Config::default()
        };

        let result = PackageProcessor::new(&config)
            .with_tag_source(&repo)
            .process(&path);

        assert!(matches!(result, Err(MagikarpError::Git(_))));
        assert_eq!(read_version(&path), "0.0.1");
    }

    #[test]
    fn test_git_tags_with_bad_tag_fail_fast() {
        let dir = TempDir::new().unwrap();
        let path = write_package(&dir, "0.0.1");
        let repo = MockRepository::with_tags(["1.0.0", "latest"]);
        let config = Config {
            git_tags: true,
            ..Config::default()
        };

        let result = PackageProcessor::new(&config)
            .with_tag_source(&repo)
            .process(&path);
        assert!(matches!(
            result,
            Err(MagikarpError::InvalidTagVersion { .. })
        ));
    }

    #[test]
    fn test_git_tags_lenient_collects_warnings() {
        let dir = TempDir::new().unwrap();
        let path = write_package(&dir, "0.0.1");
        let repo = MockRepository::with_tags(["1.0.0", "latest"]);
        let mut config = Config {
            git_tags: true,
            ..Config::default()
        };
        config.git.skip_invalid = true;

        let report = PackageProcessor::new(&config)
            .with_tag_source(&repo)
            .process(&path)
            .unwrap();
        assert_eq!(report.version, Version::new(1, 0, 1));
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn test_git_tags_without_source_is_a_config_error() {
        let dir = TempDir::new().unwrap();
        let path = write_package(&dir, "0.0.1");
        let config = Config {
            git_tags: true,
            ..Config::default()
        };

        assert!(matches!(
            process_package(&path, &config),
            Err(MagikarpError::Config(_))
        ));
    }

    #[test]
    fn test_resolve_version_token() {
        let v = Version::new(1, 1, 1);
        assert_eq!(resolve_version_token("$1$ver$3", &v), "$11.1.1$3");
        assert_eq!(resolve_version_token("$ver / $ver", &v), "1.1.1 / 1.1.1");
        assert_eq!(resolve_version_token("no token", &v), "no token");
    }

    fn chained_replacements(dir: &TempDir, dry_run: bool) -> Config {
        let target = dir.path().join("a.txt");
        fs::write(&target, "Ver:0.0.1\n").unwrap();
        let target = target.to_string_lossy().to_string();
        Config {
            dry_run,
            on_no_match: NoMatchPolicy::Fail,
            replacements: vec![
                ReplacementSpec::new(target.clone(), r"Ver:\S+", "Release:$ver"),
                ReplacementSpec::new(target, r"Release:(\S+)", "Release:$1 final"),
            ],
            ..Config::default()
        }
    }

    #[test]
    fn test_later_replacement_sees_earlier_result() {
        let dir = TempDir::new().unwrap();
        let path = write_package(&dir, "1.0.0");
        let config = chained_replacements(&dir, false);

        let report = process_package(&path, &config).unwrap();

        let outcomes: Vec<_> = report.replacements.iter().map(|r| r.outcome).collect();
        assert_eq!(
            outcomes,
            vec![ReplacementOutcome::Replaced, ReplacementOutcome::Replaced]
        );
        assert_eq!(
            fs::read_to_string(dir.path().join("a.txt")).unwrap(),
            "Release:1.0.1 final\n"
        );
    }

    #[test]
    fn test_dry_run_chains_replacements_in_memory() {
        let dir = TempDir::new().unwrap();
        let path = write_package(&dir, "1.0.0");
        let config = chained_replacements(&dir, true);

        let report = process_package(&path, &config).unwrap();

        let outcomes: Vec<_> = report.replacements.iter().map(|r| r.outcome).collect();
        assert_eq!(
            outcomes,
            vec![ReplacementOutcome::Replaced, ReplacementOutcome::Replaced]
        );
        assert_eq!(
            fs::read_to_string(dir.path().join("a.txt")).unwrap(),
            "Ver:0.0.1\n"
        );
        assert_eq!(read_version(&path), "1.0.0");
    }
}
