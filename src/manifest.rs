//! JSON project manifest (`package.json` style).
//!
//! Only the version field is ever modified. Key order and all other values are
//! kept as read.

use crate::domain::Version;
use crate::error::{MagikarpError, Result};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// Default name of the field holding the version
pub const DEFAULT_VERSION_FIELD: &str = "version";

#[derive(Debug, Clone)]
pub struct Manifest {
    path: PathBuf,
    fields: Map<String, Value>,
    version_field: String,
}

impl Manifest {
    /// Read and parse the manifest at `path`
    pub fn load(path: impl AsRef<Path>, version_field: &str) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            MagikarpError::manifest(format!("Cannot read '{}': {}", path.display(), e))
        })?;
        let mut manifest = Manifest::parse(&content, version_field)?;
        manifest.path = path.to_path_buf();
        Ok(manifest)
    }

    /// Parse manifest content that is not backed by a file yet
    pub fn parse(content: &str, version_field: &str) -> Result<Self> {
        let fields = match serde_json::from_str::<Value>(content)? {
            Value::Object(fields) => fields,
            _ => {
                return Err(MagikarpError::manifest(
                    "Manifest must be a JSON object",
                ))
            }
        };

        Ok(Manifest {
            path: PathBuf::new(),
            fields,
            version_field: version_field.to_string(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw text of the version field
    pub fn version_text(&self) -> Result<&str> {
        match self.fields.get(&self.version_field) {
            Some(Value::String(s)) => Ok(s.as_str()),
            Some(other) => Err(MagikarpError::manifest(format!(
                "Field '{}' must be a string, found {}",
                self.version_field, other
            ))),
            None => Err(MagikarpError::manifest(format!(
                "Manifest has no '{}' field",
                self.version_field
            ))),
        }
    }

    pub fn version(&self) -> Result<Version> {
        Version::parse(self.version_text()?)
    }

    /// Replace the version field, keeping its position among the other keys
    pub fn set_version(&mut self, version: &Version) {
        self.fields
            .insert(self.version_field.clone(), Value::String(version.to_string()));
    }

    /// Field lookup for anything other than the version
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Pretty-printed JSON with two-space indentation and a trailing newline
    pub fn to_json(&self) -> Result<String> {
        let mut out = serde_json::to_string_pretty(&self.fields)?;
        out.push('\n');
        Ok(out)
    }

    /// Write the manifest back to the file it was loaded from
    pub fn save(&self) -> Result<()> {
        fs::write(&self.path, self.to_json()?)?;
        Ok(())
    }
}
