//! Reading, backing up and atomically rewriting the target OpenAPI document.
//!
//! The document is held as a [`serde_yaml::Value`] tree. Its mappings keep
//! insertion order and accept non-string keys (numeric response codes), so
//! everything outside the schema registry round-trips unchanged.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde_yaml::{Mapping, Value};
use tempfile::NamedTempFile;

use crate::error::{yaml_kind, MergeError};

/// Serialization format of a document on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Yaml,
    Json,
}

impl DocumentFormat {
    /// `.json` → JSON; anything else is treated as YAML.
    pub fn from_path(path: &Path) -> Self {
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            DocumentFormat::Json
        } else {
            DocumentFormat::Yaml
        }
    }
}

/// An OpenAPI document loaded into memory.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetDocument {
    pub root: Value,
    pub format: DocumentFormat,
}

impl TargetDocument {
    /// Parse document text. YAML is a superset of JSON, so one parser covers
    /// both formats.
    pub fn parse(content: &str, format: DocumentFormat) -> Result<Self, serde_yaml::Error> {
        let root = serde_yaml::from_str(content)?;
        Ok(Self { root, format })
    }

    /// Borrow the `components.schemas` registry, if it exists as a mapping.
    pub fn registry(&self) -> Option<&Mapping> {
        self.root
            .get("components")
            .and_then(|components| components.get("schemas"))
            .and_then(Value::as_mapping)
    }

    /// Return the `components.schemas` registry, creating any missing (or
    /// null) level as an empty mapping.
    ///
    /// Nothing is mutated when an existing level is not a mapping.
    pub fn ensure_registry(&mut self) -> Result<&mut Mapping, MergeError> {
        if self.root.is_null() {
            self.root = Value::Mapping(Mapping::new());
        }
        let root = as_mapping_mut(&mut self.root, "<root>")?;

        check_slot(root, "components", "components")?;
        let components = root
            .entry(Value::from("components"))
            .or_insert_with(|| Value::Mapping(Mapping::new()));
        if components.is_null() {
            *components = Value::Mapping(Mapping::new());
        }
        let components = as_mapping_mut(components, "components")?;

        check_slot(components, "schemas", "components.schemas")?;
        let schemas = components
            .entry(Value::from("schemas"))
            .or_insert_with(|| Value::Mapping(Mapping::new()));
        if schemas.is_null() {
            *schemas = Value::Mapping(Mapping::new());
        }
        as_mapping_mut(schemas, "components.schemas")
    }

    /// Serialize in this document's format. JSON output ends with a newline.
    pub fn render(&self) -> Result<String, MergeError> {
        match self.format {
            DocumentFormat::Yaml => serde_yaml::to_string(&self.root).map_err(MergeError::RenderYaml),
            DocumentFormat::Json => {
                let mut out =
                    serde_json::to_string_pretty(&self.root).map_err(MergeError::RenderJson)?;
                out.push('\n');
                Ok(out)
            }
        }
    }
}

/// Fail when `key` exists under `parent` with a value that is neither a
/// mapping nor null.
fn check_slot(parent: &Mapping, key: &str, path: &str) -> Result<(), MergeError> {
    match parent.get(key) {
        Some(value) if !value.is_mapping() && !value.is_null() => {
            Err(MergeError::InvalidRegistry {
                path: path.to_string(),
                found: yaml_kind(value),
            })
        }
        _ => Ok(()),
    }
}

fn as_mapping_mut<'a>(value: &'a mut Value, path: &str) -> Result<&'a mut Mapping, MergeError> {
    let found = yaml_kind(value);
    value
        .as_mapping_mut()
        .ok_or_else(|| MergeError::InvalidRegistry {
            path: path.to_string(),
            found,
        })
}

/// Read and parse the target document at `path`.
pub fn read_document(path: &Path) -> Result<TargetDocument, MergeError> {
    let content = fs::read_to_string(path).map_err(|e| MergeError::io(path, e))?;
    TargetDocument::parse(&content, DocumentFormat::from_path(path)).map_err(|source| {
        MergeError::Yaml {
            path: path.to_path_buf(),
            source,
        }
    })
}

/// Sibling backup path: `openapi.yaml` → `openapi.yaml.bak`.
pub fn backup_path(path: &Path, extension: &str) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".");
    name.push(extension);
    path.with_file_name(name)
}

/// Copy `path` to its backup location and return that location.
pub fn backup_document(path: &Path, extension: &str) -> Result<PathBuf, MergeError> {
    let backup = backup_path(path, extension);
    fs::copy(path, &backup).map_err(|source| MergeError::Backup {
        path: path.to_path_buf(),
        backup: backup.clone(),
        source,
    })?;
    tracing::info!(backup = %backup.display(), "created backup");
    Ok(backup)
}

/// Serialize `doc` and atomically replace `path` with it.
///
/// The content goes to a temporary file in the same directory, which is then
/// renamed over `path`. An existing file's permissions are kept. On any
/// failure the original file is left untouched.
pub fn write_document(path: &Path, doc: &TargetDocument) -> Result<(), MergeError> {
    let content = doc.render()?;
    let write_err = |source| MergeError::Write {
        path: path.to_path_buf(),
        source,
    };

    let parent = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(parent).map_err(write_err)?;
    temp.write_all(content.as_bytes()).map_err(write_err)?;

    // The temp file is created owner-only; carry the target's mode over.
    if let Ok(metadata) = fs::metadata(path) {
        temp.as_file()
            .set_permissions(metadata.permissions())
            .map_err(write_err)?;
    }
    temp.as_file().sync_all().map_err(write_err)?;
    temp.persist(path).map_err(|e| write_err(e.error))?;

    tracing::debug!(file = %path.display(), bytes = content.len(), "wrote document");
    Ok(())
}
