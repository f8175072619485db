//! Error types for loading, converting and merging schemas.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MergeError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON parsing error in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("YAML parsing error in {}: {source}", .path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("JSON schema directory not found: {}", .0.display())]
    SchemaDirNotFound(PathBuf),

    #[error("OpenAPI file not found: {}", .0.display())]
    DocumentNotFound(PathBuf),

    #[error("No schemas loaded from {}", .0.display())]
    NoSchemasLoaded(PathBuf),

    #[error("Registry section `{path}` must be a mapping, found {found}")]
    InvalidRegistry { path: String, found: &'static str },

    #[error("Schema `{name}` must be an object, found {found}")]
    InvalidDefinition { name: String, found: &'static str },

    #[error("Schema `{name}` could not be translated: {source}")]
    Serialize {
        name: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Failed to serialize document as YAML: {0}")]
    RenderYaml(#[source] serde_yaml::Error),

    #[error("Failed to serialize document as JSON: {0}")]
    RenderJson(#[source] serde_json::Error),

    #[error("Failed to back up {} to {}: {source}", .path.display(), .backup.display())]
    Backup {
        path: PathBuf,
        backup: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl MergeError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Human-readable kind of a JSON value, used in error messages.
pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// Human-readable kind of a YAML value, used in error messages.
pub(crate) fn yaml_kind(value: &serde_yaml::Value) -> &'static str {
    match value {
        serde_yaml::Value::Null => "null",
        serde_yaml::Value::Bool(_) => "boolean",
        serde_yaml::Value::Number(_) => "number",
        serde_yaml::Value::String(_) => "string",
        serde_yaml::Value::Sequence(_) => "sequence",
        serde_yaml::Value::Mapping(_) => "mapping",
        serde_yaml::Value::Tagged(_) => "tagged value",
    }
}
