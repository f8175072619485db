//! Schema bundle discovery and definition extraction.
//!
//! Every bundle file in a directory contributes at most one definition,
//! keyed by the `TypeName` segment of its filename. Problems with a single
//! file (bad name, unparseable content, empty `$defs`, duplicate name) are
//! logged and counted; they never abort the batch.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::bundle_name::BundleName;
use crate::config::MergeOptions;
use crate::error::MergeError;

/// Section of a bundle holding named sub-definitions.
pub const DEFS_KEYWORD: &str = "$defs";

/// One parsed bundle file.
#[derive(Debug, Clone)]
pub struct SchemaBundle {
    pub filename: String,
    /// The `$defs` section. A non-object `$defs` is kept as an empty map.
    pub definitions: Option<Map<String, Value>>,
    /// The whole parsed document.
    pub root: Value,
}

/// What a bundle contributes to the loaded set.
#[derive(Debug, Clone, PartialEq)]
pub enum Extracted {
    /// First entry of `$defs`.
    Definition { local_name: String, schema: Value },
    /// No `$defs`: the bundle root is the definition.
    Root(Value),
    /// `$defs` present but empty.
    Empty,
}

impl SchemaBundle {
    pub fn new(filename: impl Into<String>, root: Value) -> Self {
        let definitions = root
            .get(DEFS_KEYWORD)
            .map(|defs| defs.as_object().cloned().unwrap_or_default());
        Self {
            filename: filename.into(),
            definitions,
            root,
        }
    }

    /// Pick the definition this bundle contributes.
    ///
    /// Only the first `$defs` entry in document order is used; any further
    /// entries are ignored.
    pub fn extract(self) -> Extracted {
        match self.definitions {
            Some(defs) => match defs.into_iter().next() {
                Some((local_name, schema)) => Extracted::Definition { local_name, schema },
                None => Extracted::Empty,
            },
            None => Extracted::Root(self.root),
        }
    }
}

/// A definition accepted into the loaded set.
#[derive(Debug, Clone)]
pub struct LoadedSchema {
    pub name: BundleName,
    pub source: PathBuf,
    pub schema: Value,
    /// `true` when the bundle had no `$defs` and its root was used.
    pub from_root: bool,
}

/// Per-file outcome counters for one load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub loaded: usize,
    pub root_fallbacks: usize,
    pub duplicates: usize,
    pub unmatched: usize,
    pub empty: usize,
    pub failed: usize,
}

/// Result of loading a schema directory.
#[derive(Debug, Clone, Default)]
pub struct LoadResult {
    /// Accepted definitions keyed by type name, in load order.
    pub schemas: IndexMap<String, LoadedSchema>,
    pub report: LoadReport,
}

impl LoadResult {
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// `(type name, definition)` pairs in load order.
    pub fn definitions(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.schemas
            .iter()
            .map(|(name, loaded)| (name.as_str(), &loaded.schema))
    }
}

/// Load every bundle file in `dir`.
///
/// Candidates are regular files whose extension is listed in
/// [`MergeOptions::bundle_extensions`], visited in ascending filename order.
/// Only a failure to list the directory itself is an error.
pub fn load_schemas(dir: &Path, options: &MergeOptions) -> Result<LoadResult, MergeError> {
    let mut result = LoadResult::default();

    for path in bundle_candidates(dir, options)? {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let Some(name) = BundleName::from_path(&path, options.namespace.as_deref()) else {
            tracing::warn!(file = %filename, "could not parse schema name from filename, skipping");
            result.report.unmatched += 1;
            continue;
        };

        if result.schemas.contains_key(&name.type_name) {
            tracing::warn!(
                type_name = %name.type_name,
                file = %filename,
                "duplicate schema name, skipping"
            );
            result.report.duplicates += 1;
            continue;
        }

        let root = match read_bundle(&path) {
            Ok(root) => root,
            Err(e) => {
                tracing::error!(file = %filename, error = %e, "failed to load schema file");
                result.report.failed += 1;
                continue;
            }
        };

        let (schema, from_root) = match SchemaBundle::new(filename.as_str(), root).extract() {
            Extracted::Definition { local_name, schema } => {
                tracing::info!(type_name = %name.type_name, def = %local_name, "loaded schema");
                (schema, false)
            }
            Extracted::Root(schema) => {
                tracing::info!(type_name = %name.type_name, "loaded root schema");
                result.report.root_fallbacks += 1;
                (schema, true)
            }
            Extracted::Empty => {
                tracing::warn!(file = %filename, "no definitions found in $defs, skipping");
                result.report.empty += 1;
                continue;
            }
        };

        result.report.loaded += 1;
        result.schemas.insert(
            name.type_name.clone(),
            LoadedSchema {
                name,
                source: path,
                schema,
                from_root,
            },
        );
    }

    Ok(result)
}

/// List bundle candidates in `dir`, sorted by filename.
fn bundle_candidates(dir: &Path, options: &MergeOptions) -> Result<Vec<PathBuf>, MergeError> {
    let entries = fs::read_dir(dir).map_err(|e| MergeError::io(dir, e))?;

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| MergeError::io(dir, e))?.path();
        let matches_ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| options.is_bundle_extension(ext));
        if matches_ext && path.is_file() {
            paths.push(path);
        }
    }

    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(paths)
}

/// Read and parse one structured file as a JSON value.
///
/// `.yaml` / `.yml` files go through the YAML parser; everything else is JSON.
pub fn read_bundle(path: &Path) -> Result<Value, MergeError> {
    let content = fs::read_to_string(path).map_err(|e| MergeError::io(path, e))?;
    if is_yaml_path(path) {
        serde_yaml::from_str(&content).map_err(|source| MergeError::Yaml {
            path: path.to_path_buf(),
            source,
        })
    } else {
        serde_json::from_str(&content).map_err(|source| MergeError::Json {
            path: path.to_path_buf(),
            source,
        })
    }
}

pub(crate) fn is_yaml_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_extract_first_def() {
        let bundle = SchemaBundle::new(
            "unitycatalog.catalogs.v1.CatalogInfo.schema.strict.bundle.json",
            json!({
                "$schema": "https://json-schema.org/draft/2020-12/schema",
                "$ref": "#/$defs/unitycatalog.catalogs.v1.CatalogInfo",
                "$defs": {
                    "unitycatalog.catalogs.v1.CatalogInfo": {"type": "object", "title": "first"},
                    "unitycatalog.catalogs.v1.Other": {"type": "object", "title": "second"}
                }
            }),
        );
        assert_eq!(
            bundle.extract(),
            Extracted::Definition {
                local_name: "unitycatalog.catalogs.v1.CatalogInfo".to_string(),
                schema: json!({"type": "object", "title": "first"}),
            }
        );
    }

    #[test]
    fn test_extract_root_when_no_defs() {
        let root = json!({"type": "string", "enum": ["A", "B"]});
        let bundle = SchemaBundle::new("x.json", root.clone());
        assert!(bundle.definitions.is_none());
        assert_eq!(bundle.extract(), Extracted::Root(root));
    }

    #[test]
    fn test_extract_empty_defs() {
        let bundle = SchemaBundle::new("x.json", json!({"$defs": {}}));
        assert_eq!(bundle.extract(), Extracted::Empty);
    }

    #[test]
    fn test_non_object_defs_is_empty() {
        let bundle = SchemaBundle::new("x.json", json!({"$defs": [{"type": "string"}]}));
        assert_eq!(bundle.extract(), Extracted::Empty);
    }

    #[test]
    fn test_is_yaml_path() {
        assert!(is_yaml_path(Path::new("a.yaml")));
        assert!(is_yaml_path(Path::new("a.YML")));
        assert!(!is_yaml_path(Path::new("a.json")));
        assert!(!is_yaml_path(Path::new("a")));
    }
}
