//! Merge converted definitions into the document's schema registry.

use std::fmt;

use serde_json::Value as JsonValue;
use serde_yaml::{Mapping, Value};

use crate::convert::convert;
use crate::document::TargetDocument;
use crate::error::{json_kind, MergeError};

/// Outcome counters for one merge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Entries inserted under a new name.
    pub added: usize,
    /// Entries that replaced an existing registry entry.
    pub updated: usize,
    /// Bundles dropped by the loader because their name was already taken.
    pub skipped: usize,
    /// Entries that could not be converted or inserted.
    pub failed: usize,
    /// Registry size after the merge.
    pub total: usize,
}

impl fmt::Display for MergeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  - Updated {} existing schemas", self.updated)?;
        writeln!(f, "  - Added {} new schemas", self.added)?;
        if self.skipped > 0 {
            writeln!(f, "  - Skipped {} duplicate schemas", self.skipped)?;
        }
        if self.failed > 0 {
            writeln!(f, "  - Failed {} schemas", self.failed)?;
        }
        write!(f, "  - Total schemas: {}", self.total)
    }
}

/// Convert each definition and write it into `components.schemas`.
///
/// Existing entries are overwritten in place (their position is kept), new
/// entries are appended. A failing entry is logged and counted and the rest
/// still merge; only a malformed registry section aborts the merge, before
/// anything is changed.
pub fn merge<'a, I>(doc: &mut TargetDocument, schemas: I) -> Result<MergeReport, MergeError>
where
    I: IntoIterator<Item = (&'a str, &'a JsonValue)>,
{
    let registry = doc.ensure_registry()?;
    let mut report = MergeReport::default();

    for (name, definition) in schemas {
        match merge_entry(registry, name, definition) {
            Ok(true) => {
                tracing::info!(type_name = %name, "updating existing schema");
                report.updated += 1;
            }
            Ok(false) => {
                tracing::info!(type_name = %name, "adding new schema");
                report.added += 1;
            }
            Err(e) => {
                tracing::error!(type_name = %name, error = %e, "error processing schema");
                report.failed += 1;
            }
        }
    }

    report.total = registry.len();
    Ok(report)
}

/// Convert and insert one definition. Returns whether it replaced an entry.
fn merge_entry(
    registry: &mut Mapping,
    name: &str,
    definition: &JsonValue,
) -> Result<bool, MergeError> {
    let converted = convert(definition);
    if !converted.is_object() {
        return Err(MergeError::InvalidDefinition {
            name: name.to_string(),
            found: json_kind(&converted),
        });
    }

    let value = serde_yaml::to_value(&converted).map_err(|source| MergeError::Serialize {
        name: name.to_string(),
        source,
    })?;

    Ok(registry.insert(Value::from(name), value).is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentFormat;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn doc(text: &str) -> TargetDocument {
        TargetDocument::parse(text, DocumentFormat::Yaml).unwrap()
    }

    fn registry_json(doc: &TargetDocument) -> JsonValue {
        serde_json::to_value(doc.registry().unwrap()).unwrap()
    }

    #[test]
    fn test_added_and_updated_counters() {
        let mut target = doc("components:\n  schemas:\n    B:\n      type: string\n");
        let def_a = json!({"type": "object"});
        let def_b = json!({"type": "integer", "exclusiveMinimum": 0});

        let report = merge(&mut target, [("A", &def_a), ("B", &def_b)]).unwrap();

        assert_eq!(
            report,
            MergeReport {
                added: 1,
                updated: 1,
                skipped: 0,
                failed: 0,
                total: 2,
            }
        );
        assert_eq!(
            registry_json(&target),
            json!({
                "B": {"type": "integer", "minimum": 0, "exclusiveMinimum": true},
                "A": {"type": "object"}
            })
        );
    }

    #[test]
    fn test_update_keeps_registry_position() {
        let mut target = doc("components:\n  schemas:\n    X: {}\n    Y: {}\n    Z: {}\n");
        let def = json!({"description": "new"});
        merge(&mut target, [("Y", &def)]).unwrap();

        let keys: Vec<_> = target
            .registry()
            .unwrap()
            .keys()
            .map(|k| k.as_str().unwrap())
            .collect();
        assert_eq!(keys, vec!["X", "Y", "Z"]);
    }

    #[test]
    fn test_creates_registry_when_missing() {
        let mut target = doc("openapi: 3.0.3\n");
        let def = json!({"type": "string"});
        let report = merge(&mut target, [("A", &def)]).unwrap();
        assert_eq!(report.added, 1);
        assert_eq!(report.total, 1);
        assert_eq!(registry_json(&target), json!({"A": {"type": "string"}}));
    }

    #[test]
    fn test_non_object_definition_fails_entry_only() {
        let mut target = doc("components:\n  schemas: {}\n");
        let bad = json!(["not", "a", "schema"]);
        let good = json!({"type": "boolean"});

        let report = merge(&mut target, [("Bad", &bad), ("Good", &good)]).unwrap();

        assert_eq!(report.failed, 1);
        assert_eq!(report.added, 1);
        assert_eq!(registry_json(&target), json!({"Good": {"type": "boolean"}}));
    }

    #[test]
    fn test_invalid_registry_aborts_without_changes() {
        let mut target = doc("components:\n  schemas: nope\n");
        let before = target.clone();
        let def = json!({"type": "string"});

        let err = merge(&mut target, [("A", &def)]).unwrap_err();

        assert!(matches!(err, MergeError::InvalidRegistry { .. }));
        assert_eq!(target, before);
    }

    #[test]
    fn test_report_display() {
        let report = MergeReport {
            added: 2,
            updated: 3,
            skipped: 1,
            failed: 0,
            total: 9,
        };
        assert_eq!(
            report.to_string(),
            "  - Updated 3 existing schemas\n  - Added 2 new schemas\n  - Skipped 1 duplicate schemas\n  - Total schemas: 9"
        );
    }
}
