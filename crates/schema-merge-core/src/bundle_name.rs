//! Bundle filename parsing.
//!
//! Bundle files are named
//! `{namespace}.{service}.v{version}.{TypeName}.schema.strict.bundle.{ext}`.
//! The `TypeName` segment becomes the key in the OpenAPI schema registry.

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

/// Suffix shared by every bundle file stem.
pub const BUNDLE_SUFFIX: &str = ".schema.strict.bundle";

fn bundle_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"^(?P<namespace>[\w-]+)\.(?P<service>\w+)\.v(?P<version>\d+)\.(?P<type_name>[^.]+)\.schema\.strict\.bundle$",
        )
        .expect("bundle filename pattern is valid")
    })
}

/// The parts of a bundle filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleName {
    pub namespace: String,
    pub service: String,
    pub version: u32,
    pub type_name: String,
}

impl BundleName {
    /// Parse a file stem (the filename without its final extension).
    ///
    /// # Example
    /// ```
    /// use schema_merge_core::BundleName;
    /// let name = BundleName::parse_stem("unitycatalog.catalogs.v1.CatalogInfo.schema.strict.bundle").unwrap();
    /// assert_eq!(name.type_name, "CatalogInfo");
    /// ```
    pub fn parse_stem(stem: &str) -> Option<Self> {
        let caps = bundle_pattern().captures(stem)?;
        Some(Self {
            namespace: caps["namespace"].to_string(),
            service: caps["service"].to_string(),
            version: caps["version"].parse().ok()?,
            type_name: caps["type_name"].to_string(),
        })
    }

    /// Parse a bundle path, optionally requiring a specific namespace.
    pub fn from_path(path: &Path, namespace: Option<&str>) -> Option<Self> {
        let stem = path.file_stem()?.to_str()?;
        let name = Self::parse_stem(stem)?;
        match namespace {
            Some(ns) if ns != name.namespace => None,
            _ => Some(name),
        }
    }
}

/// Derive the registry type name for a bundle filename.
pub fn type_name_from_filename(filename: &str) -> Option<String> {
    BundleName::from_path(Path::new(filename), None).map(|name| name.type_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_full_filename() {
        let name = BundleName::from_path(
            Path::new("unitycatalog.catalogs.v1.CatalogInfo.schema.strict.bundle.json"),
            None,
        )
        .unwrap();
        assert_eq!(
            name,
            BundleName {
                namespace: "unitycatalog".to_string(),
                service: "catalogs".to_string(),
                version: 1,
                type_name: "CatalogInfo".to_string(),
            }
        );
    }

    #[test]
    fn test_service_with_underscore() {
        assert_eq!(
            type_name_from_filename(
                "unitycatalog.external_locations.v1.ExternalLocationInfo.schema.strict.bundle.json"
            ),
            Some("ExternalLocationInfo".to_string())
        );
    }

    #[test]
    fn test_missing_bundle_suffix() {
        assert_eq!(
            type_name_from_filename("unitycatalog.catalogs.v1.CatalogInfo.json"),
            None
        );
        assert_eq!(
            type_name_from_filename("unitycatalog.catalogs.v1.CatalogInfo.schema.json"),
            None
        );
    }

    #[test]
    fn test_version_must_be_numeric() {
        assert_eq!(
            type_name_from_filename("unitycatalog.catalogs.vX.CatalogInfo.schema.strict.bundle.json"),
            None
        );
        let name =
            BundleName::parse_stem("acme.orders.v12.Order.schema.strict.bundle").unwrap();
        assert_eq!(name.version, 12);
    }

    #[test]
    fn test_namespace_filter() {
        let path = Path::new("acme.orders.v1.Order.schema.strict.bundle.yaml");
        assert!(BundleName::from_path(path, Some("acme")).is_some());
        assert!(BundleName::from_path(path, Some("unitycatalog")).is_none());
    }
}
