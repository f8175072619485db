//! Configuration for a schema merge run.

use serde::{Deserialize, Serialize};

/// Options for loading bundles and merging them into a document.
///
/// ## Serialization Format
///
/// Fields are serialized in `kebab-case` (e.g., `bundle-extensions`,
/// `backup-extension`). Missing fields fall back to [`MergeOptions::default`],
/// so a config file only needs the values it overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct MergeOptions {
    /// Required namespace segment of bundle filenames. `None` accepts any.
    pub namespace: Option<String>,
    /// File extensions (without the dot) considered bundle candidates.
    pub bundle_extensions: Vec<String>,
    /// Extension appended to the target file name for the backup copy.
    pub backup_extension: String,
    /// Compute and report the merge without backing up or writing.
    pub dry_run: bool,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            namespace: None,
            bundle_extensions: vec!["json".to_string(), "yaml".to_string(), "yml".to_string()],
            backup_extension: "bak".to_string(),
            dry_run: false,
        }
    }
}

impl MergeOptions {
    /// Whether a file extension marks a bundle candidate (case-insensitive).
    pub fn is_bundle_extension(&self, ext: &str) -> bool {
        self.bundle_extensions
            .iter()
            .any(|candidate| candidate.eq_ignore_ascii_case(ext))
    }
}
