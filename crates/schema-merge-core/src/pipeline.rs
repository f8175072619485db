//! End-to-end run: load bundles, merge them, back up and rewrite the document.

use std::path::{Path, PathBuf};

use crate::config::MergeOptions;
use crate::document::{backup_document, read_document, write_document};
use crate::error::MergeError;
use crate::loader::{load_schemas, LoadReport};
use crate::merge::{merge, MergeReport};

/// Everything a caller needs to report on a finished run.
#[derive(Debug, Clone)]
pub struct SyncOutcome {
    pub load: LoadReport,
    pub merge: MergeReport,
    /// Backup copy of the original document, when one was written.
    pub backup: Option<PathBuf>,
    /// Whether the target document was rewritten.
    pub written: bool,
}

/// Merge every bundle in `schema_dir` into the OpenAPI document at `target`.
///
/// All reads happen before any write. Setup failures (missing directory or
/// document, nothing loaded) return before the document is touched. The
/// backup is written before the document is replaced, and a failed backup
/// stops the run.
pub fn sync(
    schema_dir: &Path,
    target: &Path,
    options: &MergeOptions,
) -> Result<SyncOutcome, MergeError> {
    if !schema_dir.is_dir() {
        return Err(MergeError::SchemaDirNotFound(schema_dir.to_path_buf()));
    }
    if !target.is_file() {
        return Err(MergeError::DocumentNotFound(target.to_path_buf()));
    }

    let loaded = load_schemas(schema_dir, options)?;
    if loaded.is_empty() {
        return Err(MergeError::NoSchemasLoaded(schema_dir.to_path_buf()));
    }
    tracing::info!(count = loaded.len(), "loaded schemas from JSON schema files");

    let mut doc = read_document(target)?;

    let mut report = merge(&mut doc, loaded.definitions())?;
    report.skipped = loaded.report.duplicates;

    if options.dry_run {
        tracing::info!(file = %target.display(), "dry run, document not written");
        return Ok(SyncOutcome {
            load: loaded.report,
            merge: report,
            backup: None,
            written: false,
        });
    }

    let backup = backup_document(target, &options.backup_extension)?;
    write_document(target, &doc)?;

    Ok(SyncOutcome {
        load: loaded.report,
        merge: report,
        backup: Some(backup),
        written: true,
    })
}
