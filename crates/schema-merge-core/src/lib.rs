//! # schema-merge-core
//!
//! Enrich an OpenAPI document with the type definitions found in a directory
//! of JSON Schema bundle files.
//!
//! The run has three stages:
//!
//! 1. [`load_schemas`] discovers `*.schema.strict.bundle.*` files and keys
//!    one definition per file by the `TypeName` segment of its filename.
//! 2. [`convert`] rewrites each definition from JSON Schema into the OpenAPI
//!    3.0 Schema Object dialect.
//! 3. [`merge`] inserts or replaces the converted definitions under
//!    `components.schemas`, leaving the rest of the document untouched.
//!
//! [`sync`] wires the stages together with backup and atomic write.

pub mod bundle_name;
pub mod config;
pub mod convert;
pub mod document;
pub mod error;
pub mod loader;
pub mod merge;
pub mod pipeline;

pub use bundle_name::{type_name_from_filename, BundleName};
pub use config::MergeOptions;
pub use convert::convert;
pub use document::{DocumentFormat, TargetDocument};
pub use error::MergeError;
pub use loader::{load_schemas, LoadReport, LoadResult, LoadedSchema, SchemaBundle};
pub use merge::{merge, MergeReport};
pub use pipeline::{sync, SyncOutcome};
