//! Annotation persistence and project configuration.
//!
//! This module defines:
//! - `AnnotationKey` / `AnnotationCategory`: the stable persisted key format.
//! - `AnnotationStore`: the store interface, with SQLite and in-memory implementations.
//! - `ProjectConfig` / `ProjectLayout` / `ProjectContext`: where a project keeps its
//!   config, annotation store and database snapshot.

pub mod annotations;
pub mod config;
pub mod context;
pub mod layout;
pub mod store;
pub mod util;

pub use annotations::{
    AnnotationCategory, AnnotationKey, AnnotationStore, MemoryAnnotationStore, StoreError,
    StoreResult,
};
pub use config::{DatabaseConfig, ProjectConfig, StoreConfig};
pub use context::ProjectContext;
pub use layout::ProjectLayout;
pub use store::{AnnotationRecord, SqliteAnnotationStore, CURRENT_SCHEMA_VERSION};
pub use util::{
    database_hash_matches, load_database, load_project_config, open_annotation_store, sha256_file,
};
