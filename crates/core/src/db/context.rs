use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::backends::InMemoryDatabase;
use crate::db::{
    database_hash_matches, load_database, open_annotation_store, ProjectConfig, ProjectLayout,
    SqliteAnnotationStore,
};
use crate::symbols::SymbolResolutionFactory;
use crate::types::CTypeSystem;

/// Convenience wrapper bundling layout, config, the annotation store and the database.
#[derive(Debug)]
pub struct ProjectContext {
    pub layout: ProjectLayout,
    pub config: ProjectConfig,
    pub store_path: PathBuf,
    pub store: SqliteAnnotationStore,
    pub database: InMemoryDatabase,
    pub types: CTypeSystem,
}

impl ProjectContext {
    /// Load project config, open the store and load the database snapshot for a given root.
    pub fn from_root(root: impl AsRef<Path>) -> Result<Self> {
        let layout = ProjectLayout::new(root);
        let (config, store_path, store) = open_annotation_store(&layout)?;
        let database = load_database(&layout, &config)?;
        Ok(Self { layout, config, store_path, store, database, types: CTypeSystem })
    }

    /// Factory resolving symbols against this project's database and store.
    pub fn factory(&self) -> SymbolResolutionFactory<'_> {
        SymbolResolutionFactory::new(&self.database, &self.store, &self.types)
    }

    /// Whether the snapshot on disk still matches the hash recorded at init.
    pub fn database_hash_matches(&self) -> Result<Option<bool>> {
        database_hash_matches(&self.layout, &self.config)
    }
}
