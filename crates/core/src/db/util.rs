use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};

use crate::backends::InMemoryDatabase;
use crate::db::{ProjectConfig, ProjectLayout, SqliteAnnotationStore};

/// Load the project config JSON from disk for a given layout.
pub fn load_project_config(layout: &ProjectLayout) -> Result<ProjectConfig> {
    let config_json = fs::read_to_string(&layout.project_config_path).with_context(|| {
        format!("Failed to read project config at {}", layout.project_config_path.display())
    })?;
    let config: ProjectConfig =
        serde_json::from_str(&config_json).context("Failed to parse project config JSON")?;
    Ok(config)
}

/// Resolve the store path (respecting relative/absolute config) and open the annotation store.
pub fn open_annotation_store(
    layout: &ProjectLayout,
) -> Result<(ProjectConfig, PathBuf, SqliteAnnotationStore)> {
    let config = load_project_config(layout)?;
    let store_path = layout.resolve(&config.store.path);
    let store = SqliteAnnotationStore::open(&store_path)
        .with_context(|| format!("Failed to open annotation store at {}", store_path.display()))?;
    Ok((config, store_path, store))
}

/// Load the database snapshot configured for the project.
pub fn load_database(layout: &ProjectLayout, config: &ProjectConfig) -> Result<InMemoryDatabase> {
    let db_config = config
        .database
        .as_ref()
        .context("No database snapshot configured for this project (use --database at init)")?;
    let path = layout.resolve(&db_config.path);
    InMemoryDatabase::open(&path)
        .with_context(|| format!("Failed to load database snapshot at {}", path.display()))
}

/// Whether the configured snapshot still matches the hash recorded at init.
///
/// `None` when no database or no hash was recorded.
pub fn database_hash_matches(
    layout: &ProjectLayout,
    config: &ProjectConfig,
) -> Result<Option<bool>> {
    let Some(db_config) = &config.database else {
        return Ok(None);
    };
    let Some(expected) = &db_config.sha256 else {
        return Ok(None);
    };
    let actual = sha256_file(&layout.resolve(&db_config.path))?;
    Ok(Some(&actual == expected))
}

/// Compute the SHA-256 hash of a file and return it as a hex string.
pub fn sha256_file(path: &Path) -> Result<String> {
    let file = fs::File::open(path)
        .with_context(|| format!("Failed to open file for hashing: {}", path.display()))?;
    let mut reader = BufReader::new(file);
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 8192];

    loop {
        let n = reader
            .read(&mut buf)
            .with_context(|| format!("Failed to read file for hashing: {}", path.display()))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }

    let digest = hasher.finalize();
    Ok(format!("{:x}", digest))
}
