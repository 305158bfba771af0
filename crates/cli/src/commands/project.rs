use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use symbridge_core::backends::InMemoryDatabase;
use symbridge_core::db::{
    database_hash_matches, open_annotation_store, sha256_file, ProjectConfig, ProjectLayout,
    SqliteAnnotationStore,
};

use crate::commands::print_path_status;
use crate::{canonicalize_or_current, infer_project_name};

#[derive(Serialize)]
pub struct ProjectInfoSnapshot {
    pub name: String,
    pub root: String,
    pub config_file: String,
    pub config_version: String,
    pub store_path: String,
    pub database_path: Option<String>,
    pub database_sha256: Option<String>,
    /// `None` when no hash was recorded at init.
    pub database_hash_matches: Option<bool>,
}

/// Initialize a new project at `root`, optionally attaching a database snapshot.
pub fn init_project_command(
    root: &str,
    name: Option<String>,
    database: Option<String>,
) -> Result<()> {
    let root_path = canonicalize_or_current(root)?;
    let layout = ProjectLayout::new(&root_path);

    // Derive project name if not provided.
    let project_name = match name {
        Some(n) => n,
        None => infer_project_name(&root_path),
    };

    fs::create_dir_all(&layout.meta_dir)
        .with_context(|| format!("Failed to create meta dir: {}", layout.meta_dir.display()))?;

    let mut config = ProjectConfig::new(&project_name, layout.store_path_relative_string());

    if let Some(db) = database {
        let input_path = Path::new(&db);
        let abs_path = if input_path.is_absolute() {
            input_path.to_path_buf()
        } else {
            root_path.join(input_path)
        };
        if !abs_path.is_file() {
            return Err(anyhow!("Database snapshot does not exist: {}", abs_path.display()));
        }
        // Fail early on a snapshot we cannot read back later.
        InMemoryDatabase::open(&abs_path).with_context(|| {
            format!("Failed to load database snapshot at {}", abs_path.display())
        })?;
        let hash = sha256_file(&abs_path)?;
        config = config.with_database(layout.relative_string(&abs_path), Some(hash));
    }

    // Serialize and write config JSON.
    let json = serde_json::to_string_pretty(&config)?;
    fs::write(&layout.project_config_path, json).with_context(|| {
        format!("Failed to write project config: {}", layout.project_config_path.display())
    })?;

    // Create the annotation store immediately so follow-on commands can rely on it.
    SqliteAnnotationStore::open(&layout.store_path).with_context(|| {
        format!("Failed to initialize annotation store at {}", layout.store_path.display())
    })?;

    println!("Initialized symbridge project:");
    println!("  Name: {}", project_name);
    println!("  Root: {}", layout.root.display());
    println!("  Config: {}", layout.project_config_path.display());
    println!("  Store path (relative): {}", config.store.path);
    match &config.database {
        Some(db) => println!("  Database: {}", db.path),
        None => println!("  Database: (none)"),
    }

    Ok(())
}

/// Show basic information about an existing project.
pub fn project_info_command(root: &str, json: bool) -> Result<()> {
    let root_path = canonicalize_or_current(root)?;
    let layout = ProjectLayout::new(&root_path);
    let (config, store_path, _store) = open_annotation_store(&layout)?;
    let hash_matches = database_hash_matches(&layout, &config)?;

    if json {
        let snapshot = ProjectInfoSnapshot {
            name: config.name.clone(),
            root: layout.root.display().to_string(),
            config_file: layout.project_config_path.display().to_string(),
            config_version: config.config_version.clone(),
            store_path: config.store.path.clone(),
            database_path: config.database.as_ref().map(|d| d.path.clone()),
            database_sha256: config.database.as_ref().and_then(|d| d.sha256.clone()),
            database_hash_matches: hash_matches,
        };
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    println!("symbridge Project Info");
    println!("======================");
    println!("Name: {}", config.name);
    println!("Root: {}", layout.root.display());
    println!("Config file: {}", layout.project_config_path.display());
    println!("Config version: {}", config.config_version);
    println!("Store path (config): {}", config.store.path);
    if let Some(db) = &config.database {
        println!("Database (config): {}", db.path);
    }
    match hash_matches {
        Some(true) => println!("Database hash: OK"),
        Some(false) => println!("Database hash: CHANGED since init; annotations may be stale"),
        None => println!("Database hash: (not recorded)"),
    }
    println!();

    println!("Paths:");
    print_path_status("Meta dir (.symbridge)", &layout.meta_dir);
    print_path_status("Annotation store", &store_path);
    if let Some(db) = &config.database {
        print_path_status("Database snapshot", &layout.resolve(&db.path));
    }

    Ok(())
}
