use serde::{Deserialize, Serialize};

/// Location of the annotation store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path to the annotation store file (typically relative to project root).
    pub path: String,
}

impl StoreConfig {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

/// Disassembly database snapshot the project annotates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the snapshot (JSON or YAML), relative to project root or absolute.
    pub path: String,
    /// SHA-256 of the snapshot when it was attached, to detect a swapped database.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
}

/// Serializable configuration describing a symbridge project.
///
/// This lives at `.symbridge/project.json` in the project root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Human-friendly project name.
    pub name: String,
    /// Optional description / notes.
    pub description: Option<String>,
    /// Schema/config version. This is about the config format, not the store schema.
    pub config_version: String,
    /// Annotation store configuration.
    pub store: StoreConfig,
    /// Database snapshot to resolve symbols against.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<DatabaseConfig>,
}

impl ProjectConfig {
    /// Create a new project configuration using the given name and store path.
    pub fn new(name: impl Into<String>, store_path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            config_version: "0.1.0".to_string(),
            store: StoreConfig::new(store_path),
            database: None,
        }
    }

    /// Builder-style helper attaching a database snapshot.
    pub fn with_database(mut self, path: impl Into<String>, sha256: Option<String>) -> Self {
        self.database = Some(DatabaseConfig { path: path.into(), sha256 });
        self
    }
}
