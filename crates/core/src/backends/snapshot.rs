use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{Frame, ImportEntry, Segment, XrefKind};

/// Errors raised while loading a database snapshot from disk.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Failed to read snapshot: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to parse snapshot YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Unsupported snapshot format for {0} (expected .json, .yaml or .yml)")]
    UnsupportedFormat(String),
}

/// A name bound to an address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameEntry {
    pub address: u64,
    pub name: String,
}

/// A function known to the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionEntry {
    pub start: u64,
    pub end: u64,
    /// Short display name as the disassembler renders it (e.g. `int __cdecl foo(int)`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame: Option<Frame>,
}

/// A cross-reference `from -> to`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct XrefEntry {
    pub to: u64,
    pub from: u64,
    pub kind: XrefKind,
}

/// An import module and its name table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportModule {
    pub name: String,
    #[serde(default)]
    pub entries: Vec<ImportEntry>,
}

/// Serializable export of a disassembly database.
///
/// This is what a disassembler plugin dumps so the bridge can run outside the
/// disassembler process. Cross-references keep their file order, which must
/// list code references before data references for each target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseSnapshot {
    #[serde(default)]
    pub names: Vec<NameEntry>,
    #[serde(default)]
    pub functions: Vec<FunctionEntry>,
    #[serde(default)]
    pub segments: Vec<Segment>,
    #[serde(default)]
    pub xrefs: Vec<XrefEntry>,
    #[serde(default)]
    pub imports: Vec<ImportModule>,
    /// Demangler output captured from the disassembler, keyed by mangled name.
    #[serde(default)]
    pub demangled: BTreeMap<String, String>,
    /// Name cleanup results keyed by raw name; `null` records a failed cleanup.
    #[serde(default)]
    pub cleanups: BTreeMap<String, Option<String>>,
}

impl DatabaseSnapshot {
    /// Load a snapshot, picking the parser from the file extension.
    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        let body = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()).map(|e| e.to_ascii_lowercase()) {
            Some(ext) if ext == "json" => Ok(serde_json::from_str(&body)?),
            Some(ext) if ext == "yaml" || ext == "yml" => Ok(serde_yaml::from_str(&body)?),
            _ => Err(SnapshotError::UnsupportedFormat(path.display().to_string())),
        }
    }
}
