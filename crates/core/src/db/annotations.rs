use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for annotation store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying SQLite error.
    #[error("SQLite error: {0}")]
    Sql(#[from] rusqlite::Error),

    /// The store was created with a newer schema version than we support.
    #[error(
        "Unsupported schema version {found}; supported range is {min_supported}..={max_supported}"
    )]
    UnsupportedSchemaVersion { found: i32, min_supported: i32, max_supported: i32 },

    /// A persisted key does not follow `<hex-address>.<category>.<name>`.
    #[error("Invalid annotation key '{0}'")]
    InvalidKey(String),
}

/// Convenience result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Namespace of an annotation record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationCategory {
    /// Display name of a register-resident variable.
    RegVar,
    /// Serialized type of a variable.
    Type,
}

impl AnnotationCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            AnnotationCategory::RegVar => "regvar",
            AnnotationCategory::Type => "type",
        }
    }
}

impl FromStr for AnnotationCategory {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "regvar" => Ok(AnnotationCategory::RegVar),
            "type" => Ok(AnnotationCategory::Type),
            other => Err(StoreError::InvalidKey(format!("unknown category '{other}'"))),
        }
    }
}

/// Key of an annotation record: `(function address, category, attribute name)`.
///
/// The string form `<hex-address>.<category>.<name>` is what gets persisted and
/// must stay stable across versions. The address is lowercase hex without a
/// prefix; the name is everything after the second `.` and may contain dots.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AnnotationKey {
    pub address: u64,
    pub category: AnnotationCategory,
    pub name: String,
}

impl AnnotationKey {
    pub fn new(address: u64, category: AnnotationCategory, name: impl Into<String>) -> Self {
        Self { address, category, name: name.into() }
    }

    pub fn reg_var(address: u64, name: impl Into<String>) -> Self {
        Self::new(address, AnnotationCategory::RegVar, name)
    }

    pub fn symbol_type(address: u64, name: impl Into<String>) -> Self {
        Self::new(address, AnnotationCategory::Type, name)
    }
}

impl fmt::Display for AnnotationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:x}.{}.{}", self.address, self.category.as_str(), self.name)
    }
}

impl FromStr for AnnotationKey {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, '.');
        let (Some(addr), Some(category), Some(name)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(StoreError::InvalidKey(s.to_string()));
        };
        if addr.is_empty() || !addr.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
        {
            return Err(StoreError::InvalidKey(s.to_string()));
        }
        let address =
            u64::from_str_radix(addr, 16).map_err(|_| StoreError::InvalidKey(s.to_string()))?;
        Ok(Self { address, category: category.parse()?, name: name.to_string() })
    }
}

/// Namespaced key/value persistence for analyst annotations.
///
/// Implementations serialize their own reads and writes; every `save` is
/// atomic on its own and overwrites any previous value for the key.
pub trait AnnotationStore {
    /// Stored value for `key`, if a record exists.
    fn find(&self, key: &AnnotationKey) -> StoreResult<Option<String>>;

    /// Create or overwrite the record for `key`.
    fn save(&self, key: &AnnotationKey, value: &str) -> StoreResult<()>;
}

/// Annotation store kept in process memory. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryAnnotationStore {
    records: RefCell<BTreeMap<String, String>>,
}

impl MemoryAnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.borrow().is_empty()
    }
}

impl AnnotationStore for MemoryAnnotationStore {
    fn find(&self, key: &AnnotationKey) -> StoreResult<Option<String>> {
        Ok(self.records.borrow().get(&key.to_string()).cloned())
    }

    fn save(&self, key: &AnnotationKey, value: &str) -> StoreResult<()> {
        self.records.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }
}
