//! Decompiler type descriptors and their persisted form.
//!
//! The decompiler's type system is an external collaborator reached through
//! [`TypeSystem`]: it parses declaration strings and renders type names.
//! Persisted types are stored as a versioned [`TypeRecord`] carrying the full
//! structure, so anonymous and compound types round-trip exactly. Values that
//! are not records are treated as legacy declaration strings and handed to the
//! declaration parser.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

mod c_decl;

pub use c_decl::CTypeSystem;

/// Current version of the persisted type record format.
pub const TYPE_RECORD_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum TypeError {
    #[error("Failed to encode/decode type record: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Unsupported type record version {found}; this build reads version {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },
}

/// A field of a structure type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructField {
    pub name: String,
    pub offset: u64,
    pub ty: TypeDescriptor,
}

/// A type as the decompiler sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeDescriptor {
    Void,
    Bool,
    Int { bits: u8, signed: bool },
    Float { bits: u8 },
    Pointer { pointee: Box<TypeDescriptor> },
    Array { element: Box<TypeDescriptor>, len: u64 },
    /// A type referenced by name only (typedef, named struct, enum...).
    Named { name: String },
    Struct {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        #[serde(default)]
        fields: Vec<StructField>,
    },
    Function {
        ret: Box<TypeDescriptor>,
        #[serde(default)]
        params: Vec<TypeDescriptor>,
    },
}

impl TypeDescriptor {
    pub fn int(bits: u8, signed: bool) -> Self {
        TypeDescriptor::Int { bits, signed }
    }

    pub fn named(name: impl Into<String>) -> Self {
        TypeDescriptor::Named { name: name.into() }
    }

    pub fn pointer_to(pointee: TypeDescriptor) -> Self {
        TypeDescriptor::Pointer { pointee: Box::new(pointee) }
    }

    pub fn array_of(element: TypeDescriptor, len: u64) -> Self {
        TypeDescriptor::Array { element: Box::new(element), len }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::Void => f.write_str("void"),
            TypeDescriptor::Bool => f.write_str("bool"),
            TypeDescriptor::Int { bits, signed: true } => write!(f, "int{bits}_t"),
            TypeDescriptor::Int { bits, signed: false } => write!(f, "uint{bits}_t"),
            TypeDescriptor::Float { bits: 32 } => f.write_str("float"),
            TypeDescriptor::Float { bits: 64 } => f.write_str("double"),
            TypeDescriptor::Float { bits: 80 } => f.write_str("long double"),
            TypeDescriptor::Float { bits } => write!(f, "float{bits}_t"),
            TypeDescriptor::Pointer { pointee } => match **pointee {
                TypeDescriptor::Pointer { .. } => write!(f, "{pointee}*"),
                _ => write!(f, "{pointee} *"),
            },
            TypeDescriptor::Array { .. } => {
                // Outermost dimension is written first, as in C.
                let mut dims = Vec::new();
                let mut inner = self;
                while let TypeDescriptor::Array { element, len } = inner {
                    dims.push(*len);
                    inner = &**element;
                }
                write!(f, "{inner}")?;
                for len in dims {
                    write!(f, "[{len}]")?;
                }
                Ok(())
            }
            TypeDescriptor::Named { name } => f.write_str(name),
            TypeDescriptor::Struct { name: Some(name), .. } => write!(f, "struct {name}"),
            TypeDescriptor::Struct { name: None, .. } => f.write_str("struct <anonymous>"),
            TypeDescriptor::Function { ret, params } => {
                write!(f, "{ret}(")?;
                for (i, p) in params.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{p}")?;
                }
                f.write_str(")")
            }
        }
    }
}

/// Declaration parser and type-name serializer of the decompiler's type system.
pub trait TypeSystem {
    /// Parse a declaration string (e.g. `unsigned int *`) into a type.
    fn parse_declaration(&self, decl: &str) -> Option<TypeDescriptor>;

    /// Canonical display name of `ty`.
    fn type_name(&self, ty: &TypeDescriptor) -> String {
        ty.to_string()
    }
}

/// Persisted form of a type annotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeRecord {
    pub version: u32,
    /// Display name at save time; informational, never parsed back.
    pub name: String,
    pub ty: TypeDescriptor,
}

impl TypeRecord {
    pub fn new(ty: &TypeDescriptor, types: &dyn TypeSystem) -> Self {
        Self { version: TYPE_RECORD_VERSION, name: types.type_name(ty), ty: ty.clone() }
    }

    /// Serialize to the string stored in the annotation store.
    pub fn encode(&self) -> Result<String, TypeError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Decode a stored type value.
///
/// JSON objects must be a [`TypeRecord`] of a supported version; anything else
/// is a legacy declaration string parsed by `types`.
pub fn decode_type(
    value: &str,
    types: &dyn TypeSystem,
) -> Result<Option<TypeDescriptor>, TypeError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if !trimmed.starts_with('{') {
        return Ok(types.parse_declaration(trimmed));
    }
    let record: TypeRecord = serde_json::from_str(trimmed)?;
    if record.version != TYPE_RECORD_VERSION {
        return Err(TypeError::UnsupportedVersion {
            found: record.version,
            supported: TYPE_RECORD_VERSION,
        });
    }
    Ok(Some(record.ty))
}
