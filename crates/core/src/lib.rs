//! symbridge-core
//!
//! Core library bridging a disassembly database and a decompiler engine.
//!
//! The disassembly database exposes symbols as addresses with raw, possibly
//! mangled or auto-generated names. The decompiler wants stable, readable
//! names and typed variables that survive across sessions. This crate:
//! - Resolves addresses into symbol descriptors and classifies them
//!   (function, import, jump label, read-only data).
//! - Canonicalizes names (cleanup, demangling, import tagging).
//! - Looks up stack-frame variables by byte offset.
//! - Persists register-variable names and inferred types in a namespaced
//!   annotation store.
//!
//! The disassembly database and the annotation store are injected as traits
//! so frontends can plug in a live database, a snapshot, or an in-memory fake.

pub mod model;
pub mod backends;
pub mod types;
pub mod db;
pub mod symbols;

/// Returns the library version as encoded at compile time.
///
/// Useful for tests and for frontends to report consistent version info.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
