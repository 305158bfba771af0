//! Disassembly database interface and adapters.
//!
//! The disassembly database is the system of record for a binary's names,
//! functions, segments, cross-references, frames and import tables. This
//! crate only reads from it, through [`DisassemblyDatabase`].
//!
//! Adapters:
//! - [`InMemoryDatabase`]: built programmatically or from a [`DatabaseSnapshot`]
//!   exported by a disassembler (JSON or YAML).

use std::ops::ControlFlow;

use crate::model::{Frame, FunctionRange, ImportEntry, Segment, Xref};

pub mod memory;
pub mod snapshot;

pub use memory::InMemoryDatabase;
pub use snapshot::{
    DatabaseSnapshot, FunctionEntry, ImportModule, NameEntry, SnapshotError, XrefEntry,
};

/// Read-only query interface of a disassembly database.
///
/// Every method reflects the database's state at call time; callers must not
/// assume two calls observe the same state. Absence is reported as `None`
/// (or an empty collection), never as an error.
pub trait DisassemblyDatabase {
    /// Name bound to exactly `address`, if any.
    fn name_at(&self, address: u64) -> Option<String>;

    /// Function whose body contains `address`.
    fn function_containing(&self, address: u64) -> Option<FunctionRange>;

    /// Short display name of the symbol at `address`, as the database's own
    /// formatter renders it (may carry a return type and parameter list).
    fn short_name(&self, address: u64) -> Option<String>;

    /// Cleaned-up form of `name` as bound at `address`. `None` if cleanup fails.
    fn cleanup_name(&self, address: u64, name: &str) -> Option<String>;

    /// Demangled form of `name` under the given demangler flag set.
    fn demangle_name(&self, name: &str, flags: u32) -> Option<String>;

    /// Segment containing `address`.
    fn segment_at(&self, address: u64) -> Option<Segment>;

    /// Incoming cross-references to `address`, code references first.
    fn xrefs_to(&self, address: u64) -> Vec<Xref>;

    /// Number of import modules.
    fn import_module_count(&self) -> usize;

    /// Visit the name table of import module `module` in table order.
    ///
    /// Returns `ControlFlow::Break` if the visitor stopped the enumeration,
    /// `ControlFlow::Continue` if it ran to completion or the module does not exist.
    fn enum_import_names(
        &self,
        module: usize,
        visitor: &mut dyn FnMut(&ImportEntry) -> ControlFlow<()>,
    ) -> ControlFlow<()>;

    /// Stack frame layout of `function`, if the database has one.
    fn frame(&self, function: &FunctionRange) -> Option<Frame>;
}
