use std::fmt;
use std::ops::ControlFlow;

use crate::backends::DisassemblyDatabase;
use crate::model::{ImportEntry, SegmentPermissions, XrefKind};
use crate::symbols::error::{SymbolError, SymbolResult};
use crate::symbols::truncate_at_paren;

/// Marker the disassembler puts in front of import names.
pub const IMPORT_PREFIX: &str = "__imp_";

/// Prefix of the disassembler's auto-generated function names.
pub const DEFAULT_FUNCTION_PREFIX: &str = "sub_";

/// Demangler flag set used for canonical names.
pub const DEMANGLE_COMPAT_FLAGS: u32 = 0x0EA3_BE67;

/// Segment name treated as read-only regardless of its permissions.
const ASSUMED_READ_ONLY_SEGMENT: &str = ".data";

/// View of one named address in the disassembly database.
///
/// Only `address` and `raw_name` are fixed at construction. Every predicate and
/// the canonical name are re-derived from the database on each call, so they
/// follow renames and re-analysis done after the descriptor was created.
#[derive(Clone)]
pub struct SymbolDescriptor<'a> {
    db: &'a dyn DisassemblyDatabase,
    address: u64,
    raw_name: String,
}

impl fmt::Debug for SymbolDescriptor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SymbolDescriptor")
            .field("address", &format_args!("{:#x}", self.address))
            .field("raw_name", &self.raw_name)
            .finish()
    }
}

impl<'a> SymbolDescriptor<'a> {
    pub fn new(db: &'a dyn DisassemblyDatabase, address: u64, raw_name: impl Into<String>) -> Self {
        Self { db, address, raw_name: raw_name.into() }
    }

    pub fn address(&self) -> u64 {
        self.address
    }

    /// Name as the database reported it when this descriptor was built.
    pub fn raw_name(&self) -> &str {
        &self.raw_name
    }

    pub(crate) fn database(&self) -> &'a dyn DisassemblyDatabase {
        self.db
    }

    /// True iff a function starts exactly at this address.
    pub fn is_function(&self) -> bool {
        self.db.function_containing(self.address).is_some_and(|f| f.start == self.address)
    }

    /// True iff the symbol's current name appears in any import module's name table.
    pub fn is_import(&self) -> bool {
        let current = self
            .db
            .name_at(self.address)
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| self.raw_name.clone());
        is_import_name(self.db, &current)
    }

    /// True iff some jump targets this address.
    ///
    /// Scans incoming references in database order and stops at the first data
    /// reference; calls and fall-through flow do not make a label.
    pub fn is_label(&self) -> bool {
        for xref in self.db.xrefs_to(self.address) {
            if !xref.kind.is_code() {
                break;
            }
            if xref.kind == XrefKind::Jump {
                return true;
            }
        }
        false
    }

    /// True iff the containing segment is `.data`, or is mapped exactly `R` or `R|X`.
    pub fn is_read_only(&self) -> bool {
        let Some(segment) = self.db.segment_at(self.address) else {
            return false;
        };
        if segment.name == ASSUMED_READ_ONLY_SEGMENT {
            return true;
        }
        segment.permissions == SegmentPermissions::READ
            || segment.permissions == SegmentPermissions::READ | SegmentPermissions::EXEC
    }

    /// Size in bytes of the function starting at this address.
    pub fn function_size(&self) -> SymbolResult<u64> {
        match self.db.function_containing(self.address) {
            Some(f) if f.start == self.address => Ok(f.size()),
            _ => Err(SymbolError::SymbolIsNotAFunction(self.raw_name.clone())),
        }
    }

    /// Canonical display name: cleaned up, demangled without parameter list,
    /// and tagged with [`IMPORT_PREFIX`] when the symbol is an import.
    pub fn name(&self) -> String {
        let mut name = if self.raw_name.starts_with(DEFAULT_FUNCTION_PREFIX) {
            self.raw_name.clone()
        } else {
            self.db
                .cleanup_name(self.address, &self.raw_name)
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| self.raw_name.clone())
        };

        if let Some(demangled) =
            self.db.demangle_name(&name, DEMANGLE_COMPAT_FLAGS).filter(|d| !d.is_empty())
        {
            let short = truncate_at_paren(&demangled);
            if !short.is_empty() {
                name = short.to_string();
            }
        }

        if self.is_import() && !name.starts_with(IMPORT_PREFIX) {
            return format!("{IMPORT_PREFIX}{name}");
        }
        name
    }
}

/// Whether `name` (with any import marker stripped) is in an import table.
pub(crate) fn is_import_name(db: &dyn DisassemblyDatabase, name: &str) -> bool {
    let target = match name.strip_prefix(IMPORT_PREFIX) {
        Some(stripped) if !stripped.is_empty() => stripped,
        _ => name,
    };

    (0..db.import_module_count()).any(|module| {
        db.enum_import_names(module, &mut |entry: &ImportEntry| {
            if entry.name.as_deref() == Some(target) {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        })
        .is_break()
    })
}
