//! Value types exchanged with the disassembly database.
//!
//! These mirror what a disassembly database reports about a binary:
//! function ranges, segments, cross-references, stack frames and import
//! tables. They are plain data; all queries go through
//! [`crate::backends::DisassemblyDatabase`].

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Address range `[start, end)` of a function known to the database.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionRange {
    pub start: u64,
    pub end: u64,
}

impl FunctionRange {
    pub fn new(start: u64, end: u64) -> Self {
        Self { start, end }
    }

    /// True if `address` lies inside the function body.
    pub fn contains(&self, address: u64) -> bool {
        address >= self.start && address < self.end
    }

    pub fn size(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }
}

bitflags! {
    /// Segment access permissions.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct SegmentPermissions: u8 {
        const EXEC = 0b001;
        const WRITE = 0b010;
        const READ = 0b100;
    }
}

/// A segment of the binary's address space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub name: String,
    pub start: u64,
    pub end: u64,
    pub permissions: SegmentPermissions,
}

impl Segment {
    pub fn new(
        name: impl Into<String>,
        start: u64,
        end: u64,
        permissions: SegmentPermissions,
    ) -> Self {
        Self { name: name.into(), start, end, permissions }
    }

    pub fn contains(&self, address: u64) -> bool {
        address >= self.start && address < self.end
    }
}

/// Kind of an incoming cross-reference.
///
/// Code references come first in the database's enumeration order, followed by
/// data references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum XrefKind {
    /// Call to the target.
    Call,
    /// Conditional or unconditional jump to the target.
    Jump,
    /// Ordinary fall-through flow from the previous instruction.
    Flow,
    /// Data read of the target.
    DataRead,
    /// Data write to the target.
    DataWrite,
    /// Address of the target taken as an offset.
    DataOffset,
}

impl XrefKind {
    pub fn is_code(self) -> bool {
        matches!(self, XrefKind::Call | XrefKind::Jump | XrefKind::Flow)
    }
}

/// A cross-reference into some address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Xref {
    pub from: u64,
    pub kind: XrefKind,
}

impl Xref {
    pub fn new(from: u64, kind: XrefKind) -> Self {
        Self { from, kind }
    }
}

/// One member of a function's stack frame structure.
///
/// Names are stored the way the database formats structure members
/// (`frame.member`); `offset` is the member's signed offset inside the frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameMember {
    pub name: String,
    pub offset: i64,
}

impl FrameMember {
    pub fn new(name: impl Into<String>, offset: i64) -> Self {
        Self { name: name.into(), offset }
    }
}

/// Stack frame layout of a function.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    /// Size of the local variables area.
    pub size: u64,
    /// Size of the saved registers area.
    pub saved_regs: u64,
    #[serde(default)]
    pub members: Vec<FrameMember>,
}

/// One entry of an import module's name table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportEntry {
    pub address: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub ordinal: u64,
}

impl ImportEntry {
    pub fn named(address: u64, name: impl Into<String>) -> Self {
        Self { address, name: Some(name.into()), ordinal: 0 }
    }
}

/// Address space a decompiler variable lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressSpace {
    Register,
    Stack,
    Ram,
}

/// Storage location of a decompiler variable, as the decompiler models it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryLocation {
    pub space: AddressSpace,
    pub offset: u64,
    pub size: u32,
}

impl MemoryLocation {
    pub fn new(space: AddressSpace, offset: u64, size: u32) -> Self {
        Self { space, offset, size }
    }
}
