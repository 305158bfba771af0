use std::cell::RefCell;
use std::collections::BTreeMap;
use std::ops::ControlFlow;
use std::path::Path;

use crate::backends::snapshot::{DatabaseSnapshot, ImportModule, SnapshotError};
use crate::backends::DisassemblyDatabase;
use crate::model::{Frame, FunctionRange, ImportEntry, Segment, Xref};

#[derive(Debug, Clone, Default)]
struct FunctionState {
    range: FunctionRange,
    short_name: Option<String>,
    frame: Option<Frame>,
}

#[derive(Debug, Default)]
struct State {
    names: BTreeMap<u64, String>,
    functions: BTreeMap<u64, FunctionState>,
    segments: Vec<Segment>,
    xrefs: BTreeMap<u64, Vec<Xref>>,
    imports: Vec<ImportModule>,
    demangled: BTreeMap<String, String>,
    cleanups: BTreeMap<String, Option<String>>,
}

/// Disassembly database held entirely in memory.
///
/// State sits behind a `RefCell` so analyst-style edits (`set_name`,
/// `add_xref`, ...) can happen while descriptors hold a shared borrow of the
/// database, the same way a live database changes underneath its readers.
#[derive(Debug, Default)]
pub struct InMemoryDatabase {
    state: RefCell<State>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a database from an exported snapshot.
    pub fn from_snapshot(snapshot: DatabaseSnapshot) -> Self {
        let mut state = State {
            segments: snapshot.segments,
            imports: snapshot.imports,
            demangled: snapshot.demangled,
            cleanups: snapshot.cleanups,
            ..State::default()
        };
        for entry in snapshot.names {
            state.names.insert(entry.address, entry.name);
        }
        for f in snapshot.functions {
            state.functions.insert(
                f.start,
                FunctionState {
                    range: FunctionRange::new(f.start, f.end),
                    short_name: f.short_name,
                    frame: f.frame,
                },
            );
        }
        for x in snapshot.xrefs {
            state.xrefs.entry(x.to).or_default().push(Xref::new(x.from, x.kind));
        }
        Self { state: RefCell::new(state) }
    }

    /// Load a JSON or YAML snapshot from disk.
    pub fn open(path: &Path) -> Result<Self, SnapshotError> {
        Ok(Self::from_snapshot(DatabaseSnapshot::load(path)?))
    }

    /// Builder-style helper binding `name` to `address`.
    pub fn with_name(self, address: u64, name: impl Into<String>) -> Self {
        self.set_name(address, name);
        self
    }

    pub fn with_function(self, start: u64, end: u64) -> Self {
        self.state.borrow_mut().functions.insert(
            start,
            FunctionState { range: FunctionRange::new(start, end), ..FunctionState::default() },
        );
        self
    }

    /// Set the disassembler-rendered short name of an existing function.
    pub fn with_short_name(self, start: u64, short_name: impl Into<String>) -> Self {
        if let Some(f) = self.state.borrow_mut().functions.get_mut(&start) {
            f.short_name = Some(short_name.into());
        }
        self
    }

    pub fn with_frame(self, start: u64, frame: Frame) -> Self {
        if let Some(f) = self.state.borrow_mut().functions.get_mut(&start) {
            f.frame = Some(frame);
        }
        self
    }

    pub fn with_segment(self, segment: Segment) -> Self {
        self.state.borrow_mut().segments.push(segment);
        self
    }

    pub fn with_xref(self, to: u64, xref: Xref) -> Self {
        self.add_xref(to, xref);
        self
    }

    pub fn with_import_module(
        self,
        name: impl Into<String>,
        entries: impl IntoIterator<Item = ImportEntry>,
    ) -> Self {
        self.state
            .borrow_mut()
            .imports
            .push(ImportModule { name: name.into(), entries: entries.into_iter().collect() });
        self
    }

    pub fn with_demangling(self, mangled: impl Into<String>, demangled: impl Into<String>) -> Self {
        self.state.borrow_mut().demangled.insert(mangled.into(), demangled.into());
        self
    }

    /// Record the cleanup result for `name`; `None` makes cleanup fail.
    pub fn with_cleanup(self, name: impl Into<String>, cleaned: Option<String>) -> Self {
        self.state.borrow_mut().cleanups.insert(name.into(), cleaned);
        self
    }

    /// Rename (or name) an address in place.
    pub fn set_name(&self, address: u64, name: impl Into<String>) {
        self.state.borrow_mut().names.insert(address, name.into());
    }

    /// Append an incoming cross-reference to `to`.
    pub fn add_xref(&self, to: u64, xref: Xref) {
        self.state.borrow_mut().xrefs.entry(to).or_default().push(xref);
    }
}

impl DisassemblyDatabase for InMemoryDatabase {
    fn name_at(&self, address: u64) -> Option<String> {
        self.state.borrow().names.get(&address).cloned()
    }

    fn function_containing(&self, address: u64) -> Option<FunctionRange> {
        let state = self.state.borrow();
        let (_, f) = state.functions.range(..=address).next_back()?;
        // Zero-sized functions still own their entry address.
        if f.range.contains(address) || f.range.start == address {
            Some(f.range)
        } else {
            None
        }
    }

    fn short_name(&self, address: u64) -> Option<String> {
        let explicit =
            self.state.borrow().functions.get(&address).and_then(|f| f.short_name.clone());
        if explicit.is_some() {
            return explicit;
        }
        let name = self.name_at(address)?;
        Some(self.demangle_name(&name, 0).unwrap_or(name))
    }

    fn cleanup_name(&self, _address: u64, name: &str) -> Option<String> {
        match self.state.borrow().cleanups.get(name) {
            Some(cleaned) => cleaned.clone(),
            None => Some(name.to_string()),
        }
    }

    fn demangle_name(&self, name: &str, _flags: u32) -> Option<String> {
        if let Some(d) = self.state.borrow().demangled.get(name) {
            return Some(d.clone());
        }
        rustc_demangle::try_demangle(name).ok().map(|d| format!("{d:#}"))
    }

    fn segment_at(&self, address: u64) -> Option<Segment> {
        self.state.borrow().segments.iter().find(|s| s.contains(address)).cloned()
    }

    fn xrefs_to(&self, address: u64) -> Vec<Xref> {
        self.state.borrow().xrefs.get(&address).cloned().unwrap_or_default()
    }

    fn import_module_count(&self) -> usize {
        self.state.borrow().imports.len()
    }

    fn enum_import_names(
        &self,
        module: usize,
        visitor: &mut dyn FnMut(&ImportEntry) -> ControlFlow<()>,
    ) -> ControlFlow<()> {
        let state = self.state.borrow();
        let Some(module) = state.imports.get(module) else {
            return ControlFlow::Continue(());
        };
        for entry in &module.entries {
            if visitor(entry).is_break() {
                return ControlFlow::Break(());
            }
        }
        ControlFlow::Continue(())
    }

    fn frame(&self, function: &FunctionRange) -> Option<Frame> {
        self.state.borrow().functions.get(&function.start).and_then(|f| f.frame.clone())
    }
}
