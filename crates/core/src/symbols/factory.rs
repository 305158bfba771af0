use log::debug;

use crate::backends::DisassemblyDatabase;
use crate::db::AnnotationStore;
use crate::symbols::descriptor::{SymbolDescriptor, DEFAULT_FUNCTION_PREFIX};
use crate::symbols::function::FunctionSymbolDescriptor;
use crate::symbols::truncate_at_paren;
use crate::types::TypeSystem;

/// Entry point turning raw addresses into symbol descriptors.
#[derive(Clone, Copy)]
pub struct SymbolResolutionFactory<'a> {
    db: &'a dyn DisassemblyDatabase,
    store: &'a dyn AnnotationStore,
    types: &'a dyn TypeSystem,
}

impl<'a> SymbolResolutionFactory<'a> {
    pub fn new(
        db: &'a dyn DisassemblyDatabase,
        store: &'a dyn AnnotationStore,
        types: &'a dyn TypeSystem,
    ) -> Self {
        Self { db, store, types }
    }

    /// Descriptor for the name bound to `address`; `None` if it has no (or an empty) name.
    pub fn resolve(&self, address: u64) -> Option<SymbolDescriptor<'a>> {
        match self.db.name_at(address) {
            Some(name) if !name.is_empty() => Some(SymbolDescriptor::new(self.db, address, name)),
            _ => {
                debug!("no name at {address:#x}");
                None
            }
        }
    }

    /// Descriptor for the function containing `address`, anchored at its entry.
    ///
    /// The name is the last whitespace-separated token of the short display
    /// name before any parameter list, which drops return types and storage
    /// classes the database prepends. When that leaves nothing, the raw name
    /// at the entry is used, then the default `sub_<ADDR>` name.
    pub fn resolve_function(&self, address: u64) -> Option<FunctionSymbolDescriptor<'a>> {
        let Some(function) = self.db.function_containing(address) else {
            debug!("no function contains {address:#x}");
            return None;
        };

        let short = self.db.short_name(function.start).unwrap_or_default();
        let name = match function_name_token(&short) {
            Some(token) => token.to_string(),
            None => self
                .db
                .name_at(function.start)
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| format!("{DEFAULT_FUNCTION_PREFIX}{:X}", function.start)),
        };
        debug!("resolved {address:#x} to function {name} at {:#x}", function.start);

        let symbol = SymbolDescriptor::new(self.db, function.start, name);
        Some(FunctionSymbolDescriptor::new(symbol, self.store, self.types))
    }
}

/// Last whitespace-separated token before the first `(`.
pub(crate) fn function_name_token(short_name: &str) -> Option<&str> {
    truncate_at_paren(short_name).split_whitespace().last()
}
