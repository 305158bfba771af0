use std::fmt;

use log::{debug, warn};

use crate::db::{AnnotationKey, AnnotationStore};
use crate::model::MemoryLocation;
use crate::symbols::descriptor::SymbolDescriptor;
use crate::symbols::error::SymbolResult;
use crate::types::{decode_type, TypeDescriptor, TypeRecord, TypeSystem};

/// A symbol known to be a function entry point.
///
/// Adds stack-frame variable lookup and accessors for the register-variable
/// names and types persisted in the annotation store. Nothing is cached: frame
/// members are read from the database and annotations from the store on every
/// call.
pub struct FunctionSymbolDescriptor<'a> {
    symbol: SymbolDescriptor<'a>,
    store: &'a dyn AnnotationStore,
    types: &'a dyn TypeSystem,
}

impl fmt::Debug for FunctionSymbolDescriptor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionSymbolDescriptor").field("symbol", &self.symbol).finish()
    }
}

impl<'a> FunctionSymbolDescriptor<'a> {
    /// Wrap `symbol`, which must sit on a function entry.
    pub fn new(
        symbol: SymbolDescriptor<'a>,
        store: &'a dyn AnnotationStore,
        types: &'a dyn TypeSystem,
    ) -> Self {
        debug_assert!(symbol.is_function(), "{:#x} is not a function entry", symbol.address());
        Self { symbol, store, types }
    }

    pub fn symbol(&self) -> &SymbolDescriptor<'a> {
        &self.symbol
    }

    /// Entry address of the function.
    pub fn address(&self) -> u64 {
        self.symbol.address()
    }

    /// Function name as cleaned by the factory.
    pub fn name(&self) -> &str {
        self.symbol.raw_name()
    }

    /// Name of the frame member at stack `offset`.
    ///
    /// Offsets are relative to the return address, i.e. a member's frame
    /// offset minus the locals and saved-register areas. With `addr_size == 4`
    /// only the low 32 bits have to agree, which absorbs offsets that were
    /// truncated to 32 bits on the decompiler side.
    pub fn find_stack_var(&self, offset: u64, addr_size: u32) -> Option<String> {
        let db = self.symbol.database();
        let function = db.function_containing(self.address())?;
        let frame = db.frame(&function)?;
        let base = frame.size.wrapping_add(frame.saved_regs) as i64;

        frame
            .members
            .iter()
            .find(|member| {
                let computed = member.offset.wrapping_sub(base) as u64;
                computed == offset || (addr_size == 4 && computed as u32 == offset as u32)
            })
            .map(|member| match member.name.split_once('.') {
                Some((_, field)) => field.to_string(),
                None => member.name.clone(),
            })
    }

    /// Persisted display name of register variable `name`.
    pub fn find_reg_var(&self, name: &str) -> SymbolResult<Option<String>> {
        let key = AnnotationKey::reg_var(self.address(), name);
        Ok(self.store.find(&key)?.filter(|v| !v.is_empty()))
    }

    pub fn save_reg_var(&self, name: &str, value: &str) -> SymbolResult<()> {
        let key = AnnotationKey::reg_var(self.address(), name);
        self.store.save(&key, value)?;
        Ok(())
    }

    /// Persisted type of variable `name`.
    ///
    /// Records that can no longer be decoded are reported and read as absent.
    pub fn find_symbol_type(&self, name: &str) -> SymbolResult<Option<TypeDescriptor>> {
        let key = AnnotationKey::symbol_type(self.address(), name);
        let Some(value) = self.store.find(&key)? else {
            return Ok(None);
        };
        match decode_type(&value, self.types) {
            Ok(ty) => Ok(ty),
            Err(err) => {
                warn!("ignoring undecodable type annotation {key}: {err}");
                Ok(None)
            }
        }
    }

    /// Persist the type of variable `name`. `location` does not take part in the key.
    pub fn save_symbol_type(
        &self,
        name: &str,
        ty: &TypeDescriptor,
        location: &MemoryLocation,
    ) -> SymbolResult<()> {
        let key = AnnotationKey::symbol_type(self.address(), name);
        let encoded = TypeRecord::new(ty, self.types).encode()?;
        debug!("saving type {ty} for {key} at {location:?}");
        self.store.save(&key, &encoded)?;
        Ok(())
    }
}
