//! Symbol resolution, classification and naming.
//!
//! - [`SymbolResolutionFactory`] resolves addresses.
//! - [`SymbolDescriptor`] classifies one address and computes its canonical name.
//! - [`FunctionSymbolDescriptor`] adds frame lookup and persisted annotations
//!   for function entries.

pub mod descriptor;
pub mod error;
pub mod factory;
pub mod function;

pub use descriptor::{
    SymbolDescriptor, DEFAULT_FUNCTION_PREFIX, DEMANGLE_COMPAT_FLAGS, IMPORT_PREFIX,
};
pub use error::{SymbolError, SymbolResult};
pub use factory::SymbolResolutionFactory;
pub use function::FunctionSymbolDescriptor;

/// Part of `name` before the first `(`.
pub(crate) fn truncate_at_paren(name: &str) -> &str {
    name.split_once('(').map_or(name, |(head, _)| head)
}
