use thiserror::Error;

use crate::db::StoreError;
use crate::types::TypeError;

/// Errors raised by symbol descriptor operations.
///
/// "Not found" is never an error here; lookups return `None` instead.
#[derive(Debug, Error)]
pub enum SymbolError {
    /// A function-only query was made on an address that is not a function entry.
    #[error("Symbol '{0}' is not a function")]
    SymbolIsNotAFunction(String),

    /// The annotation store failed; surfaced unchanged.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A type annotation could not be encoded.
    #[error(transparent)]
    Type(#[from] TypeError),
}

pub type SymbolResult<T> = Result<T, SymbolError>;
