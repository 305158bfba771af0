use std::path::Path;

use anyhow::{anyhow, Context, Result};
use symbridge_core::db::ProjectContext;
use symbridge_core::model::AddressSpace;
use symbridge_core::symbols::FunctionSymbolDescriptor;

use crate::canonicalize_or_current;

/// Helper to print whether a path exists.
pub fn print_path_status(label: &str, path: &Path) {
    let exists = path.exists();
    println!("- {label}: {} ({})", if exists { "OK" } else { "MISSING" }, path.display());
}

/// Open the project rooted at `root` (config, annotation store and database snapshot).
pub fn open_project(root: &str) -> Result<ProjectContext> {
    let root_path = canonicalize_or_current(root)?;
    ProjectContext::from_root(&root_path)
        .with_context(|| format!("Failed to open project at {}", root_path.display()))
}

/// Resolve the function containing `address` or fail with a readable error.
pub fn require_function<'a>(
    ctx: &'a ProjectContext,
    address: u64,
) -> Result<FunctionSymbolDescriptor<'a>> {
    ctx.factory()
        .resolve_function(address)
        .ok_or_else(|| anyhow!("No function contains address {:#x}", address))
}

pub fn parse_address_space(space: &str) -> Result<AddressSpace> {
    match space {
        "register" | "reg" => Ok(AddressSpace::Register),
        "stack" => Ok(AddressSpace::Stack),
        "ram" => Ok(AddressSpace::Ram),
        other => Err(anyhow!("Invalid address space '{}'. Allowed: register, stack, ram", other)),
    }
}
