use anyhow::{anyhow, Result};
use serde::Serialize;
use symbridge_core::symbols::SymbolDescriptor;

use crate::commands::{open_project, require_function};

/// Everything the bridge derives for one address.
#[derive(Debug, Serialize)]
pub struct SymbolInfo {
    pub address: String,
    pub raw_name: String,
    pub name: String,
    pub is_function: bool,
    pub is_import: bool,
    pub is_label: bool,
    pub is_read_only: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_size: Option<u64>,
}

impl SymbolInfo {
    pub fn from_descriptor(symbol: &SymbolDescriptor<'_>) -> Self {
        let is_function = symbol.is_function();
        Self {
            address: format!("{:#x}", symbol.address()),
            raw_name: symbol.raw_name().to_string(),
            name: symbol.name(),
            is_function,
            is_import: symbol.is_import(),
            is_label: symbol.is_label(),
            is_read_only: symbol.is_read_only(),
            function_size: if is_function { symbol.function_size().ok() } else { None },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FunctionInfo {
    pub entry: String,
    pub name: String,
    pub canonical_name: String,
    pub size: u64,
}

/// Resolve the symbol named at `address` and print its classification.
pub fn resolve_command(root: &str, address: u64, json: bool) -> Result<()> {
    let ctx = open_project(root)?;
    let symbol = ctx
        .factory()
        .resolve(address)
        .ok_or_else(|| anyhow!("No symbol is named at address {:#x}", address))?;
    let info = SymbolInfo::from_descriptor(&symbol);

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("Symbol at {}:", info.address);
    println!("  Raw name: {}", info.raw_name);
    println!("  Name: {}", info.name);
    println!("  Function: {}", info.is_function);
    println!("  Import: {}", info.is_import);
    println!("  Label: {}", info.is_label);
    println!("  Read-only: {}", info.is_read_only);
    if let Some(size) = info.function_size {
        println!("  Function size: {}", size);
    }
    Ok(())
}

/// Resolve the function containing `address`.
pub fn resolve_function_command(root: &str, address: u64, json: bool) -> Result<()> {
    let ctx = open_project(root)?;
    let function = require_function(&ctx, address)?;
    let info = FunctionInfo {
        entry: format!("{:#x}", function.address()),
        name: function.name().to_string(),
        canonical_name: function.symbol().name(),
        size: function.symbol().function_size()?,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("Function containing {:#x}:", address);
    println!("  Entry: {}", info.entry);
    println!("  Name: {}", info.name);
    println!("  Canonical name: {}", info.canonical_name);
    println!("  Size: {}", info.size);
    Ok(())
}

/// Look up the stack variable at `offset` in the function containing `function`.
pub fn stack_var_command(root: &str, function: u64, offset: u64, addr_size: u32) -> Result<()> {
    let ctx = open_project(root)?;
    let func = require_function(&ctx, function)?;
    match func.find_stack_var(offset, addr_size) {
        Some(name) => println!("{}", name),
        None => {
            return Err(anyhow!(
                "No stack variable at offset {:#x} in {} ({:#x})",
                offset,
                func.name(),
                func.address()
            ))
        }
    }
    Ok(())
}
