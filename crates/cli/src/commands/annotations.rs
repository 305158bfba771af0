use anyhow::{anyhow, Context, Result};
use symbridge_core::model::MemoryLocation;
use symbridge_core::types::TypeSystem;

use crate::commands::{open_project, parse_address_space, require_function};

/// Persist a register variable name for the function containing `function`.
pub fn set_regvar_command(root: &str, function: u64, name: &str, value: &str) -> Result<()> {
    let ctx = open_project(root)?;
    let func = require_function(&ctx, function)?;
    func.save_reg_var(name, value).context("Failed to save register variable")?;
    println!(
        "Saved register variable {} = {} in {} ({:#x})",
        name,
        value,
        func.name(),
        func.address()
    );
    Ok(())
}

pub fn get_regvar_command(root: &str, function: u64, name: &str) -> Result<()> {
    let ctx = open_project(root)?;
    let func = require_function(&ctx, function)?;
    let value = func
        .find_reg_var(name)
        .context("Failed to read register variable")?
        .ok_or_else(|| anyhow!("No register variable '{}' recorded for {}", name, func.name()))?;
    println!("{}", value);
    Ok(())
}

/// Parse `decl` with the project's type system and persist it for variable `name`.
pub fn set_type_command(
    root: &str,
    function: u64,
    name: &str,
    decl: &str,
    space: &str,
    offset: u64,
) -> Result<()> {
    let ctx = open_project(root)?;
    let func = require_function(&ctx, function)?;
    let ty = ctx
        .types
        .parse_declaration(decl)
        .ok_or_else(|| anyhow!("Could not parse type declaration '{}'", decl))?;
    let location = MemoryLocation::new(parse_address_space(space)?, offset, 0);
    func.save_symbol_type(name, &ty, &location).context("Failed to save symbol type")?;
    println!("Saved type {} for {} in {} ({:#x})", ty, name, func.name(), func.address());
    Ok(())
}

pub fn get_type_command(root: &str, function: u64, name: &str, json: bool) -> Result<()> {
    let ctx = open_project(root)?;
    let func = require_function(&ctx, function)?;
    let ty = func
        .find_symbol_type(name)
        .context("Failed to read symbol type")?
        .ok_or_else(|| anyhow!("No type recorded for '{}' in {}", name, func.name()))?;
    if json {
        println!("{}", serde_json::to_string_pretty(&ty)?);
    } else {
        println!("{}", ctx.types.type_name(&ty));
    }
    Ok(())
}

/// List every annotation stored for the function containing `function`.
pub fn list_annotations_command(root: &str, function: u64, json: bool) -> Result<()> {
    let ctx = open_project(root)?;
    let func = require_function(&ctx, function)?;
    let records = ctx.store.list_for_address(func.address()).context("Failed to list annotations")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    println!("Annotations for {} ({:#x}) ({}):", func.name(), func.address(), records.len());
    if records.is_empty() {
        println!("  (none)");
        return Ok(());
    }
    for record in records {
        println!("  - [{}] {} = {}", record.category.as_str(), record.name, record.value);
    }
    Ok(())
}
