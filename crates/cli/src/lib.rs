use std::env;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};

pub mod commands;

/// Canonicalize the root path if possible, falling back to the given string
/// relative to the current working directory.
pub fn canonicalize_or_current(root: &str) -> Result<PathBuf> {
    let path = Path::new(root);
    if path == Path::new(".") {
        Ok(env::current_dir().context("Failed to get current directory")?)
    } else {
        // Try to canonicalize; if it fails (e.g., path does not yet exist),
        // join it with the current dir to get an absolute path.
        match path.canonicalize() {
            Ok(p) => Ok(p),
            Err(_) => {
                let cwd = env::current_dir().context("Failed to get current directory")?;
                Ok(cwd.join(path))
            }
        }
    }
}

/// Infer a project name from the root path.
///
/// If the root has no final component (e.g., `/`), fallback to `unnamed-project`.
pub fn infer_project_name(root: &Path) -> String {
    root.file_name().and_then(|os_str| os_str.to_str()).unwrap_or("unnamed-project").to_string()
}

/// Parse an address given as `0x`-prefixed hex or decimal.
pub fn parse_address(input: &str) -> Result<u64> {
    let trimmed = input.trim();
    let parsed = match trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => trimmed.parse::<u64>(),
    };
    parsed.map_err(|_| anyhow!("Invalid address '{}': expected 0x-prefixed hex or decimal", input))
}

/// Parse a stack offset; negative values wrap to their two's complement.
pub fn parse_offset(input: &str) -> Result<u64> {
    let trimmed = input.trim();
    match trimmed.strip_prefix('-') {
        Some(magnitude) => {
            let value = parse_address(magnitude)
                .map_err(|_| anyhow!("Invalid offset '{}'", input))?;
            Ok(value.wrapping_neg())
        }
        None => parse_address(trimmed).map_err(|_| anyhow!("Invalid offset '{}'", input)),
    }
}
