//! Document arguments: a file path or the JSON text itself.

use anyhow::{Context, Result};
use serde::Serialize;

/// Inline JSON when the argument starts with `{` or `[`, else a file path.
pub fn document(arg: &str) -> Result<String> {
    let trimmed = arg.trim_start();
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        return Ok(arg.to_string());
    }
    std::fs::read_to_string(arg).with_context(|| format!("read '{arg}'"))
}

/// Pretty JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
