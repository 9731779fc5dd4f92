use super::read_source;
use bunsenite_core::{Error, Result};
use bunsenite_ffi_bridge::NickelBridge;
use std::path::Path;

pub fn execute(bridge: &NickelBridge, file: &Path, pretty: bool) -> Result<()> {
    let value = evaluate(bridge, file)?;
    println!("{}", render(&value, pretty)?);
    Ok(())
}

/// Reads and evaluates a Nickel file, treating rejection as an error
pub(crate) fn evaluate(bridge: &NickelBridge, file: &Path) -> Result<serde_json::Value> {
    let (source, name) = read_source(file)?;
    tracing::debug!(file = %file.display(), "evaluating Nickel file");

    bridge
        .parse_json(&source, &name)?
        .ok_or_else(|| Error::invalid_source(file.display().to_string()))
}

pub(crate) fn render(value: &serde_json::Value, pretty: bool) -> Result<String> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(rendered)
}
