use super::read_source;
use bunsenite_core::{Error, Result};
use bunsenite_ffi_bridge::NickelBridge;
use std::path::Path;

pub fn execute(bridge: &NickelBridge, file: &Path) -> Result<()> {
    let (source, name) = read_source(file)?;

    let status = bridge.validate(&source, &name)?;
    tracing::debug!(file = %file.display(), %status, "validation finished");
    if !status.is_valid() {
        return Err(Error::invalid_source(file.display().to_string()));
    }

    println!("✓ {} is valid", file.display());
    Ok(())
}
