use bunsenite_core::{BuildMetadata, Result};
use bunsenite_ffi_bridge::NickelBridge;

pub fn execute(bridge: &NickelBridge, json: bool) -> Result<()> {
    let metadata = bridge.build_metadata()?;
    println!("{}", render(&metadata, bridge, json)?);
    Ok(())
}

fn render(metadata: &BuildMetadata, bridge: &NickelBridge, json: bool) -> Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(metadata)?);
    }
    Ok(render_text(metadata, &bridge.library_path().display().to_string()))
}

pub(crate) fn render_text(metadata: &BuildMetadata, library: &str) -> String {
    format!(
        "Nickel engine {}\n  Compliance tier: {}\n  Perimeter:       {}\n  Library:         {}",
        metadata.version, metadata.compliance_tier, metadata.perimeter, library
    )
}
