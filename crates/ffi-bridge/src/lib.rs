//! Rust bridge to the native Nickel engine
//!
//! This crate loads the compiled `bunsenite` engine library at runtime and
//! exposes a safe interface over its C ABI. It handles library discovery,
//! symbol binding, string marshalling and the ownership rules for memory
//! returned by the engine.
//!
//! The free functions below run against the process-wide [`NickelBridge`],
//! which is loaded once on first use. Callers that want to choose where the
//! library comes from build their own bridge with [`NickelBridge::load`].

mod bridge;
mod library;
pub mod locator;
pub mod memory;

#[cfg(test)]
mod testing;

pub use bridge::NickelBridge;
pub use locator::LibraryLocator;
pub use memory::{NativeString, ReleaseFn, StaticNativeStr};

use bunsenite_core::{BuildMetadata, PerimeterCode, Result, ValidationStatus};

/// Evaluates Nickel source and returns the configuration as JSON text
///
/// # Arguments
/// * `source` - Nickel source code
/// * `name` - Name the engine uses for the source in its diagnostics
///
/// # Returns
/// `Ok(None)` when the engine rejects the source. The outer error is reserved
/// for library discovery, loading and marshalling failures.
pub fn parse(source: &str, name: &str) -> Result<Option<String>> {
    NickelBridge::global()?.parse(source, name)
}

/// Evaluates Nickel source and decodes the JSON result
pub fn parse_json(source: &str, name: &str) -> Result<Option<serde_json::Value>> {
    NickelBridge::global()?.parse_json(source, name)
}

/// Checks Nickel source without returning the evaluated configuration
pub fn validate(source: &str, name: &str) -> Result<ValidationStatus> {
    NickelBridge::global()?.validate(source, name)
}

pub fn version() -> Result<String> {
    NickelBridge::global()?.version()
}

pub fn compliance_tier() -> Result<String> {
    NickelBridge::global()?.compliance_tier()
}

pub fn perimeter() -> Result<PerimeterCode> {
    Ok(NickelBridge::global()?.perimeter())
}

/// Version, compliance tier and perimeter of the loaded engine
pub fn build_metadata() -> Result<BuildMetadata> {
    NickelBridge::global()?.build_metadata()
}
