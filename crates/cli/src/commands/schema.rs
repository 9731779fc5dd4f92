use bunsenite_core::{Error, Result};
use bunsenite_ffi_bridge::NickelBridge;
use jsonschema::Validator;
use serde_json::Value;
use std::path::Path;

/// Reported violations are capped so huge documents keep readable output
const MAX_VIOLATIONS: usize = 20;

pub fn execute(bridge: &NickelBridge, config: &Path, schema: &Path) -> Result<()> {
    let validator = load_schema(schema)?;
    let value = super::parse::evaluate(bridge, config)?;

    check(&validator, &value, &config.display().to_string())?;
    println!("✓ {} matches schema {}", config.display(), schema.display());
    Ok(())
}

/// Reads and compiles a JSON Schema document
pub(crate) fn load_schema(path: &Path) -> Result<Validator> {
    let text = std::fs::read_to_string(path).map_err(|e| Error::file_system(path, "read", e))?;
    let schema: Value = serde_json::from_str(&text)
        .map_err(|e| Error::json(format!("schema '{}' is not valid JSON", path.display()), e))?;
    jsonschema::validator_for(&schema).map_err(|e| Error::invalid_schema(path, e.to_string()))
}

/// Checks an evaluated configuration, collecting every violation
pub(crate) fn check(validator: &Validator, value: &Value, name: &str) -> Result<()> {
    if validator.is_valid(value) {
        return Ok(());
    }
    let violations: Vec<String> = validator
        .iter_errors(value)
        .take(MAX_VIOLATIONS)
        .map(|e| e.to_string())
        .collect();
    tracing::debug!(config = name, count = violations.len(), "schema validation failed");
    Err(Error::schema_violation(name, violations))
}
