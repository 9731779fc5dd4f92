/// Constants used throughout the bunsenite codebase
// Native library
pub const LIBRARY_BASE_NAME: &str = "bunsenite";

// Candidate directories probed in order, relative to the locator base directory
pub const LIBRARY_SEARCH_DIRS: &[&str] = &["zig/zig-out/lib", "target/release", "."];

pub const LIBRARY_REMEDIATION: &str = "cargo build --release && cd zig && zig build";

// Exported entry points
pub const SYMBOL_PARSE: &str = "parse_nickel";
pub const SYMBOL_VALIDATE: &str = "validate_nickel";
pub const SYMBOL_RELEASE: &str = "free_string";
pub const SYMBOL_VERSION: &str = "version";
pub const SYMBOL_COMPLIANCE_TIER: &str = "rsr_tier";
pub const SYMBOL_PERIMETER: &str = "tpcf_perimeter";

// Native validate status codes
pub const STATUS_VALID: i32 = 0;
pub const STATUS_INVALID: i32 = 1;
pub const STATUS_INVALID_INPUT: i32 = -1;

// Environment variable names
pub const BUNSENITE_LOG_VAR: &str = "BUNSENITE_LOG";
