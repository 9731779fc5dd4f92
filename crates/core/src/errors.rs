use std::path::PathBuf;
use std::sync::Arc;

/// Result type alias for bunsenite operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for bunsenite operations
///
/// Every variant is cheap to clone so a fatal bridge failure can be cached and
/// replayed to later callers instead of being retried.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// No candidate location holds the native library
    #[error("{}", format_not_found(.filename, .searched, .remediation))]
    LibraryNotFound {
        filename: String,
        searched: Vec<PathBuf>,
        remediation: String,
    },

    /// The library file exists but the dynamic loader rejected it
    #[error("failed to load native library '{path}': {message}")]
    LibraryLoad { path: PathBuf, message: String },

    /// The library loaded but an expected entry point is missing
    #[error("native library '{path}' does not export '{symbol}': {message}")]
    SymbolBinding {
        path: PathBuf,
        symbol: String,
        message: String,
    },

    /// Marshalling faults and native contract violations
    #[error("FFI operation '{operation}' failed: {message}")]
    Ffi { operation: String, message: String },

    /// The engine rejected a source (parse sentinel or nonzero validate status)
    #[error("'{name}' is not valid Nickel")]
    InvalidSource { name: String },

    /// A schema file could not be compiled
    #[error("invalid JSON schema '{path}': {message}")]
    InvalidSchema { path: PathBuf, message: String },

    /// An evaluated configuration does not satisfy its schema
    #[error("{}", format_violations(.name, .violations))]
    SchemaViolation {
        name: String,
        violations: Vec<String>,
    },

    /// The file watcher failed to start or stopped delivering events
    #[error("watching '{path}' failed: {message}")]
    Watch { path: PathBuf, message: String },

    /// File system operations
    #[error("file system {operation} operation failed for '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        operation: String,
        #[source]
        source: Arc<std::io::Error>,
    },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: Arc<serde_json::Error>,
    },
}

fn format_not_found(filename: &str, searched: &[PathBuf], remediation: &str) -> String {
    let searched = searched
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ");
    if searched.is_empty() {
        format!("could not find native library '{filename}'. Build with: {remediation}")
    } else {
        format!(
            "could not find native library '{filename}' (searched: {searched}). Build with: {remediation}"
        )
    }
}

fn format_violations(name: &str, violations: &[String]) -> String {
    let mut message = format!("'{name}' does not match the schema");
    for violation in violations {
        message.push_str("\n  - ");
        message.push_str(violation);
    }
    message
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Error::Json {
            message: error.to_string(),
            source: Arc::new(error),
        }
    }
}

// Helper methods for creating errors with context
impl Error {
    /// Create a library-not-found error listing every probed path
    #[must_use]
    pub fn library_not_found(
        filename: impl Into<String>,
        searched: Vec<PathBuf>,
        remediation: impl Into<String>,
    ) -> Self {
        Error::LibraryNotFound {
            filename: filename.into(),
            searched,
            remediation: remediation.into(),
        }
    }

    /// Create a library load error
    #[must_use]
    pub fn library_load(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Error::LibraryLoad {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a symbol binding error
    #[must_use]
    pub fn symbol_binding(
        path: impl Into<PathBuf>,
        symbol: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Error::SymbolBinding {
            path: path.into(),
            symbol: symbol.into(),
            message: message.into(),
        }
    }

    /// Create an FFI error
    #[must_use]
    pub fn ffi(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Ffi {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Create an invalid-source error for the named input
    #[must_use]
    pub fn invalid_source(name: impl Into<String>) -> Self {
        Error::InvalidSource { name: name.into() }
    }

    /// Create an error for a schema that failed to compile
    #[must_use]
    pub fn invalid_schema(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Error::InvalidSchema {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a schema violation error listing each failed constraint
    #[must_use]
    pub fn schema_violation(name: impl Into<String>, violations: Vec<String>) -> Self {
        Error::SchemaViolation {
            name: name.into(),
            violations,
        }
    }

    /// Create a file watcher error
    #[must_use]
    pub fn watch(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Error::Watch {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a file system error with context
    #[must_use]
    pub fn file_system(
        path: impl Into<PathBuf>,
        operation: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        Error::FileSystem {
            path: path.into(),
            operation: operation.into(),
            source: Arc::new(source),
        }
    }

    /// Create a JSON error with a message describing what was being decoded
    #[must_use]
    pub fn json(message: impl Into<String>, source: serde_json::Error) -> Self {
        Error::Json {
            message: message.into(),
            source: Arc::new(source),
        }
    }

    /// Whether this error poisons the bridge for the rest of the process
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::LibraryNotFound { .. } | Error::LibraryLoad { .. } | Error::SymbolBinding { .. }
        )
    }
}
