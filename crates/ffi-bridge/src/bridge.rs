//! Nickel engine bridge
//!
//! [`NickelBridge`] is the process-scoped context every public operation runs
//! through. It owns the loaded library; the raw entry points never leave it.

use crate::library::NativeLibrary;
use crate::locator::LibraryLocator;
use crate::memory::{NativeString, StaticNativeStr};
use bunsenite_core::{
    BuildMetadata, Error, PerimeterCode, Result, ValidationStatus, STATUS_INVALID,
    STATUS_INVALID_INPUT, SYMBOL_COMPLIANCE_TIER, SYMBOL_PARSE, SYMBOL_VERSION,
};
use once_cell::sync::OnceCell;
use std::ffi::CString;
use std::path::Path;

/// Outcome of the first attempt to load the process-wide bridge, kept for the
/// life of the process whether it succeeded or not.
static GLOBAL: OnceCell<Result<NickelBridge>> = OnceCell::new();

/// Arguments ready to cross the boundary, or the reason they cannot
enum Prepared {
    Args { source: CString, name: CString },
    Empty,
    Unrepresentable,
}

fn prepare(source: &str, name: &str) -> Prepared {
    if source.trim().is_empty() {
        return Prepared::Empty;
    }
    match (CString::new(source), CString::new(name)) {
        (Ok(source), Ok(name)) => Prepared::Args { source, name },
        _ => Prepared::Unrepresentable,
    }
}

pub struct NickelBridge {
    library: NativeLibrary,
}

impl NickelBridge {
    /// Locate, load and bind the engine library
    pub fn load(locator: &LibraryLocator) -> Result<Self> {
        let path = locator.locate()?;
        let library = NativeLibrary::load(&path)?;
        Ok(Self::from_library(library))
    }

    /// The process-wide bridge, loaded on first use
    ///
    /// Concurrent first calls block until a single load completes. A fatal
    /// load failure is returned to every later caller without retrying.
    pub fn global() -> Result<&'static NickelBridge> {
        GLOBAL
            .get_or_init(|| {
                tracing::debug!("initializing process-wide Nickel bridge");
                let bridge = Self::load(&LibraryLocator::default());
                if let Err(e) = &bridge {
                    tracing::error!("native library unavailable: {e}");
                }
                bridge
            })
            .as_ref()
            .map_err(Clone::clone)
    }

    pub(crate) fn from_library(library: NativeLibrary) -> Self {
        Self { library }
    }

    /// Path of the loaded library file
    pub fn library_path(&self) -> &Path {
        self.library.path()
    }

    /// Evaluate Nickel source to JSON text
    ///
    /// `Ok(None)` is the parse failure sentinel; the engine reports no detail.
    /// Empty sources and sources containing NUL bytes never reach the engine
    /// and also yield `None`.
    pub fn parse(&self, source: &str, name: &str) -> Result<Option<String>> {
        let (source, name) = match prepare(source, name) {
            Prepared::Args { source, name } => (source, name),
            Prepared::Empty => {
                tracing::debug!(name, "empty source, skipping native parse");
                return Ok(None);
            }
            Prepared::Unrepresentable => {
                tracing::warn!(name, "source or name contains a NUL byte");
                return Ok(None);
            }
        };

        let symbols = self.library.symbols();
        // Safety: both pointers are valid NUL-terminated strings that outlive the call
        let result_ptr = unsafe { (symbols.parse)(source.as_ptr(), name.as_ptr()) };

        // Safety: parse_nickel returns null or a string the caller frees with free_string
        match unsafe { NativeString::from_raw(result_ptr, symbols.release, SYMBOL_PARSE) } {
            Some(result) => result.into_string().map(Some),
            None => Ok(None),
        }
    }

    /// Evaluate Nickel source and decode the resulting JSON
    pub fn parse_json(&self, source: &str, name: &str) -> Result<Option<serde_json::Value>> {
        match self.parse(source, name)? {
            Some(json) => serde_json::from_str(&json)
                .map(Some)
                .map_err(|e| Error::json(format!("engine returned invalid JSON for '{name}'"), e)),
            None => Ok(None),
        }
    }

    /// Check Nickel source; only `is_valid` on the result is meaningful
    pub fn validate(&self, source: &str, name: &str) -> Result<ValidationStatus> {
        let (source, name) = match prepare(source, name) {
            Prepared::Args { source, name } => (source, name),
            Prepared::Empty => return Ok(ValidationStatus::from_raw(STATUS_INVALID)),
            Prepared::Unrepresentable => {
                return Ok(ValidationStatus::from_raw(STATUS_INVALID_INPUT))
            }
        };

        // Safety: both pointers are valid NUL-terminated strings that outlive the call
        let code = unsafe { (self.library.symbols().validate)(source.as_ptr(), name.as_ptr()) };
        Ok(ValidationStatus::from_raw(code))
    }

    /// Engine version string
    pub fn version(&self) -> Result<String> {
        // Safety: version() takes no arguments and returns static text
        let ptr = unsafe { (self.library.symbols().version)() };
        self.static_text(ptr, SYMBOL_VERSION)
    }

    /// Declared compliance tier label, e.g. `bronze`
    pub fn compliance_tier(&self) -> Result<String> {
        // Safety: rsr_tier() takes no arguments and returns static text
        let ptr = unsafe { (self.library.symbols().compliance_tier)() };
        self.static_text(ptr, SYMBOL_COMPLIANCE_TIER)
    }

    /// Opaque perimeter classification code
    pub fn perimeter(&self) -> PerimeterCode {
        // Safety: tpcf_perimeter() takes no arguments and returns a plain byte
        PerimeterCode::new(unsafe { (self.library.symbols().perimeter)() })
    }

    pub fn build_metadata(&self) -> Result<BuildMetadata> {
        Ok(BuildMetadata {
            version: self.version()?,
            compliance_tier: self.compliance_tier()?,
            perimeter: self.perimeter(),
        })
    }

    fn static_text(&self, ptr: *const libc::c_char, operation: &'static str) -> Result<String> {
        // Safety: the engine documents these strings as static; they live as
        // long as the library, which `self` keeps loaded.
        match unsafe { StaticNativeStr::from_raw(ptr, operation) } {
            Some(text) => text.to_owned_string(),
            None => Err(Error::ffi(operation, "engine returned a null string")),
        }
    }
}

impl std::fmt::Debug for NickelBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NickelBridge")
            .field("library", &self.library.path())
            .finish()
    }
}
