//! Loading the engine library and binding its entry points

use crate::memory::ReleaseFn;
use bunsenite_core::{
    Error, Result, SYMBOL_COMPLIANCE_TIER, SYMBOL_PARSE, SYMBOL_PERIMETER, SYMBOL_RELEASE,
    SYMBOL_VALIDATE, SYMBOL_VERSION,
};
use libc::c_char;
use libloading::Library;
use std::path::{Path, PathBuf};

pub(crate) type ParseFn = unsafe extern "C" fn(*const c_char, *const c_char) -> *mut c_char;
pub(crate) type ValidateFn = unsafe extern "C" fn(*const c_char, *const c_char) -> i32;
pub(crate) type StaticTextFn = unsafe extern "C" fn() -> *const c_char;
pub(crate) type PerimeterFn = unsafe extern "C" fn() -> u8;

/// The fixed foreign function table
#[derive(Clone, Copy)]
pub(crate) struct Symbols {
    pub(crate) parse: ParseFn,
    pub(crate) validate: ValidateFn,
    pub(crate) release: ReleaseFn,
    pub(crate) version: StaticTextFn,
    pub(crate) compliance_tier: StaticTextFn,
    pub(crate) perimeter: PerimeterFn,
}

impl Symbols {
    /// Resolve every entry point, failing on the first one that is missing
    ///
    /// # Safety
    /// The library must export these symbols with exactly the declared C signatures.
    unsafe fn resolve(library: &Library, path: &Path) -> Result<Self> {
        Ok(Self {
            parse: symbol(library, path, SYMBOL_PARSE)?,
            validate: symbol(library, path, SYMBOL_VALIDATE)?,
            release: symbol(library, path, SYMBOL_RELEASE)?,
            version: symbol(library, path, SYMBOL_VERSION)?,
            compliance_tier: symbol(library, path, SYMBOL_COMPLIANCE_TIER)?,
            perimeter: symbol(library, path, SYMBOL_PERIMETER)?,
        })
    }
}

unsafe fn symbol<T: Copy>(library: &Library, path: &Path, name: &str) -> Result<T> {
    let symbol: libloading::Symbol<'_, T> = unsafe { library.get(name.as_bytes()) }
        .map_err(|e| Error::symbol_binding(path, name, e.to_string()))?;
    tracing::trace!(symbol = name, "bound native entry point");
    Ok(*symbol)
}

/// A loaded engine library together with its bound entry points
///
/// The copied function pointers in `symbols` are only valid while `_library`
/// is alive, so they never leave this struct's owner.
pub(crate) struct NativeLibrary {
    path: PathBuf,
    symbols: Symbols,
    _library: Option<Library>,
}

impl NativeLibrary {
    /// Load the shared library at `path` and bind the full symbol table
    pub(crate) fn load(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "loading native library");

        // Safety: loading runs the library's initialisers. The path comes from
        // the locator, which only returns the engine artifact it was asked for.
        let library = unsafe { Library::new(path) }
            .map_err(|e| Error::library_load(path, e.to_string()))?;

        // Safety: the engine exports these entry points with the declared signatures
        let symbols = unsafe { Symbols::resolve(&library, path)? };

        tracing::debug!(path = %path.display(), "native library bound");
        Ok(Self {
            path: path.to_path_buf(),
            symbols,
            _library: Some(library),
        })
    }

    /// Wrap a table of in-process functions
    #[cfg(test)]
    pub(crate) fn from_symbols(symbols: Symbols) -> Self {
        Self {
            path: PathBuf::from("<in-process>"),
            symbols,
            _library: None,
        }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn symbols(&self) -> &Symbols {
        &self.symbols
    }
}
