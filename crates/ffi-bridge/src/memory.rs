//! Memory management for strings crossing the FFI boundary
//!
//! Two ownership shapes come back from the engine:
//!
//! - [`NativeString`]: heap text allocated by the engine (the `parse_nickel`
//!   result). The caller owns it and must hand it back to `free_string` exactly
//!   once. Release happens in `Drop`, so it also runs when decoding fails.
//! - [`StaticNativeStr`]: text baked into the library image (`version`,
//!   `rsr_tier`). It is copied out and never released.

use bunsenite_core::{Error, Result};
use libc::c_char;
use std::ffi::CStr;
use std::marker::PhantomData;
use std::ptr::NonNull;

/// Engine entry point that frees strings it allocated
pub type ReleaseFn = unsafe extern "C" fn(*mut c_char);

/// RAII wrapper for caller-owned C strings returned from FFI
///
/// The wrapped pointer is never exposed. [`NativeString::into_string`] is the
/// only way to read it, and consumes the wrapper.
pub struct NativeString {
    ptr: NonNull<c_char>,
    release: ReleaseFn,
    operation: &'static str,
}

impl NativeString {
    /// Takes ownership of a pointer returned from the engine
    ///
    /// Returns `None` for null, which the engine uses as its failure sentinel.
    ///
    /// # Safety
    /// The caller must ensure that:
    /// - `ptr` is either null or a valid NUL-terminated string allocated by the engine
    /// - `release` is the engine's matching deallocation entry point
    /// - The pointer has not been freed already and is not used after this call
    pub unsafe fn from_raw(
        ptr: *mut c_char,
        release: ReleaseFn,
        operation: &'static str,
    ) -> Option<Self> {
        NonNull::new(ptr).map(|ptr| Self {
            ptr,
            release,
            operation,
        })
    }

    /// Copies the text into a Rust `String` and releases the native buffer
    pub fn into_string(self) -> Result<String> {
        // Safety: `ptr` is non-null and owned by `self`, so it has not been released yet
        let cstr = unsafe { CStr::from_ptr(self.ptr.as_ptr()) };
        let text = cstr.to_str().map(str::to_owned).map_err(|e| {
            Error::ffi(
                self.operation,
                format!("failed to convert C string to UTF-8: {e}"),
            )
        });
        // Release only after the bytes have been copied, on success or failure
        drop(self);
        text
    }
}

impl Drop for NativeString {
    fn drop(&mut self) {
        tracing::trace!(operation = self.operation, "releasing native string");
        // Safety: `ptr` came from the engine allocator and this is the only
        // place it is freed. `NativeString` is neither `Clone` nor `Copy`.
        unsafe { (self.release)(self.ptr.as_ptr()) }
    }
}

impl std::fmt::Debug for NativeString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeString")
            .field("operation", &self.operation)
            .finish_non_exhaustive()
    }
}

/// Borrowed view of text owned by the loaded library image
pub struct StaticNativeStr<'lib> {
    ptr: NonNull<c_char>,
    operation: &'static str,
    _library: PhantomData<&'lib ()>,
}

impl<'lib> StaticNativeStr<'lib> {
    /// Wraps a pointer to statically allocated engine text
    ///
    /// # Safety
    /// `ptr` must be null or point to a NUL-terminated string that stays valid
    /// for `'lib`, i.e. for as long as the library that returned it is loaded.
    pub unsafe fn from_raw(ptr: *const c_char, operation: &'static str) -> Option<Self> {
        NonNull::new(ptr.cast_mut()).map(|ptr| Self {
            ptr,
            operation,
            _library: PhantomData,
        })
    }

    /// Copies the text into a Rust `String`; nothing is released
    pub fn to_owned_string(&self) -> Result<String> {
        // Safety: guaranteed valid for 'lib by the constructor contract
        let cstr = unsafe { CStr::from_ptr(self.ptr.as_ptr()) };
        cstr.to_str().map(str::to_owned).map_err(|e| {
            Error::ffi(
                self.operation,
                format!("failed to convert C string to UTF-8: {e}"),
            )
        })
    }
}
