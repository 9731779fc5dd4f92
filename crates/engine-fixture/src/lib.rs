//! Stand-in engine library for integration tests
//!
//! Exports the same six entry points as the real engine so the bridge can be
//! exercised end to end: a genuine dynamic load, symbol resolution and string
//! ownership across the boundary. It understands flat records only:
//! `{ port = 8080, debug = true, name = "app" }`.
//!
//! Three extra exports (`fixture_calls`, `fixture_released`,
//! `fixture_live`) report allocator traffic so tests can check that every
//! parse result is released exactly once.

use std::ffi::{c_char, CStr, CString};
use std::ptr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

static CALLS: AtomicUsize = AtomicUsize::new(0);
static RELEASED: AtomicUsize = AtomicUsize::new(0);
static DOUBLE_FREES: AtomicUsize = AtomicUsize::new(0);
static LIVE: Mutex<Vec<usize>> = Mutex::new(Vec::new());

enum Scalar<'a> {
    Int(i64),
    Bool(bool),
    Str(&'a str),
}

fn scalar(text: &str) -> Option<Scalar<'_>> {
    if let Ok(n) = text.parse::<i64>() {
        return Some(Scalar::Int(n));
    }
    if let Ok(b) = text.parse::<bool>() {
        return Some(Scalar::Bool(b));
    }
    let inner = text.strip_prefix('"')?.strip_suffix('"')?;
    // No escapes in the fixture grammar
    if inner.contains(['"', '\\']) || inner.chars().any(char::is_control) {
        return None;
    }
    Some(Scalar::Str(inner))
}

/// Evaluates a flat record to compact JSON, or `None` if it is malformed
fn evaluate(source: &str) -> Option<String> {
    let body = source.trim().strip_prefix('{')?.strip_suffix('}')?;
    let mut fields = Vec::new();
    for field in body.split(',').map(str::trim).filter(|f| !f.is_empty()) {
        let (key, value) = field.split_once('=')?;
        let key = key.trim();
        if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return None;
        }
        let value = match scalar(value.trim())? {
            Scalar::Int(n) => n.to_string(),
            Scalar::Bool(b) => b.to_string(),
            Scalar::Str(s) => format!("\"{s}\""),
        };
        fields.push(format!("\"{key}\":{value}"));
    }
    Some(format!("{{{}}}", fields.join(",")))
}

fn live() -> std::sync::MutexGuard<'static, Vec<usize>> {
    LIVE.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

unsafe fn read_args<'a>(source: *const c_char, name: *const c_char) -> Option<&'a str> {
    CALLS.fetch_add(1, Ordering::SeqCst);
    if source.is_null() || name.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(name) }.to_str().ok()?;
    unsafe { CStr::from_ptr(source) }.to_str().ok()
}

/// # Safety
/// `source` and `name` must be null or valid NUL-terminated strings.
#[no_mangle]
pub unsafe extern "C" fn parse_nickel(source: *const c_char, name: *const c_char) -> *mut c_char {
    let Some(json) = unsafe { read_args(source, name) }.and_then(evaluate) else {
        return ptr::null_mut();
    };
    match CString::new(json) {
        Ok(text) => {
            let ptr = text.into_raw();
            live().push(ptr as usize);
            ptr
        }
        Err(_) => ptr::null_mut(),
    }
}

/// # Safety
/// `source` and `name` must be null or valid NUL-terminated strings.
#[no_mangle]
pub unsafe extern "C" fn validate_nickel(source: *const c_char, name: *const c_char) -> i32 {
    match unsafe { read_args(source, name) } {
        None => -1,
        Some(source) if evaluate(source).is_some() => 0,
        Some(_) => 1,
    }
}

/// # Safety
/// `ptr` must be null or a pointer returned by `parse_nickel`.
#[no_mangle]
pub unsafe extern "C" fn free_string(ptr: *mut c_char) {
    if ptr.is_null() {
        return;
    }
    RELEASED.fetch_add(1, Ordering::SeqCst);
    let mut live = live();
    match live.iter().position(|&p| p == ptr as usize) {
        Some(index) => {
            live.swap_remove(index);
            drop(unsafe { CString::from_raw(ptr) });
        }
        None => {
            DOUBLE_FREES.fetch_add(1, Ordering::SeqCst);
        }
    }
}

#[no_mangle]
pub extern "C" fn version() -> *const c_char {
    b"0.1.0-fixture\0".as_ptr().cast()
}

#[no_mangle]
pub extern "C" fn rsr_tier() -> *const c_char {
    b"bronze\0".as_ptr().cast()
}

#[no_mangle]
pub extern "C" fn tpcf_perimeter() -> u8 {
    3
}

/// Number of `parse_nickel` and `validate_nickel` calls so far
#[no_mangle]
pub extern "C" fn fixture_calls() -> usize {
    CALLS.load(Ordering::SeqCst)
}

/// Number of `free_string` calls with a non-null pointer so far
#[no_mangle]
pub extern "C" fn fixture_released() -> usize {
    RELEASED.load(Ordering::SeqCst)
}

/// Strings handed out and not yet released, or `usize::MAX` after a double free
#[no_mangle]
pub extern "C" fn fixture_live() -> usize {
    if DOUBLE_FREES.load(Ordering::SeqCst) > 0 {
        return usize::MAX;
    }
    live().len()
}
