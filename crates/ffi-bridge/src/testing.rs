//! In-process stand-in for the engine library
//!
//! Exposes the same C signatures as the real exports so the bridge's
//! marshalling runs against genuine raw pointers. Allocations and releases are
//! tracked per thread; the bridge calls native code synchronously on the
//! caller's thread, so each test sees only its own traffic.

use crate::library::{NativeLibrary, Symbols};
use crate::NickelBridge;
use libc::c_char;
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::ffi::{CStr, CString};
use std::ptr;

thread_local! {
    static LIVE: RefCell<HashSet<usize>> = RefCell::new(HashSet::new());
    static RELEASED: Cell<usize> = const { Cell::new(0) };
    static DOUBLE_FREES: Cell<usize> = const { Cell::new(0) };
    static NATIVE_CALLS: Cell<usize> = const { Cell::new(0) };
}

/// Resets and inspects the current thread's allocation bookkeeping
pub(crate) struct ReleaseLedger;

impl ReleaseLedger {
    pub(crate) fn start() -> Self {
        LIVE.with(|live| live.borrow_mut().clear());
        RELEASED.with(|c| c.set(0));
        DOUBLE_FREES.with(|c| c.set(0));
        NATIVE_CALLS.with(|c| c.set(0));
        Self
    }

    pub(crate) fn released() -> usize {
        RELEASED.with(Cell::get)
    }

    /// Calls into `parse_nickel` / `validate_nickel`
    pub(crate) fn native_calls() -> usize {
        NATIVE_CALLS.with(Cell::get)
    }

    pub(crate) fn assert_clean(&self) {
        let live = LIVE.with(|live| live.borrow().len());
        assert_eq!(live, 0, "{live} native strings were never released");
        assert_eq!(DOUBLE_FREES.with(Cell::get), 0, "a native string was released twice");
    }
}

/// Hand a string to the fake allocator
pub(crate) fn allocate(text: CString) -> *mut c_char {
    let ptr = text.into_raw();
    LIVE.with(|live| live.borrow_mut().insert(ptr as usize));
    ptr
}

pub(crate) unsafe extern "C" fn fake_release(ptr: *mut c_char) {
    if ptr.is_null() {
        return;
    }
    RELEASED.with(|c| c.set(c.get() + 1));
    if LIVE.with(|live| live.borrow_mut().remove(&(ptr as usize))) {
        drop(unsafe { CString::from_raw(ptr) });
    } else {
        DOUBLE_FREES.with(|c| c.set(c.get() + 1));
    }
}

/// Tiny record evaluator: `{ key = 1, flag = true, name = "x" }`
fn evaluate(source: &str) -> Option<Value> {
    let body = source.trim().strip_prefix('{')?.strip_suffix('}')?;
    let mut record = serde_json::Map::new();
    for field in body.split(',').map(str::trim).filter(|f| !f.is_empty()) {
        let (key, value) = field.split_once('=')?;
        let key = key.trim();
        if key.is_empty() || !key.chars().all(|c| c.is_alphanumeric() || c == '_') {
            return None;
        }
        let value = value.trim();
        let value = if let Ok(n) = value.parse::<i64>() {
            Value::from(n)
        } else if let Ok(b) = value.parse::<bool>() {
            Value::from(b)
        } else if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
            Value::from(&value[1..value.len() - 1])
        } else {
            return None;
        };
        record.insert(key.to_string(), value);
    }
    Some(Value::Object(record))
}

unsafe fn read_args<'a>(source: *const c_char, name: *const c_char) -> Option<&'a str> {
    NATIVE_CALLS.with(|c| c.set(c.get() + 1));
    if source.is_null() || name.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(name) }.to_str().ok()?;
    unsafe { CStr::from_ptr(source) }.to_str().ok()
}

unsafe extern "C" fn fake_parse(source: *const c_char, name: *const c_char) -> *mut c_char {
    unsafe { read_args(source, name) }
        .and_then(evaluate)
        .and_then(|value| CString::new(value.to_string()).ok())
        .map_or(ptr::null_mut(), allocate)
}

unsafe extern "C" fn fake_validate(source: *const c_char, name: *const c_char) -> i32 {
    match unsafe { read_args(source, name) } {
        None => -1,
        Some(source) if evaluate(source).is_some() => 0,
        Some(_) => 1,
    }
}

unsafe extern "C" fn fake_parse_not_json(source: *const c_char, name: *const c_char) -> *mut c_char {
    let _ = unsafe { read_args(source, name) };
    allocate(CString::new("a = 1").unwrap_or_default())
}

unsafe extern "C" fn fake_parse_bad_utf8(source: *const c_char, name: *const c_char) -> *mut c_char {
    let _ = unsafe { read_args(source, name) };
    allocate(CString::new(vec![b'{', 0xff, b'}']).unwrap_or_default())
}

unsafe extern "C" fn fake_version() -> *const c_char {
    b"0.1.0\0".as_ptr().cast()
}

unsafe extern "C" fn fake_tier() -> *const c_char {
    b"bronze\0".as_ptr().cast()
}

unsafe extern "C" fn fake_null_text() -> *const c_char {
    ptr::null()
}

unsafe extern "C" fn fake_perimeter() -> u8 {
    3
}

pub(crate) fn fake_symbols() -> Symbols {
    Symbols {
        parse: fake_parse,
        validate: fake_validate,
        release: fake_release,
        version: fake_version,
        compliance_tier: fake_tier,
        perimeter: fake_perimeter,
    }
}

/// Bridge over the well-behaved fake engine
pub(crate) fn fake_bridge() -> NickelBridge {
    NickelBridge::from_library(NativeLibrary::from_symbols(fake_symbols()))
}

/// Bridge whose parse output is not JSON
pub(crate) fn non_json_bridge() -> NickelBridge {
    let symbols = Symbols {
        parse: fake_parse_not_json,
        ..fake_symbols()
    };
    NickelBridge::from_library(NativeLibrary::from_symbols(symbols))
}

/// Bridge whose parse output is not UTF-8
pub(crate) fn bad_utf8_bridge() -> NickelBridge {
    let symbols = Symbols {
        parse: fake_parse_bad_utf8,
        ..fake_symbols()
    };
    NickelBridge::from_library(NativeLibrary::from_symbols(symbols))
}

/// Bridge whose metadata entry points violate the contract by returning null
pub(crate) fn null_metadata_bridge() -> NickelBridge {
    let symbols = Symbols {
        version: fake_null_text,
        compliance_tier: fake_null_text,
        ..fake_symbols()
    };
    NickelBridge::from_library(NativeLibrary::from_symbols(symbols))
}
