//! Domain newtypes shared by the bridge and the CLI

use crate::constants::STATUS_VALID;
use serde::Serialize;
use std::fmt::{self, Display};

/// Platform families that name shared libraries differently
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Windows,
    MacOs,
    /// Linux and every other ELF-style target
    Other,
}

impl Platform {
    /// The platform this binary was compiled for
    pub const fn current() -> Self {
        if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::MacOs
        } else {
            Platform::Other
        }
    }

    /// Shared library filename for `base_name` on this platform
    ///
    /// `name.dll` on Windows, `libname.dylib` on macOS, `libname.so` elsewhere.
    pub fn library_filename(self, base_name: &str) -> String {
        match self {
            Platform::Windows => format!("{base_name}.dll"),
            Platform::MacOs => format!("lib{base_name}.dylib"),
            Platform::Other => format!("lib{base_name}.so"),
        }
    }
}

/// Raw status returned by the native `validate` entry point
///
/// Only the valid/invalid distinction is meaningful; the code itself is opaque.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ValidationStatus(i32);

impl ValidationStatus {
    pub const fn from_raw(code: i32) -> Self {
        Self(code)
    }

    pub const fn code(self) -> i32 {
        self.0
    }

    pub const fn is_valid(self) -> bool {
        self.0 == STATUS_VALID
    }
}

impl Display for ValidationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "valid")
        } else {
            write!(f, "invalid (status {})", self.0)
        }
    }
}

/// Opaque classification code reported by the native build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PerimeterCode(u8);

impl PerimeterCode {
    pub const fn new(code: u8) -> Self {
        Self(code)
    }

    pub const fn get(self) -> u8 {
        self.0
    }
}

impl Display for PerimeterCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Static facts about the loaded native engine build
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildMetadata {
    pub version: String,
    pub compliance_tier: String,
    pub perimeter: PerimeterCode,
}
