//! Core domain types, errors, and constants for `bunsenite`.
//!
//! ## Key Components
//!
//! - **`errors`**: Defines the primary `Error` enum and `Result` type alias,
//!   covering library discovery, symbol binding, and marshalling failures.
//! - **`types`**: Newtypes for the values that cross the native boundary
//!   (`ValidationStatus`, `PerimeterCode`, `BuildMetadata`) and the `Platform`
//!   naming convention for shared libraries.
//! - **`constants`**: Library name, search directories, and exported symbol names.

pub mod constants;
pub mod errors;
pub mod types;

pub use self::{
    constants::*,
    errors::{Error, Result},
    types::*,
};
