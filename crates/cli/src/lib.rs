//! Command-line front end for the bunsenite Nickel bridge

pub mod commands;
pub mod logging;

pub use commands::Commands;
