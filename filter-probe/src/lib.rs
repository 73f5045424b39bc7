#![deny(missing_docs)]

//! # Filter probe
//!
//! A diagnostic harness for libpng's `png_set_filter`. Each probe case hands
//! a filter selector to the library, reads back the filter flags the write
//! context actually stored, and prints them next to the value recorded for
//! the libpng 1.6 series. Differences are marked, never treated as failures,
//! so the output can be diffed across library versions.

pub mod cases;
pub mod config;
pub mod error;
pub mod library;
pub mod logging;
pub mod observer;
pub mod probe;
pub mod selector;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

/// The version of this crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
