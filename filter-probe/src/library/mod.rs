//! The library under test.
//!
//! The probe talks to libpng through two small traits: [`WriteLibrary`]
//! creates write contexts and reports the library version, and
//! [`FilterContext`] applies a selector and reads back what was stored.
//!
//! With the `libpng` feature, [`libpng::Libpng16`] binds the system
//! `libpng16` over FFI and is exported as [`Linked`]. Test builds carry
//! [`model::Libpng16`], a stand-in for the 1.6 series that exercises the
//! harness without a library. When it is the only backend, it is exported
//! as [`Linked`] and every run is labelled a self-test. A build with
//! neither has nothing to probe, and the binary refuses to run.

use std::rc::Rc;

use cfg_if::cfg_if;

use crate::error::Error;
use crate::observer::Observer;

#[cfg(feature = "libpng")]
pub mod libpng;
#[cfg(any(test, feature = "testing"))]
pub mod model;

cfg_if! {
    if #[cfg(feature = "libpng")] {
        /// The library this build probes.
        pub type Linked = libpng::Libpng16;
        /// Whether [`Linked`] is the in-process stand-in rather than libpng.
        pub const SELF_TEST: bool = false;
    } else if #[cfg(any(test, feature = "testing"))] {
        /// The library this build probes.
        pub type Linked = model::Libpng16;
        /// Whether [`Linked`] is the in-process stand-in rather than libpng.
        pub const SELF_TEST: bool = true;
    }
}

/// Options applied to every newly created context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextOptions {
    /// Report application errors as warnings instead of aborting.
    pub relax_app_errors: bool,
}

/// A library that can create write contexts.
pub trait WriteLibrary {
    /// The write context. Dropping it releases the write and info
    /// structures.
    type Context: FilterContext;

    /// The version string of the linked library.
    fn version() -> String;

    /// Create a write context together with its info structure. Reports the
    /// library raises while the context is alive go to `observer`.
    fn create(observer: Rc<Observer>, options: ContextOptions) -> Result<Self::Context, Error>;
}

/// A live write context.
pub trait FilterContext {
    /// Apply a filter selector, as `png_set_filter` does.
    fn set_filter(&mut self, method: i32, filters: i32);

    /// The filter flags the context currently holds.
    fn observed_filter(&self) -> u8;
}
