//! An in-process model of the libpng 1.6 write context, limited to what
//! `png_set_filter` touches. It observes nothing: runs against it are
//! self-tests of the harness, and its version string says so.
//!
//! The model behaves like a pre-release build of the library: application
//! errors abort unless the context was created with
//! [`ContextOptions::relax_app_errors`].

use std::rc::Rc;

use crate::error::Error;
use crate::library::ContextOptions;
use crate::library::FilterContext;
use crate::library::WriteLibrary;
use crate::observer::Observer;
use crate::selector::*;

/// Version string reported for the model.
pub const MODEL_VERSION: &str = "none (self-test against the in-process 1.6 model)";

/// The modelled library.
#[derive(Debug)]
pub struct Libpng16;

/// A modelled write context.
#[derive(Debug)]
pub struct Context {
    observer: Rc<Observer>,
    do_filter: u8,
    app_errors_warn: bool,
}

impl WriteLibrary for Libpng16 {
    type Context = Context;

    fn version() -> String {
        MODEL_VERSION.to_string()
    }

    fn create(observer: Rc<Observer>, options: ContextOptions) -> Result<Context, Error> {
        Ok(Context {
            observer,
            do_filter: NO_FILTERS as u8,
            app_errors_warn: options.relax_app_errors,
        })
    }
}

impl Context {
    fn app_error(&self, message: &str) {
        if self.app_errors_warn {
            self.observer.warning(message);
        } else {
            self.observer.error(message);
        }
    }
}

impl FilterContext for Context {
    fn set_filter(&mut self, method: i32, filters: i32) {
        if method != FILTER_TYPE_BASE {
            self.observer.error("Unknown custom filter method");
        }

        self.do_filter = match filters & SELECTOR_MASK {
            5..=7 => {
                self.app_error("Unknown row filter for method 0");
                FILTER_NONE as u8
            }
            FILTER_VALUE_NONE => FILTER_NONE as u8,
            FILTER_VALUE_SUB => FILTER_SUB as u8,
            FILTER_VALUE_UP => FILTER_UP as u8,
            FILTER_VALUE_AVG => FILTER_AVG as u8,
            FILTER_VALUE_PAETH => FILTER_PAETH as u8,
            // The flags are kept as given, truncated to the stored byte.
            _ => filters as u8,
        };
    }

    fn observed_filter(&self) -> u8 {
        self.do_filter
    }
}
