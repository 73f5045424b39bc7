//! FFI bindings to the system libpng 1.6.
//!
//! Only the calls the probe needs are bound. libpng 1.6 has no public
//! accessor for the filter flags of a write structure, so they are read
//! through `filter_probe_do_filter`, a one-line C shim that `build.rs`
//! compiles against the library's private headers.

use std::ffi::c_char;
use std::ffi::c_int;
use std::ffi::c_void;
use std::ffi::CStr;
use std::ptr;
use std::rc::Rc;

use crate::error::Error;
use crate::library::ContextOptions;
use crate::library::FilterContext;
use crate::library::WriteLibrary;
use crate::observer::Observer;

// ==================== libpng Type Definitions ====================

#[allow(non_camel_case_types)]
type png_structp = *mut c_void;
#[allow(non_camel_case_types)]
type png_infop = *mut c_void;
#[allow(non_camel_case_types)]
type png_error_ptr = Option<unsafe extern "C" fn(png_structp, *const c_char)>;
#[allow(non_camel_case_types)]
type png_rw_ptr = Option<unsafe extern "C" fn(png_structp, *mut u8, usize)>;
#[allow(non_camel_case_types)]
type png_flush_ptr = Option<unsafe extern "C" fn(png_structp)>;

// ==================== FFI Declarations ====================

#[link(name = "png16")]
extern "C" {
    fn png_get_libpng_ver(png_ptr: png_structp) -> *const c_char;
    fn png_create_write_struct(
        user_png_ver: *const c_char,
        error_ptr: *mut c_void,
        error_fn: png_error_ptr,
        warn_fn: png_error_ptr,
    ) -> png_structp;
    fn png_create_info_struct(png_ptr: png_structp) -> png_infop;
    fn png_destroy_write_struct(png_ptr_ptr: *mut png_structp, info_ptr_ptr: *mut png_infop);
    fn png_set_write_fn(
        png_ptr: png_structp,
        io_ptr: *mut c_void,
        write_data_fn: png_rw_ptr,
        output_flush_fn: png_flush_ptr,
    );
    fn png_set_benign_errors(png_ptr: png_structp, allowed: c_int);
    fn png_set_filter(png_ptr: png_structp, method: c_int, filters: c_int);
    fn png_get_error_ptr(png_ptr: png_structp) -> *mut c_void;
}

extern "C" {
    fn filter_probe_do_filter(png_ptr: png_structp) -> u8;
}

// ==================== Callbacks ====================

/// Recover the observer registered as the structure's error pointer.
///
/// # Safety
///
/// `png_ptr` must be a live write structure created by [`Libpng16::create`],
/// whose context still holds the observer.
unsafe fn observer<'a>(png_ptr: png_structp) -> &'a Observer {
    &*(png_get_error_ptr(png_ptr) as *const Observer)
}

unsafe fn message_text(message: *const c_char) -> String {
    if message.is_null() {
        return String::new();
    }
    CStr::from_ptr(message).to_string_lossy().into_owned()
}

unsafe extern "C" fn on_error(png_ptr: png_structp, message: *const c_char) {
    observer(png_ptr).error(&message_text(message))
}

unsafe extern "C" fn on_warning(png_ptr: png_structp, message: *const c_char) {
    observer(png_ptr).warning(&message_text(message))
}

// Nothing is ever encoded, so output is discarded.
unsafe extern "C" fn discard(_: png_structp, _: *mut u8, _: usize) {}

unsafe extern "C" fn flush_nothing(_: png_structp) {}

// ==================== Safe Wrappers ====================

/// The system libpng.
#[derive(Debug)]
pub struct Libpng16;

/// A libpng write structure and its info structure.
#[derive(Debug)]
pub struct Context {
    png_ptr: png_structp,
    info_ptr: png_infop,
    // Borrowed by the callbacks through `png_ptr`'s error pointer.
    _observer: Rc<Observer>,
}

impl WriteLibrary for Libpng16 {
    type Context = Context;

    fn version() -> String {
        // SAFETY: libpng ignores the structure argument and returns a static
        // NUL-terminated string.
        unsafe { message_text(png_get_libpng_ver(ptr::null_mut())) }
    }

    fn create(observer: Rc<Observer>, options: ContextOptions) -> Result<Context, Error> {
        let error_ptr = Rc::as_ptr(&observer) as *mut c_void;

        // SAFETY: the version string is the linked library's own, and the
        // observer outlives the structure because the context owns it.
        let mut png_ptr = unsafe {
            png_create_write_struct(
                png_get_libpng_ver(ptr::null_mut()),
                error_ptr,
                Some(on_error),
                Some(on_warning),
            )
        };
        if png_ptr.is_null() {
            return Err(Error::CreateWriteStruct);
        }

        // SAFETY: `png_ptr` was just created and is not null.
        let info_ptr = unsafe { png_create_info_struct(png_ptr) };
        if info_ptr.is_null() {
            // SAFETY: releases the write structure only.
            unsafe { png_destroy_write_struct(&mut png_ptr, ptr::null_mut()) };
            return Err(Error::CreateInfoStruct);
        }

        let context = Context { png_ptr, info_ptr, _observer: observer };

        // SAFETY: both structures are live for the lifetime of `context`.
        unsafe {
            png_set_write_fn(context.png_ptr, ptr::null_mut(), Some(discard), Some(flush_nothing));
            if options.relax_app_errors {
                png_set_benign_errors(context.png_ptr, 1);
            }
        }

        Ok(context)
    }
}

impl FilterContext for Context {
    fn set_filter(&mut self, method: i32, filters: i32) {
        // SAFETY: the structure is live; errors end the process inside the
        // callback, so control never unwinds through libpng.
        unsafe { png_set_filter(self.png_ptr, method, filters) }
    }

    fn observed_filter(&self) -> u8 {
        // SAFETY: the structure is live.
        unsafe { filter_probe_do_filter(self.png_ptr) }
    }
}

impl Drop for Context {
    fn drop(&mut self) {
        // SAFETY: both pointers come from a successful `create` and are
        // released only here. libpng nulls them.
        unsafe { png_destroy_write_struct(&mut self.png_ptr, &mut self.info_ptr) };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::probe::Probe;
    use crate::selector::FILTER_SUB;
    use crate::selector::FILTER_TYPE_BASE;
    use crate::testing::SharedBuffer;

    fn observer(buffer: &SharedBuffer) -> Rc<Observer> {
        Rc::new(Observer::new(Box::new(buffer.clone())))
    }

    #[test]
    fn version_is_the_linked_library_string() {
        let version = Libpng16::version();
        assert!(version.starts_with("1."), "unexpected version {version}");
    }

    #[test]
    fn contexts_can_be_created_and_dropped_repeatedly() {
        let buffer = SharedBuffer::default();
        let observer = observer(&buffer);
        let options = ContextOptions { relax_app_errors: true };

        for _ in 0..64 {
            let mut context = Libpng16::create(Rc::clone(&observer), options).unwrap();
            context.set_filter(FILTER_TYPE_BASE, FILTER_SUB);
            assert_eq!(context.observed_filter(), FILTER_SUB as u8);
        }

        // Every context released its clone of the observer.
        assert_eq!(Rc::strong_count(&observer), 1);
        assert_eq!(buffer.contents(), "");
    }

    #[test]
    fn warnings_reach_the_registered_observer() {
        let buffer = SharedBuffer::default();
        let observer = observer(&buffer);
        let options = ContextOptions { relax_app_errors: true };
        let mut context = Libpng16::create(Rc::clone(&observer), options).unwrap();

        observer.begin_case(6);
        context.set_filter(FILTER_TYPE_BASE, 6);

        assert_eq!(buffer.contents(), "0x0006: warning: Unknown row filter for method 0\n");
    }

    #[test]
    fn fresh_context_per_case_run_completes() {
        let settings = Settings {
            reuse_context: false,
            extended_table: true,
            relax_app_errors: true,
        };
        let buffer = SharedBuffer::default();

        let summary = Probe::<Libpng16>::new(settings, Box::new(buffer.clone()))
            .run()
            .unwrap();

        assert_eq!(summary.cases, crate::cases::EXTENDED.len() + 1);
        let report = buffer.contents();
        assert!(report.starts_with(&format!("libpng version {}\n", Libpng16::version())));
    }
}
