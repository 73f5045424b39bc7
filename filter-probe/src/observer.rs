//! Receivers for the error and warning reports libpng raises while a
//! selector is applied.
//!
//! libpng reports through callbacks rather than return values. The callbacks
//! only receive the context pointer registered when the write structure was
//! created, so the [`Observer`] travels through that pointer and carries the
//! selector currently under test. That lets each report name the case that
//! triggered it.

use std::cell::Cell;
use std::cell::RefCell;
use std::io::Write;

use crate::error::ExitStatus;

/// The selector under test and the sink reports are written to.
///
/// `Observer` is neither `Send` nor `Sync`; the probe is single-threaded and
/// libpng invokes the callbacks on the calling thread.
pub struct Observer {
    current_input: Cell<i32>,
    out: RefCell<Box<dyn Write>>,
}

impl std::fmt::Debug for Observer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observer")
            .field("current_input", &self.current_input.get())
            .finish_non_exhaustive()
    }
}

impl Observer {
    /// Create an observer that writes reports to `out`.
    pub fn new(out: Box<dyn Write>) -> Self {
        Observer {
            current_input: Cell::new(0),
            out: RefCell::new(out),
        }
    }

    /// Record the selector about to be applied. Must be called right before
    /// each `set_filter` call.
    pub fn begin_case(&self, input: i32) {
        self.current_input.set(input);
    }

    /// The selector most recently passed to [`Observer::begin_case`].
    pub fn current_input(&self) -> i32 {
        self.current_input.get()
    }

    /// Write one line of report output.
    pub fn emit(&self, line: std::fmt::Arguments<'_>) -> std::io::Result<()> {
        let mut out = self.out.borrow_mut();
        out.write_fmt(line)?;
        out.write_all(b"\n")
    }

    /// Flush the report sink.
    pub fn flush(&self) -> std::io::Result<()> {
        self.out.borrow_mut().flush()
    }

    /// Handle a warning from the library. The run continues.
    pub fn warning(&self, message: &str) {
        let input = self.current_input();
        tracing::warn!(input = format_args!("{input:#06x}"), %message, "library warning");
        if let Err(error) = self.emit(format_args!("{input:#06x}: warning: {message}")) {
            tracing::error!(%error, "could not report a library warning");
        }
    }

    /// Handle an error from the library. libpng cannot continue once it has
    /// raised one, so this ends the process with
    /// [`ExitStatus::LibraryError`].
    pub fn error(&self, message: &str) -> ! {
        let input = self.current_input();
        tracing::error!(input = format_args!("{input:#06x}"), %message, "library error");
        let _ = self.emit(format_args!("{input:#06x}: error: {message}"));
        let _ = self.flush();
        std::process::exit(i32::from(ExitStatus::LibraryError as u8))
    }
}
