//! The comparison loop.
//!
//! A run moves through four states:
//!
//! * `NEED_HANDLE`: no write context is alive (the slot is `None`). One is
//!   created; failure ends the run with the creation error.
//! * `HANDLE_READY`: the case's selector is applied and the stored flags are
//!   read back.
//! * `REPORT`: the row is printed.
//! * `END`: after the last case the reused context, if any, is released.
//!
//! Between cases the context either stays in the slot (`reuse_context`) or
//! is dropped, sending the next case back to `NEED_HANDLE`.

use std::io::Write;
use std::marker::PhantomData;
use std::rc::Rc;

use crate::cases;
use crate::cases::TestCase;
use crate::config::Settings;
use crate::error::Error;
use crate::library::ContextOptions;
use crate::library::FilterContext;
use crate::library::WriteLibrary;
use crate::observer::Observer;
use crate::selector;

/// Column titles printed after the banner.
pub const HEADER: &str = "input  expect actual";

/// Appended to rows whose observed flags differ from the expected ones.
pub const MISMATCH_MARKER: &str = " !=";

/// Format one report row.
pub fn format_row(case: TestCase, observed: u8) -> String {
    let marker = if observed == case.expected { "" } else { MISMATCH_MARKER };
    format!("{:#06x} {:#06x} {:#06x}{marker}", case.input, case.expected, observed)
}

/// Counts gathered over a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    /// Number of cases probed.
    pub cases: usize,
    /// Number of rows that carried the mismatch marker.
    pub mismatches: usize,
}

/// Runs the probe table against the library `L`.
#[derive(Debug)]
pub struct Probe<L> {
    settings: Settings,
    observer: Rc<Observer>,
    _library: PhantomData<L>,
}

impl<L: WriteLibrary> Probe<L> {
    /// Create a probe that writes its report to `out`.
    pub fn new(settings: Settings, out: Box<dyn Write>) -> Self {
        Probe {
            settings,
            observer: Rc::new(Observer::new(out)),
            _library: PhantomData,
        }
    }

    /// Print the banner and header, then probe every case of the configured
    /// table. Mismatches are reported, not returned as errors.
    pub fn run(&self) -> Result<Summary, Error> {
        self.observer.emit(format_args!("libpng version {}", L::version()))?;
        self.observer.emit(format_args!("{HEADER}"))?;

        let mut slot: Option<L::Context> = None;
        let mut summary = Summary::default();

        for case in cases::table(self.settings.extended_table) {
            let mut context = match slot.take() {
                Some(context) => context,
                None => self.create()?,
            };

            let observed = self.probe_case(&mut context, case);
            self.observer.emit(format_args!("{}", format_row(case, observed)))?;

            summary.cases += 1;
            if observed != case.expected {
                summary.mismatches += 1;
            }

            if self.settings.reuse_context {
                slot = Some(context);
            } else {
                drop(context);
                tracing::trace!("released the write context");
            }
        }

        drop(slot);
        self.observer.flush()?;

        tracing::info!(
            cases = summary.cases,
            mismatches = summary.mismatches,
            reuse_context = self.settings.reuse_context,
            "probe finished"
        );
        Ok(summary)
    }

    fn create(&self) -> Result<L::Context, Error> {
        let options = ContextOptions {
            relax_app_errors: self.settings.relax_app_errors,
        };
        let context = L::create(Rc::clone(&self.observer), options)?;
        tracing::trace!("created a write context");
        Ok(context)
    }

    #[tracing::instrument(skip_all, fields(input = case.input))]
    fn probe_case(&self, context: &mut L::Context, case: TestCase) -> u8 {
        self.observer.begin_case(case.input);
        context.set_filter(selector::FILTER_TYPE_BASE, case.input);
        let observed = context.observed_filter();

        if observed == case.expected {
            tracing::debug!(observed = %selector::describe(observed), "filter flags match");
        } else {
            tracing::warn!(
                expected = %selector::describe(case.expected),
                observed = %selector::describe(observed),
                "filter flags differ from the recorded value"
            );
        }
        observed
    }
}
