//! The probe table: selectors to hand to `png_set_filter` and the filter
//! flags the libpng 1.6 series stores for each of them.
//!
//! The expected values for undocumented selectors are golden values tied to
//! that library series. Other releases are free to disagree; the probe
//! exists to show where they do.

use crate::selector::*;

/// One probe case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestCase {
    /// The selector passed to `png_set_filter`.
    pub input: i32,
    /// The `do_filter` byte recorded for this selector.
    pub expected: u8,
}

const fn case(input: i32, expected: i32) -> TestCase {
    TestCase { input, expected: expected as u8 }
}

/// Bit outside the 8-bit selector width. libpng stores the selector in a
/// byte, so it is expected to be dropped.
pub const EXTRANEOUS_BIT: i32 = 0x100;

/// The two named filters every libpng release must round-trip.
pub static MINIMAL: &[TestCase] = &[case(FILTER_NONE, FILTER_NONE), case(FILTER_SUB, FILTER_SUB)];

/// The named filters followed by raw values, undocumented values, combined
/// encodings and selectors carrying [`EXTRANEOUS_BIT`].
pub static EXTENDED: &[TestCase] = &[
    case(FILTER_NONE, FILTER_NONE),
    case(FILTER_SUB, FILTER_SUB),
    case(FILTER_UP, FILTER_UP),
    case(FILTER_AVG, FILTER_AVG),
    case(FILTER_PAETH, FILTER_PAETH),
    case(ALL_FILTERS, ALL_FILTERS),
    // Row filter values map to the matching flag.
    case(FILTER_VALUE_SUB, FILTER_SUB),
    case(FILTER_VALUE_UP, FILTER_UP),
    case(FILTER_VALUE_AVG, FILTER_AVG),
    case(FILTER_VALUE_PAETH, FILTER_PAETH),
    // Values past paeth are reported and collapse to "none".
    case(5, FILTER_NONE),
    case(6, FILTER_NONE),
    case(7, FILTER_NONE),
    // Mask and value bits together are stored as given.
    case(FILTER_NONE | FILTER_VALUE_SUB, FILTER_NONE | FILTER_VALUE_SUB),
    case(FILTER_SUB | FILTER_VALUE_PAETH, FILTER_SUB | FILTER_VALUE_PAETH),
    case(FILTER_NONE | FILTER_UP, FILTER_NONE | FILTER_UP),
    case(ALL_FILTERS | 0x07, ALL_FILTERS | 0x07),
    case(EXTRANEOUS_BIT | FILTER_VALUE_SUB, FILTER_SUB),
    case(EXTRANEOUS_BIT | 5, FILTER_NONE),
    case(EXTRANEOUS_BIT | FILTER_SUB, FILTER_SUB),
    case(EXTRANEOUS_BIT | ALL_FILTERS, ALL_FILTERS),
];

/// Run last in every table: clearing all filters leaves "none" selected.
pub const FINAL: TestCase = case(NO_FILTERS, FILTER_NONE);

/// The cases of a run, in order: either table followed by [`FINAL`].
pub fn table(extended: bool) -> impl Iterator<Item = TestCase> {
    let body = if extended { EXTENDED } else { MINIMAL };
    body.iter().copied().chain(std::iter::once(FINAL))
}
