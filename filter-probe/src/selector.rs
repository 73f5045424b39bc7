//! Filter selector encodings understood by libpng's write side.
//!
//! A selector is either one of the filter *values* (`0..=4`, the byte that
//! prefixes a filtered row) or a mask of filter *flags* (`0x08..=0xf8`, one
//! bit per permitted filter). libpng stores the normalized mask in the write
//! context's `do_filter` byte.

/// The only filter method defined by the PNG specification.
pub const FILTER_TYPE_BASE: i32 = 0;

/// Disable filtering entirely. Shares its encoding with [`FILTER_VALUE_NONE`].
pub const NO_FILTERS: i32 = 0x00;
/// Permit the "none" filter.
pub const FILTER_NONE: i32 = 0x08;
/// Permit the "sub" filter.
pub const FILTER_SUB: i32 = 0x10;
/// Permit the "up" filter.
pub const FILTER_UP: i32 = 0x20;
/// Permit the "average" filter.
pub const FILTER_AVG: i32 = 0x40;
/// Permit the "paeth" filter.
pub const FILTER_PAETH: i32 = 0x80;
/// Every filter flag.
pub const ALL_FILTERS: i32 = FILTER_NONE | FILTER_SUB | FILTER_UP | FILTER_AVG | FILTER_PAETH;

/// Row filter value for "none".
pub const FILTER_VALUE_NONE: i32 = 0;
/// Row filter value for "sub".
pub const FILTER_VALUE_SUB: i32 = 1;
/// Row filter value for "up".
pub const FILTER_VALUE_UP: i32 = 2;
/// Row filter value for "average".
pub const FILTER_VALUE_AVG: i32 = 3;
/// Row filter value for "paeth".
pub const FILTER_VALUE_PAETH: i32 = 4;

/// The bits libpng inspects when normalizing a selector: the flag mask plus
/// the three bits that can hold a filter value.
pub const SELECTOR_MASK: i32 = ALL_FILTERS | 0x07;

const FLAG_NAMES: [(i32, &str); 5] = [
    (FILTER_NONE, "none"),
    (FILTER_SUB, "sub"),
    (FILTER_UP, "up"),
    (FILTER_AVG, "avg"),
    (FILTER_PAETH, "paeth"),
];

/// Render the filter flags set in `flags` as a `|`-separated list, for log
/// fields. Value bits (`0x07`) are rendered as a trailing `value=N`.
pub fn describe(flags: u8) -> String {
    let flags = i32::from(flags);
    let mut parts: Vec<String> = FLAG_NAMES
        .iter()
        .filter(|(bit, _)| flags & bit != 0)
        .map(|(_, name)| (*name).to_string())
        .collect();

    let value = flags & 0x07;
    if value != 0 {
        parts.push(format!("value={value}"));
    }

    if parts.is_empty() {
        return "empty".to_string();
    }
    parts.join("|")
}
